use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fixed bundle of questions assembled once at generation time and
/// immutable afterwards. May be attempted any number of times.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub creator_id: String,
    pub grade: i32,
    pub subject: String,
    pub total_questions: i32,
    pub max_score: f64,
    pub difficulty_distribution: DifficultyDistribution,
    /// Ordered question references, owned by this quiz.
    pub question_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// How many questions of each tier the quiz contains. Counts always sum
/// to `total_questions`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DifficultyDistribution {
    pub easy: i32,
    pub medium: i32,
    pub hard: i32,
}

impl DifficultyDistribution {
    pub fn total(&self) -> i32 {
        self.easy + self.medium + self.hard
    }
}

impl Quiz {
    pub fn new(
        creator_id: &str,
        grade: i32,
        subject: &str,
        max_score: f64,
        difficulty_distribution: DifficultyDistribution,
        question_ids: Vec<String>,
    ) -> Self {
        Quiz {
            id: Uuid::new_v4().to_string(),
            creator_id: creator_id.to_string(),
            grade,
            subject: subject.to_string(),
            total_questions: question_ids.len() as i32,
            max_score,
            difficulty_distribution,
            question_ids,
            created_at: Some(Utc::now()),
        }
    }
}
