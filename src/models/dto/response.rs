use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{Difficulty, DifficultyDistribution, Question, Quiz, Submission};
use crate::services::evaluation::Mistake;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub username: String,
}

/// Question as shown to a quiz taker. The correct option stays server
/// side; hints are served through the hint endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: String,
    pub text: String,
    pub options: Vec<String>,
    pub difficulty: Difficulty,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        QuestionDto {
            id: question.id,
            text: question.text,
            options: question.options,
            difficulty: question.difficulty,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub id: String,
    pub grade: i32,
    pub subject: String,
    pub total_questions: i32,
    pub max_score: f64,
    pub difficulty_distribution: DifficultyDistribution,
    pub questions: Vec<QuestionDto>,
}

impl QuizResponse {
    pub fn from_parts(quiz: Quiz, questions: Vec<Question>) -> Self {
        QuizResponse {
            id: quiz.id,
            grade: quiz.grade,
            subject: quiz.subject,
            total_questions: quiz.total_questions,
            max_score: quiz.max_score,
            difficulty_distribution: quiz.difficulty_distribution,
            questions: questions.into_iter().map(QuestionDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HintResponse {
    pub hint: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub submission_id: String,
    pub score: f64,
    pub max_score: f64,
    pub is_retry: bool,
    pub mistakes: Vec<Mistake>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionDto {
    pub id: String,
    pub quiz_id: String,
    pub score: f64,
    pub max_score: f64,
    pub is_retry: bool,
    pub completed_at: DateTime<Utc>,
}

impl From<Submission> for SubmissionDto {
    fn from(submission: Submission) -> Self {
        let completed_at = DateTime::<Utc>::from_timestamp_millis(
            submission.completed_at.timestamp_millis(),
        )
        .unwrap_or_default();

        SubmissionDto {
            id: submission.id,
            quiz_id: submission.quiz_id,
            score: submission.score,
            max_score: submission.max_score,
            is_retry: submission.is_retry,
            completed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub submissions: Vec<SubmissionDto>,
    pub page: i64,
    pub limit: i64,
}

/// One row of the leaderboard aggregation. The quiz id is whichever one
/// the join produced first for the user and carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: String,
    pub best_score: f64,
    pub quiz_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntry>,
}
