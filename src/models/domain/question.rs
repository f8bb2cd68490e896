use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single quiz item. Created in bulk at quiz-generation time and
/// immutable thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Labeled choices, e.g. "A. 12". Order is fixed at creation.
    pub options: Vec<String>,
    /// The label of the correct choice, e.g. "A".
    pub correct_option: String,
    #[serde(default)]
    pub hint: String,
    pub difficulty: Difficulty,
    pub grade: i32,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }

    /// Scaling factor applied to operand magnitude by the deterministic
    /// question generator.
    pub fn multiplier(&self) -> i64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Question {
    pub fn new(
        text: &str,
        options: Vec<String>,
        correct_option: &str,
        hint: &str,
        difficulty: Difficulty,
        grade: i32,
        subject: &str,
    ) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            options,
            correct_option: correct_option.to_string(),
            hint: hint.to_string(),
            difficulty,
            grade,
            subject: subject.to_string(),
            created_at: Some(Utc::now()),
        }
    }

    /// The leading label of an option string, e.g. "A" for "A. 12".
    pub fn option_label(option: &str) -> &str {
        option
            .split_once('.')
            .map(|(label, _)| label.trim())
            .unwrap_or(option)
    }
}
