use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One attempt at a quiz by a user. Submissions are append-only; a
/// retry is recorded as a new, independent submission.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Submission {
    pub id: String,
    pub quiz_id: String,
    pub user_id: String,
    pub responses: Vec<QuestionResponse>,
    pub score: f64,
    /// Copied from the quiz at evaluation time so later quiz changes
    /// cannot rewrite history.
    pub max_score: f64,
    pub is_retry: bool,
    /// Native BSON datetime so the history view can range filter and
    /// sort on it in the store.
    pub completed_at: DateTime,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionResponse {
    pub question_id: String,
    pub user_response: String,
}

impl Submission {
    pub fn new(
        quiz_id: &str,
        user_id: &str,
        responses: Vec<QuestionResponse>,
        score: f64,
        max_score: f64,
        is_retry: bool,
    ) -> Self {
        Submission {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            user_id: user_id.to_string(),
            responses,
            score,
            max_score,
            is_retry,
            completed_at: DateTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submission_round_trip_preserves_scoring_fields() {
        let submission = Submission::new(
            "quiz-1",
            "user-1",
            vec![QuestionResponse {
                question_id: "q-1".to_string(),
                user_response: "A".to_string(),
            }],
            6.0,
            10.0,
            false,
        );

        let document =
            mongodb::bson::to_document(&submission).expect("submission should serialize");
        let parsed: Submission =
            mongodb::bson::from_document(document).expect("submission should deserialize");

        assert_eq!(parsed.score, 6.0);
        assert_eq!(parsed.max_score, 10.0);
        assert!(!parsed.is_retry);
        assert_eq!(parsed.responses.len(), 1);
        assert_eq!(parsed.completed_at, submission.completed_at);
    }

    #[test]
    fn submission_can_represent_retry() {
        let submission = Submission::new("quiz-1", "user-1", vec![], 0.0, 10.0, true);
        assert!(submission.is_retry);
        assert!(submission.responses.is_empty());
    }
}
