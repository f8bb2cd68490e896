use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 50))]
    pub username: String,

    /// Accepted but never checked: the credential model is a mock.
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    #[validate(range(min = 0, max = 12))]
    pub grade: i32,

    #[validate(length(min = 1, max = 100))]
    pub subject: String,

    #[serde(default = "default_total_questions")]
    #[validate(range(min = 1, max = 50))]
    pub total_questions: i32,

    #[serde(default = "default_max_score")]
    #[validate(range(min = 0.01))]
    pub max_score: f64,
}

fn default_total_questions() -> i32 {
    10
}

fn default_max_score() -> f64 {
    10.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseInput {
    pub question_id: String,
    pub user_response: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    #[validate(length(min = 1))]
    pub quiz_id: String,

    pub responses: Vec<ResponseInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryQuizRequest {
    pub responses: Vec<ResponseInput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintQuery {
    pub question_id: String,
}

/// Filter set for `GET /api/quizzes/history`, parameter names as the
/// original API exposed them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    pub grade: Option<i32>,
    pub subject: Option<String>,
    pub min_marks: Option<f64>,
    pub max_marks: Option<f64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_history_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_history_limit() -> i64 {
    30
}

impl HistoryQuery {
    pub fn offset(&self) -> i64 {
        // page is caller-supplied; saturate instead of overflowing
        self.page.max(1).saturating_sub(1).saturating_mul(self.limit())
    }

    pub fn limit(&self) -> i64 {
        self.limit.clamp(1, 100)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardQuery {
    pub grade: Option<i32>,
    pub subject: Option<String>,
    #[serde(default = "default_leaderboard_limit")]
    pub limit: i64,
}

fn default_leaderboard_limit() -> i64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_applies_defaults() {
        let request: GenerateQuizRequest =
            serde_json::from_str(r#"{"grade": 5, "subject": "Maths"}"#).unwrap();
        assert_eq!(request.total_questions, 10);
        assert_eq!(request.max_score, 10.0);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn generate_request_rejects_zero_questions() {
        let request: GenerateQuizRequest = serde_json::from_str(
            r#"{"grade": 5, "subject": "Maths", "totalQuestions": 0}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn generate_request_rejects_empty_subject() {
        let request: GenerateQuizRequest =
            serde_json::from_str(r#"{"grade": 5, "subject": ""}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn history_query_pagination_defaults() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.page, 1);
        assert_eq!(query.limit(), 30);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn history_query_offset_skips_pages() {
        let query: HistoryQuery =
            serde_json::from_str(r#"{"page": 3, "limit": 20}"#).unwrap();
        assert_eq!(query.offset(), 40);
    }

    #[test]
    fn history_query_extreme_page_saturates_instead_of_overflowing() {
        let query: HistoryQuery =
            serde_json::from_str(&format!(r#"{{"page": {}}}"#, i64::MAX)).unwrap();
        assert_eq!(query.offset(), i64::MAX);

        let query: HistoryQuery = serde_json::from_str(r#"{"page": -7}"#).unwrap();
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn submit_request_parses_camel_case_fields() {
        let request: SubmitQuizRequest = serde_json::from_str(
            r#"{"quizId": "q1", "responses": [{"questionId": "a", "userResponse": "B"}]}"#,
        )
        .unwrap();
        assert_eq!(request.quiz_id, "q1");
        assert_eq!(request.responses[0].user_response, "B");
    }
}
