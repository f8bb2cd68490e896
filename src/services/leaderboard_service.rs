use std::sync::Arc;

use crate::{
    errors::AppResult,
    models::dto::{request::LeaderboardQuery, response::LeaderboardEntry},
    repositories::SubmissionRepository,
};

const MAX_LEADERBOARD_LIMIT: i64 = 100;

/// Read-only ranking over the full submission history. The heavy
/// lifting (join, group, sort, limit) happens store-side.
pub struct LeaderboardService {
    submissions: Arc<dyn SubmissionRepository>,
}

impl LeaderboardService {
    pub fn new(submissions: Arc<dyn SubmissionRepository>) -> Self {
        Self { submissions }
    }

    pub async fn rank(&self, query: LeaderboardQuery) -> AppResult<Vec<LeaderboardEntry>> {
        let limit = query.limit.clamp(1, MAX_LEADERBOARD_LIMIT);
        self.submissions
            .leaderboard(query.grade, query.subject.as_deref(), limit)
            .await
    }
}
