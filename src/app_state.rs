use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{MongoQuizRepository, MongoSubmissionRepository, MongoUserRepository},
    services::{
        leaderboard_service::LeaderboardService, provider::ChatCompletionProvider,
        quiz_service::QuizService, user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub leaderboard_service: Arc<LeaderboardService>,
    pub jwt_service: JwtService,
    pub db: Database,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;
        let user_service = Arc::new(UserService::new(user_repository));

        let quiz_repository = Arc::new(MongoQuizRepository::new(&db));
        quiz_repository.ensure_indexes().await?;

        let submission_repository = Arc::new(MongoSubmissionRepository::new(&db));
        submission_repository.ensure_indexes().await?;

        let provider = Arc::new(ChatCompletionProvider::new(&config));
        let quiz_service = Arc::new(QuizService::new(
            quiz_repository,
            submission_repository.clone(),
            provider,
        ));
        let leaderboard_service = Arc::new(LeaderboardService::new(submission_repository));

        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        Ok(Self {
            user_service,
            quiz_service,
            leaderboard_service,
            jwt_service,
            db,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_cloneable() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
