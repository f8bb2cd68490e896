pub mod quiz_repository;
pub mod submission_repository;
pub mod user_repository;

pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use submission_repository::{
    HistoryFilter, MongoSubmissionRepository, SubmissionRepository,
};
pub use user_repository::{MongoUserRepository, UserRepository};
