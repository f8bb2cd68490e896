pub mod question;
pub mod quiz;
pub mod submission;
pub mod user;

pub use question::{Difficulty, Question};
pub use quiz::{DifficultyDistribution, Quiz};
pub use submission::{QuestionResponse, Submission};
pub use user::User;
