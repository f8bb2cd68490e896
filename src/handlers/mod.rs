pub mod auth_handler;
pub mod health_handler;
pub mod leaderboard_handler;
pub mod quiz_handler;

pub use auth_handler::login;
pub use health_handler::{health_check, health_check_ready};
pub use leaderboard_handler::get_leaderboard;
pub use quiz_handler::{generate_quiz, get_hint, get_history, retry_quiz, submit_quiz};
