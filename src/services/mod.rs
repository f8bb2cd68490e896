pub mod allocator;
pub mod evaluation;
pub mod generator;
pub mod leaderboard_service;
pub mod provider;
pub mod quiz_service;
pub mod suggestion;
pub mod user_service;
