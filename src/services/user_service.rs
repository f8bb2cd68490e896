use std::sync::Arc;

use crate::{errors::AppResult, models::domain::User, repositories::UserRepository};

pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Mock credential model inherited from the source system: any
    /// username logs in, creating the account on first sight.
    pub async fn login(&self, username: &str) -> AppResult<User> {
        if let Some(user) = self.users.find_by_username(username).await? {
            return Ok(user);
        }

        let user = self.users.create(User::new(username)).await?;
        log::info!("created user {} ({})", user.username, user.id);
        Ok(user)
    }
}
