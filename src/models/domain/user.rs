use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimal identity. The mock credential model accepts any password, so
/// only a stable id and a unique username are stored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            created_at: Some(Utc::now()),
        }
    }
}
