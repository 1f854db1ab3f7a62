//! User wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{NewUser, User, UserId};

/// User as exchanged over HTTP.
///
/// `id`, `createdAt` and `updatedAt` are store-owned: they are always set on
/// responses and ignored on requests, apart from `id` being checked against
/// the path on updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub login_name: String,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl UserDto {
    pub fn user_id(&self) -> Option<UserId> {
        self.id.map(UserId::new)
    }

    /// Strip store-owned fields
    pub fn into_new_user(self) -> NewUser {
        NewUser {
            login_name: self.login_name,
            email_address: self.email_address,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            id: Some(user.id().value()),
            created_at: Some(user.created_at()),
            updated_at: Some(user.updated_at()),
            login_name: user.login_name().to_string(),
            email_address: user.email_address().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
        }
    }
}
