//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email_address, validate_login_name, validate_person_name, UserValidationError,
};

/// Store-assigned user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner integer value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied user attributes.
///
/// Carries only the fields a client may set. Identifier and timestamps are
/// owned by the store and only ever appear on [`User`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub login_name: String,
    pub email_address: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    pub fn new(
        login_name: impl Into<String>,
        email_address: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            login_name: login_name.into(),
            email_address: email_address.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Check every field, reporting the first violation
    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_login_name(&self.login_name)?;
        validate_email_address(&self.email_address)?;
        validate_person_name("firstName", &self.first_name)?;
        validate_person_name("lastName", &self.last_name)?;
        Ok(())
    }
}

/// Persisted user record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    login_name: String,
    email_address: String,
    first_name: String,
    last_name: String,
}

impl User {
    /// Assemble a persisted record. Only stores should call this.
    pub fn new(
        id: UserId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        attributes: NewUser,
    ) -> Self {
        Self {
            id,
            created_at,
            updated_at,
            login_name: attributes.login_name,
            email_address: attributes.email_address,
            first_name: attributes.first_name,
            last_name: attributes.last_name,
        }
    }

    // Getters

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn login_name(&self) -> &str {
        &self.login_name
    }

    pub fn email_address(&self) -> &str {
        &self.email_address
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// The client-settable part of this record
    pub fn attributes(&self) -> NewUser {
        NewUser {
            login_name: self.login_name.clone(),
            email_address: self.email_address.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> NewUser {
        NewUser::new("jane_doe", "jane.doe@uni-heidelberg.de", "Jane", "Doe")
    }

    #[test]
    fn test_user_id_roundtrip() {
        let id = UserId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(i64::from(id), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_user_id_serializes_as_number() {
        let json = serde_json::to_string(&UserId::new(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_new_user_valid() {
        assert!(jane().validate().is_ok());
    }

    #[test]
    fn test_new_user_reports_first_violation() {
        let user = NewUser::new("", "not-an-email", "", "");
        assert_eq!(user.validate(), Err(UserValidationError::EmptyLoginName));
    }

    #[test]
    fn test_user_attributes_match_input() {
        let now = Utc::now();
        let user = User::new(UserId::new(1), now, now, jane());

        assert_eq!(user.id(), UserId::new(1));
        assert_eq!(user.login_name(), "jane_doe");
        assert_eq!(user.email_address(), "jane.doe@uni-heidelberg.de");
        assert_eq!(user.first_name(), "Jane");
        assert_eq!(user.last_name(), "Doe");
        assert_eq!(user.attributes(), jane());
    }
}
