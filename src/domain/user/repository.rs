//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{NewUser, User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage.
///
/// Implementations own identifier and timestamp assignment and must enforce
/// login-name uniqueness, reporting collisions as `DomainError::Duplication`.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their login name
    async fn find_by_login_name(&self, login_name: &str) -> Result<Option<User>, DomainError>;

    /// List all users ordered by ID
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Persist a new user, assigning its ID and both timestamps
    async fn insert(&self, user: NewUser) -> Result<User, DomainError>;

    /// Overwrite the attributes of an existing user and refresh `updated_at`.
    ///
    /// Returns `None` if no user has the given ID.
    async fn update(&self, id: UserId, user: NewUser) -> Result<Option<User>, DomainError>;

    /// Delete a user, returning whether a record was removed
    async fn delete(&self, id: UserId) -> Result<bool, DomainError>;

    /// Delete every user, returning the number removed
    async fn delete_all(&self) -> Result<u64, DomainError>;
}
