//! User service enforcing login-name uniqueness and existence rules

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

fn user_not_found(id: UserId) -> DomainError {
    DomainError::not_found(format!("User with id {} does not exist.", id))
}

/// User service for user management
#[derive(Debug)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    /// Create a new user service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Remove every user. Administrative use only; not routed over HTTP.
    pub async fn clear(&self) -> Result<(), DomainError> {
        let removed = self.repository.delete_all().await?;
        info!(removed, "Cleared all users");
        Ok(())
    }

    /// List all users
    pub async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        debug!("Listing all users");
        self.repository.find_all().await
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: UserId) -> Result<User, DomainError> {
        debug!(id = %id, "Getting user by id");

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| user_not_found(id))
    }

    /// Get a user by login name
    pub async fn get_by_name(&self, name: &str) -> Result<User, DomainError> {
        debug!(name = %name, "Getting user by login name");

        self.repository
            .find_by_login_name(name)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("User with login name '{}' does not exist.", name))
            })
    }

    /// Delete a user
    pub async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        info!(id = %id, "Deleting user");

        if !self.repository.delete(id).await? {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    /// Create a user when `id` is `None`, otherwise update the existing one.
    ///
    /// Fails with `NotFound` when updating a missing user and with
    /// `Duplication` when the login name belongs to another user.
    pub async fn upsert(&self, id: Option<UserId>, user: NewUser) -> Result<User, DomainError> {
        user.validate()
            .map_err(|e| DomainError::validation(e.to_string()))?;

        match id {
            None => self.create(user).await,
            Some(id) => self.update(id, user).await,
        }
    }

    async fn create(&self, user: NewUser) -> Result<User, DomainError> {
        info!(login_name = %user.login_name, "Creating user");

        // Check if login name already exists
        if self
            .repository
            .find_by_login_name(&user.login_name)
            .await?
            .is_some()
        {
            return Err(DomainError::duplication(format!(
                "Login name '{}' is already taken.",
                user.login_name
            )));
        }

        let created = self.repository.insert(user).await?;
        info!(id = %created.id(), "User created");

        Ok(created)
    }

    async fn update(&self, id: UserId, user: NewUser) -> Result<User, DomainError> {
        info!(id = %id, login_name = %user.login_name, "Updating user");

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(user_not_found(id));
        }

        // Renaming onto another user's login name is a collision; keeping one's own is not
        if let Some(owner) = self.repository.find_by_login_name(&user.login_name).await? {
            if owner.id() != id {
                return Err(DomainError::duplication(format!(
                    "Login name '{}' is already taken.",
                    user.login_name
                )));
            }
        }

        // The record can vanish between the existence check and the write
        self.repository
            .update(id, user)
            .await?
            .ok_or_else(|| user_not_found(id))
    }
}
