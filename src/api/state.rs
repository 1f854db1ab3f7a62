//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::user::UserService;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn clear(&self) -> Result<(), DomainError>;
    async fn get_all(&self) -> Result<Vec<User>, DomainError>;
    async fn get_by_id(&self, id: UserId) -> Result<User, DomainError>;
    async fn get_by_name(&self, name: &str) -> Result<User, DomainError>;
    async fn delete_user(&self, id: UserId) -> Result<(), DomainError>;
    /// Create when `id` is `None`, update otherwise
    async fn upsert(&self, id: Option<UserId>, user: NewUser) -> Result<User, DomainError>;
}

#[async_trait::async_trait]
impl<R: UserRepository + 'static> UserServiceTrait for UserService<R> {
    async fn clear(&self) -> Result<(), DomainError> {
        UserService::clear(self).await
    }

    async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        UserService::get_all(self).await
    }

    async fn get_by_id(&self, id: UserId) -> Result<User, DomainError> {
        UserService::get_by_id(self, id).await
    }

    async fn get_by_name(&self, name: &str) -> Result<User, DomainError> {
        UserService::get_by_name(self, name).await
    }

    async fn delete_user(&self, id: UserId) -> Result<(), DomainError> {
        UserService::delete_user(self, id).await
    }

    async fn upsert(&self, id: Option<UserId>, user: NewUser) -> Result<User, DomainError> {
        UserService::upsert(self, id, user).await
    }
}

impl AppState {
    /// Create new application state with provided services
    pub fn new(user_service: Arc<dyn UserServiceTrait>) -> Self {
        Self { user_service }
    }
}
