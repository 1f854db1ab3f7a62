//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{NewUser, User, UserId, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct State {
    users: BTreeMap<UserId, User>,
    /// Index for login name -> user ID lookup
    login_names: HashMap<String, UserId>,
    last_id: i64,
}

/// In-memory implementation of UserRepository.
///
/// A single lock guards records and the login-name index, so every
/// check-then-write runs atomically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

/// Next `updated_at` value, strictly after `previous` even on a coarse clock
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();

    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

fn duplicate_login_name(login_name: &str) -> DomainError {
    DomainError::duplication(format!("Login name '{}' is already taken.", login_name))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_by_login_name(&self, login_name: &str) -> Result<Option<User>, DomainError> {
        let state = self.state.read().await;

        Ok(state
            .login_names
            .get(login_name)
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        Ok(state.users.values().cloned().collect())
    }

    async fn insert(&self, user: NewUser) -> Result<User, DomainError> {
        let mut state = self.state.write().await;

        if state.login_names.contains_key(&user.login_name) {
            return Err(duplicate_login_name(&user.login_name));
        }

        state.last_id += 1;
        let id = UserId::new(state.last_id);
        let now = Utc::now();

        state.login_names.insert(user.login_name.clone(), id);
        let created = User::new(id, now, now, user);
        state.users.insert(id, created.clone());

        Ok(created)
    }

    async fn update(&self, id: UserId, user: NewUser) -> Result<Option<User>, DomainError> {
        let mut state = self.state.write().await;

        let Some(existing) = state.users.get(&id) else {
            return Ok(None);
        };

        let old_login_name = existing.login_name().to_string();
        let created_at = existing.created_at();
        let updated_at = next_timestamp(existing.updated_at());

        // If the login name changed, check uniqueness and update the index
        if old_login_name != user.login_name {
            if state.login_names.contains_key(&user.login_name) {
                return Err(duplicate_login_name(&user.login_name));
            }

            state.login_names.remove(&old_login_name);
            state.login_names.insert(user.login_name.clone(), id);
        }

        let updated = User::new(id, created_at, updated_at, user);
        state.users.insert(id, updated.clone());

        Ok(Some(updated))
    }

    async fn delete(&self, id: UserId) -> Result<bool, DomainError> {
        let mut state = self.state.write().await;

        if let Some(user) = state.users.remove(&id) {
            state.login_names.remove(user.login_name());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let removed = state.users.len() as u64;

        state.users.clear();
        state.login_names.clear();

        Ok(removed)
    }
}
