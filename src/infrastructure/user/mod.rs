//! User infrastructure module
//!
//! This module provides the user stores (in-memory and PostgreSQL) and the
//! user service that applies uniqueness and existence rules on top of them.

mod postgres_repository;
mod repository;
mod service;

pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::UserService;
