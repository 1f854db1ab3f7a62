//! User domain
//!
//! This module provides domain types and traits for campus coffee users,
//! including the persisted entity, caller-supplied attributes, validation,
//! and the storage trait.

mod entity;
mod repository;
mod validation;

pub use entity::{NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email_address, validate_login_name, validate_person_name, UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
