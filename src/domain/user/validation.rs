//! User validation utilities

use thiserror::Error;

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("Login name cannot be empty")]
    EmptyLoginName,

    #[error("Login name exceeds maximum length of {0} characters")]
    LoginNameTooLong(usize),

    #[error("Login name contains invalid character: '{0}'. Only alphanumeric characters, underscores, hyphens, and dots are allowed")]
    InvalidLoginNameCharacter(char),

    #[error("Email address cannot be empty")]
    EmptyEmailAddress,

    #[error("Email address exceeds maximum length of {0} characters")]
    EmailAddressTooLong(usize),

    #[error("Email address '{0}' is not well-formed")]
    MalformedEmailAddress(String),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    NameTooLong(&'static str, usize),
}

const MAX_LOGIN_NAME_LENGTH: usize = 255;
const MAX_EMAIL_ADDRESS_LENGTH: usize = 255;
const MAX_NAME_LENGTH: usize = 255;

/// Validate a login name
///
/// Rules:
/// - Cannot be blank
/// - Maximum 255 characters
/// - Only alphanumeric characters, underscores, hyphens, and dots
pub fn validate_login_name(login_name: &str) -> Result<(), UserValidationError> {
    if login_name.trim().is_empty() {
        return Err(UserValidationError::EmptyLoginName);
    }

    if login_name.chars().count() > MAX_LOGIN_NAME_LENGTH {
        return Err(UserValidationError::LoginNameTooLong(MAX_LOGIN_NAME_LENGTH));
    }

    for c in login_name.chars() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '_' | '-' | '.') {
            return Err(UserValidationError::InvalidLoginNameCharacter(c));
        }
    }

    Ok(())
}

/// Validate an email address
///
/// This is a structural check only: one `@`, a non-empty local part and a
/// dotted domain, no whitespace.
pub fn validate_email_address(email: &str) -> Result<(), UserValidationError> {
    if email.trim().is_empty() {
        return Err(UserValidationError::EmptyEmailAddress);
    }

    if email.chars().count() > MAX_EMAIL_ADDRESS_LENGTH {
        return Err(UserValidationError::EmailAddressTooLong(
            MAX_EMAIL_ADDRESS_LENGTH,
        ));
    }

    let malformed = || UserValidationError::MalformedEmailAddress(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(malformed());
    }

    let (local, domain) = email.split_once('@').ok_or_else(malformed)?;

    if local.is_empty() || domain.contains('@') {
        return Err(malformed());
    }

    let dot_inside = domain
        .find('.')
        .is_some_and(|pos| pos > 0 && !domain.ends_with('.'));

    if !dot_inside {
        return Err(malformed());
    }

    Ok(())
}

/// Validate a first or last name; `field` names the offending JSON field
pub fn validate_person_name(field: &'static str, name: &str) -> Result<(), UserValidationError> {
    if name.trim().is_empty() {
        return Err(UserValidationError::EmptyName(field));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(field, MAX_NAME_LENGTH));
    }

    Ok(())
}
