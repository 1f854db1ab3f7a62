//! HTTP request/response types and extractors

pub mod error;
pub mod json;
pub mod params;
pub mod user;

pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::Json;
pub use params::{Path, Query};
pub use user::UserDto;
