// Authentication and authorization error types

use thiserror::Error;

use crate::error::ApiError;
use crate::storage::StoreError;

/// Authentication and authorization error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already registered")]
    EmailAlreadyExists,

    #[error("missing authentication token")]
    MissingToken,

    /// Signature, format or expiry failure; the cause is only logged
    #[error("invalid token")]
    InvalidToken,

    /// Authenticated user does not own the resource
    #[error("user does not own this resource")]
    NotOwner,

    #[error("user not found")]
    UserNotFound,

    #[error("password hashing error: {0}")]
    PasswordHash(String),

    #[error("token generation error: {0}")]
    TokenGeneration(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::EmailAlreadyExists => ApiError::UserExists,
            AuthError::MissingToken => ApiError::AuthenticationRequired,
            AuthError::InvalidToken => ApiError::InvalidToken,
            AuthError::NotOwner => ApiError::NotAuthorized,
            AuthError::UserNotFound => ApiError::NotFound("User not found"),
            AuthError::Store(StoreError::Duplicate) => ApiError::UserExists,
            other => ApiError::Internal(other.to_string()),
        }
    }
}
