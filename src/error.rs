// Error handling module for the DevConnector API
// Every handler returns Result<T, ApiError>; module errors convert into it

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::validation::FieldError;

/// Client-facing error taxonomy
///
/// Each variant has a fixed status code and body. Credential and identity
/// failures carry no detail that would let a client tell causes apart.
#[derive(Debug)]
pub enum ApiError {
    /// Field-level validation failures, in declared field order
    /// Maps to HTTP 400
    ValidationFailed(Vec<FieldError>),

    /// Unknown email or wrong password; the two are indistinguishable
    /// Maps to HTTP 400
    InvalidCredentials,

    /// Registration with an email that is already taken
    /// Maps to HTTP 400
    UserExists,

    /// No token header on a protected route
    /// Maps to HTTP 401
    AuthenticationRequired,

    /// Token present but failed signature or expiry checks
    /// Maps to HTTP 401
    InvalidToken,

    /// Authenticated but not the owner of the resource
    /// Maps to HTTP 401 for wire compatibility with existing clients
    NotAuthorized,

    /// Maps to HTTP 404
    NotFound(&'static str),

    /// Request refused by a business rule (e.g. liking twice)
    /// Maps to HTTP 400
    BadRequest(&'static str),

    /// Storage, signing or hashing failures
    /// Maps to HTTP 500; the cause is logged and never returned
    Internal(String),
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationFailed(_)
            | ApiError::InvalidCredentials
            | ApiError::UserExists
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationRequired
            | ApiError::InvalidToken
            | ApiError::NotAuthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the JSON body, logging at a level matching the severity
    fn body(&self) -> serde_json::Value {
        match self {
            ApiError::ValidationFailed(errors) => {
                debug!("Validation failed: {:?}", errors);
                json!({ "errors": errors })
            }
            ApiError::InvalidCredentials => {
                debug!("Rejected credentials");
                json!({ "errors": [FieldError::message("Invalid credentials")] })
            }
            ApiError::UserExists => {
                debug!("Registration for an existing email");
                json!({ "errors": [FieldError::message("User already exists")] })
            }
            ApiError::AuthenticationRequired => {
                warn!("Request without token to a protected endpoint");
                json!({ "msg": "No token, authorization denied" })
            }
            ApiError::InvalidToken => {
                warn!("Request with an invalid token");
                json!({ "msg": "Token is not valid" })
            }
            ApiError::NotAuthorized => {
                warn!("Ownership check failed");
                json!({ "msg": "User not authorized" })
            }
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => {
                debug!("{}", msg);
                json!({ "msg": msg })
            }
            ApiError::Internal(cause) => {
                error!("Internal error: {}", cause);
                json!({ "msg": "Server Error" })
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
