// HTTP handlers for user and authentication endpoints

use axum::{extract::State, Json};

use crate::auth::{
    middleware::AuthenticatedUser,
    models::{LoginRequest, RegisterRequest, TokenResponse, UserResponse},
};
use crate::error::ApiError;
use crate::validation::ValidatedJson;
use crate::AppState;

/// Register user
/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = TokenResponse),
        (status = 400, description = "Validation failed or user exists", body = String,
            example = json!({"errors": [{"msg": "User already exists"}]})),
        (status = 500, description = "Internal server error", body = String, example = json!({"msg": "Server Error"}))
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    tracing::debug!("Registering user: {}", request.email);

    let response = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok(Json(response))
}

/// Authenticate user and get token
/// POST /api/auth
#[utoipa::path(
    post,
    path = "/api/auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = TokenResponse),
        (status = 400, description = "Validation failed or invalid credentials", body = String,
            example = json!({"errors": [{"msg": "Invalid credentials"}]})),
        (status = 500, description = "Internal server error", body = String, example = json!({"msg": "Server Error"}))
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    tracing::debug!("Login attempt for: {}", request.email);

    let password = request.password.unwrap_or_default();
    let response = state.auth.login(&request.email, &password).await?;

    Ok(Json(response))
}

/// Get the authenticated user
/// GET /api/auth
#[utoipa::path(
    get,
    path = "/api/auth",
    responses(
        (status = 200, description = "Current user without password", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = String,
            example = json!({"msg": "Token is not valid"})),
        (status = 404, description = "User no longer exists", body = String, example = json!({"msg": "User not found"}))
    ),
    security(("token" = [])),
    tag = "auth"
)]
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    let response = state.auth.current_user(user.id).await?;
    Ok(Json(response))
}
