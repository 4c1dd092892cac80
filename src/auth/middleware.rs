// Authentication gate for protected routes

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::auth::{error::AuthError, token::TokenService};
use crate::error::ApiError;

/// Header carrying the bearer token. Clients send the raw token, no scheme prefix.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Outcome of inspecting a request's token header
#[derive(Debug, PartialEq, Eq)]
pub enum TokenState {
    NoToken,
    Invalid,
    Valid(Uuid),
}

impl TokenState {
    /// Classify a raw header value
    pub fn inspect(header: Option<&[u8]>, tokens: &TokenService) -> Self {
        let Some(raw) = header else {
            return TokenState::NoToken;
        };

        let Ok(token) = std::str::from_utf8(raw) else {
            return TokenState::Invalid;
        };

        let token = token.trim();
        if token.is_empty() {
            return TokenState::NoToken;
        }

        match tokens.verify(token) {
            Ok(claims) => TokenState::Valid(claims.user.id),
            Err(_) => TokenState::Invalid,
        }
    }

    pub fn into_result(self) -> Result<AuthenticatedUser, AuthError> {
        match self {
            TokenState::NoToken => Err(AuthError::MissingToken),
            TokenState::Invalid => Err(AuthError::InvalidToken),
            TokenState::Valid(id) => Ok(AuthenticatedUser { id }),
        }
    }
}

/// Identity of the caller, passed to handlers as a typed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    Arc<TokenService>: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let endpoint = parts.uri.path();

        let header = parts.headers.get(AUTH_HEADER).map(|v| v.as_bytes());
        let user = TokenState::inspect(header, &tokens)
            .into_result()
            .map_err(|e| {
                warn!("Authentication failed for {}: {}", endpoint, e);
                ApiError::from(e)
            })?;

        debug!("Authenticated user_id={} for {}", user.id, endpoint);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{Claims, ClaimsUser};
    use axum::http::{header, Request};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test_secret_key_for_testing_purposes";

    fn test_tokens() -> Arc<TokenService> {
        Arc::new(TokenService::new(SECRET.to_string()))
    }

    fn parts_with(name: &str, value: &str) -> Parts {
        let req = Request::builder()
            .uri("/api/auth")
            .header(name, value)
            .body(())
            .unwrap();
        req.into_parts().0
    }

    fn parts_without_token() -> Parts {
        Request::builder()
            .uri("/api/auth")
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        let tokens = test_tokens();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();

        let mut parts = parts_with(AUTH_HEADER, &token);
        let user = AuthenticatedUser::from_request_parts(&mut parts, &tokens)
            .await
            .unwrap();

        assert_eq!(user.id, user_id);
    }

    #[tokio::test]
    async fn test_missing_header_requires_authentication() {
        let mut parts = parts_without_token();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_tokens()).await;
        assert!(matches!(result, Err(ApiError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn test_authorization_header_is_not_used() {
        let tokens = test_tokens();
        let token = tokens.issue(Uuid::new_v4()).unwrap();

        let mut parts = parts_with(header::AUTHORIZATION.as_str(), &format!("Bearer {}", token));
        let result = AuthenticatedUser::from_request_parts(&mut parts, &tokens).await;
        assert!(matches!(result, Err(ApiError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn test_expired_token_is_invalid() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user: ClaimsUser { id: Uuid::new_v4() },
            iat: now - 1000,
            exp: now - 500,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let mut parts = parts_with(AUTH_HEADER, &token);
        let result = AuthenticatedUser::from_request_parts(&mut parts, &test_tokens()).await;
        assert!(matches!(result, Err(ApiError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_malformed_tokens_are_invalid() {
        for value in [
            "invalid_token",
            "not.a.valid.jwt",
            "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature",
            "",
        ] {
            let mut parts = parts_with(AUTH_HEADER, value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &test_tokens()).await;
            assert!(matches!(result, Err(ApiError::InvalidToken)), "accepted {value:?}");
        }
    }

    #[test]
    fn test_token_state_transitions() {
        let tokens = TokenService::new(SECRET.to_string());
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();

        assert_eq!(TokenState::inspect(None, &tokens), TokenState::NoToken);
        assert_eq!(TokenState::inspect(Some(&b"garbage"[..]), &tokens), TokenState::Invalid);
        assert_eq!(TokenState::inspect(Some(&b""[..]), &tokens), TokenState::NoToken);
        assert_eq!(TokenState::inspect(Some(&b"   "[..]), &tokens), TokenState::NoToken);
        assert_eq!(TokenState::inspect(Some(&[0xff, 0xfe][..]), &tokens), TokenState::Invalid);
        assert_eq!(
            TokenState::inspect(Some(token.as_bytes()), &tokens),
            TokenState::Valid(user_id)
        );
    }
}
