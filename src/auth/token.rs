// JWT token generation and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::auth::error::AuthError;
use crate::config::DEFAULT_TOKEN_TTL_SECONDS;

/// Identity carried inside the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsUser {
    pub id: Uuid,
}

/// JWT claims structure: `{ user: { id }, iat, exp }`
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimsUser,
    pub iat: i64, // issued at timestamp
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
    ttl_seconds: i64,
}

impl TokenService {
    /// Create a TokenService with the default 100 hour lifetime
    pub fn new(secret: String) -> Self {
        Self::with_ttl(secret, DEFAULT_TOKEN_TTL_SECONDS)
    }

    pub fn with_ttl(secret: String, ttl_seconds: i64) -> Self {
        Self { secret, ttl_seconds }
    }

    /// Issue a signed token for a user
    pub fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        if self.secret.is_empty() {
            return Err(AuthError::TokenGeneration(
                "signing secret is not configured".to_string(),
            ));
        }

        let now = Utc::now().timestamp();
        let exp = now.checked_add(self.ttl_seconds).ok_or_else(|| {
            AuthError::TokenGeneration("token lifetime overflows the expiry time".to_string())
        })?;
        let claims = Claims {
            user: ClaimsUser { id: user_id },
            iat: now,
            exp,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate a token and return its claims
    ///
    /// Expired, tampered and malformed tokens all map to `InvalidToken`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            debug!("Token rejected: {:?}", e.kind());
            AuthError::InvalidToken
        })
    }
}
