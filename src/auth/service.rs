// Authentication service - business logic layer

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{
    avatar::gravatar_url,
    error::AuthError,
    models::{NewUser, TokenResponse, UserResponse},
    password::PasswordService,
    repository::UserStore,
    token::TokenService,
};
use crate::storage::{normalize_email, StoreError};

/// Authentication service coordinating registration, login and identity lookup
pub struct AuthService {
    users: Arc<dyn UserStore>,
    passwords: PasswordService,
    tokens: Arc<TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        passwords: PasswordService,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Register a new user and return a token for them
    ///
    /// Input shape is validated by the caller. The existence check is a fast
    /// path; the store's uniqueness constraint decides concurrent races.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenResponse, AuthError> {
        let email = normalize_email(email);

        if self.users.email_exists(&email).await? {
            debug!("Registration rejected, email taken: {}", email);
            return Err(AuthError::EmailAlreadyExists);
        }

        let avatar = gravatar_url(&email);
        let password_hash = self.passwords.hash_password(password).await?;

        let user = self
            .users
            .create(NewUser {
                name: name.to_string(),
                email,
                password_hash,
                avatar,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => AuthError::EmailAlreadyExists,
                other => AuthError::Store(other),
            })?;

        info!("Registered user_id={}", user.id);
        let token = self.tokens.issue(user.id)?;
        Ok(TokenResponse { token })
    }

    /// Exchange credentials for a token
    ///
    /// An unknown email and a wrong password produce the same error, and
    /// both run a bcrypt verify.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            self.passwords.verify_without_account(password).await;
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .passwords
            .verify_password(password, &user.password_hash)
            .await
        {
            return Err(AuthError::InvalidCredentials);
        }

        debug!("Login succeeded for user_id={}", user.id);
        let token = self.tokens.issue(user.id)?;
        Ok(TokenResponse { token })
    }

    /// Get current user information
    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or(AuthError::UserNotFound)
    }
}
