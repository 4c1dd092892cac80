// Password hashing and verification service

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::error;

use crate::auth::error::AuthError;
use crate::config::DEFAULT_BCRYPT_COST;

/// Password service for hashing and verification
///
/// bcrypt is CPU-bound, so both operations run on tokio's blocking pool
/// and never stall the request executor.
#[derive(Debug, Clone)]
pub struct PasswordService {
    cost: u32,
    // Hash checked when no account matches, so misses cost a full verify
    decoy: Arc<OnceCell<String>>,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(DEFAULT_BCRYPT_COST)
    }
}

impl PasswordService {
    pub fn new(cost: u32) -> Self {
        Self {
            cost,
            decoy: Arc::new(OnceCell::new()),
        }
    }

    /// Hash a password with a fresh random salt
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_owned();
        let cost = self.cost;

        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(|e| AuthError::PasswordHash(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// Mismatches and unreadable hashes both yield `false`.
    pub async fn verify_password(&self, password: &str, hash: &str) -> bool {
        let password = password.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
            Ok(Ok(matches)) => matches,
            Ok(Err(e)) => {
                error!("Stored password hash could not be read: {}", e);
                false
            }
            Err(e) => {
                error!("Password verification task failed: {}", e);
                false
            }
        }
    }

    /// Spend the same work as `verify_password` for a login with no account
    ///
    /// Always returns `false`.
    pub async fn verify_without_account(&self, password: &str) -> bool {
        match self
            .decoy
            .get_or_try_init(|| self.hash_password("decoy-password"))
            .await
        {
            Ok(hash) => {
                self.verify_password(password, hash).await;
            }
            Err(e) => error!("Decoy hash could not be created: {}", e),
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Minimum bcrypt cost keeps the suite fast
    fn test_service() -> PasswordService {
        PasswordService::new(4)
    }

    #[test]
    fn test_default_cost_is_10() {
        assert_eq!(PasswordService::default().cost, 10);
    }

    #[tokio::test]
    async fn test_verify_without_account_runs_bcrypt_at_configured_cost() {
        let service = test_service();

        assert!(!service.verify_without_account("secret1").await);
        assert!(!service.verify_without_account("decoy-password").await);

        let decoy = service.decoy.get().unwrap();
        assert!(decoy.contains("$04$"));
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let service = test_service();
        let hash = service.hash_password("secret1").await.unwrap();

        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$2"));
        assert!(service.verify_password("secret1", &hash).await);
        assert!(!service.verify_password("secret2", &hash).await);
    }

    #[tokio::test]
    async fn test_salts_differ_per_hash() {
        let service = test_service();
        let first = service.hash_password("secret1").await.unwrap();
        let second = service.hash_password("secret1").await.unwrap();

        assert_ne!(first, second);
        assert!(service.verify_password("secret1", &first).await);
        assert!(service.verify_password("secret1", &second).await);
    }

    #[tokio::test]
    async fn test_cost_is_embedded_in_hash() {
        let hash = PasswordService::new(5).hash_password("secret1").await.unwrap();
        assert!(hash.contains("$05$"));
    }

    #[tokio::test]
    async fn test_malformed_hash_does_not_verify() {
        let service = test_service();
        assert!(!service.verify_password("secret1", "not-a-bcrypt-hash").await);
        assert!(!service.verify_password("secret1", "").await);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_verify_accepts_only_the_hashed_plaintext(
            plaintext in "[ -~]{1,40}",
            other in "[ -~]{1,40}",
        ) {
            prop_assume!(plaintext != other);
            let rt = tokio::runtime::Runtime::new().unwrap();
            let service = test_service();

            let (own, foreign) = rt.block_on(async {
                let hash = service.hash_password(&plaintext).await.unwrap();
                (
                    service.verify_password(&plaintext, &hash).await,
                    service.verify_password(&other, &hash).await,
                )
            });

            prop_assert!(own);
            prop_assert!(!foreign);
        }
    }
}
