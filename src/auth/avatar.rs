// Gravatar URL derivation

use sha2::{Digest, Sha256};

use crate::storage::normalize_email;

const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar";

/// Size 200, PG rating, mystery-person fallback
const GRAVATAR_PARAMS: &str = "s=200&r=pg&d=mm";

/// Derive the avatar URL for an email address
pub fn gravatar_url(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize_email(email).as_bytes());
    format!("{}/{:x}?{}", GRAVATAR_BASE, hasher.finalize(), GRAVATAR_PARAMS)
}
