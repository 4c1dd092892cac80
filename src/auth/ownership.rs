// Ownership checks for user-owned resources

use uuid::Uuid;

use crate::auth::error::AuthError;

/// Result of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Compare a resource's recorded owner with the requester
pub fn authorize(owner_id: Uuid, requester_id: Uuid) -> Access {
    if owner_id == requester_id {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// `authorize` as a `Result`, for use with `?`
pub fn ensure_owner(owner_id: Uuid, requester_id: Uuid) -> Result<(), AuthError> {
    match authorize(owner_id, requester_id) {
        Access::Allow => Ok(()),
        Access::Deny => {
            tracing::warn!(
                "Ownership denied: owner_id={}, requester_id={}",
                owner_id,
                requester_id
            );
            Err(AuthError::NotOwner)
        }
    }
}
