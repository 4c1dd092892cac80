//! Storage backends shared by the user and post repositories
//!
//! The repository traits live next to the modules that own the records
//! (`auth::repository`, `posts::repository`). This module holds the error
//! type both share and the in-memory backend used for development and tests.

pub mod memory;

use thiserror::Error;

pub use memory::{MemoryPostStore, MemoryUserStore};

/// Storage-level failures
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated")]
    Duplicate,

    /// The record a write refers to no longer exists
    #[error("referenced record does not exist")]
    MissingParent,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate;
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingParent;
            }
        }
        StoreError::Database(err)
    }
}

/// Normalise an email for lookup and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
