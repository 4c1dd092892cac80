use thiserror::Error;

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::storage::StoreError;

/// Service-level errors for posts, likes and comments
#[derive(Debug, Error)]
pub enum PostError {
    #[error("post not found")]
    NotFound,

    #[error("comment not found")]
    CommentNotFound,

    /// The authenticated author no longer exists
    #[error("author not found")]
    AuthorNotFound,

    #[error("post already liked")]
    AlreadyLiked,

    #[error("post not liked")]
    NotLiked,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for PostError {
    fn from(err: StoreError) -> Self {
        match err {
            // The post vanished between lookup and write
            StoreError::MissingParent => PostError::NotFound,
            other => PostError::Store(other),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::NotFound => ApiError::NotFound("Post not found"),
            PostError::CommentNotFound => ApiError::NotFound("Comment does not exist"),
            PostError::AuthorNotFound => ApiError::NotFound("User not found"),
            PostError::AlreadyLiked => ApiError::BadRequest("Post already liked"),
            PostError::NotLiked => ApiError::BadRequest("You did not like the post"),
            PostError::Auth(auth) => ApiError::from(auth),
            PostError::Store(store) => ApiError::Internal(store.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_missing_parent_is_not_found() {
        assert!(matches!(
            PostError::from(StoreError::MissingParent),
            PostError::NotFound
        ));
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PostError::NotFound, StatusCode::NOT_FOUND),
            (PostError::CommentNotFound, StatusCode::NOT_FOUND),
            (PostError::AlreadyLiked, StatusCode::BAD_REQUEST),
            (PostError::NotLiked, StatusCode::BAD_REQUEST),
            (PostError::Auth(AuthError::NotOwner), StatusCode::UNAUTHORIZED),
            (
                PostError::Store(StoreError::Duplicate),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }
}
