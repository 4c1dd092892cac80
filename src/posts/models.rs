use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::validation::OrderedValidate;

/// A post with its likes and comments, newest first
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owner of the post
    pub user: Uuid,
    #[schema(example = "Hello DevConnector")]
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Like {
    pub user: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Owner of the comment
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub date: DateTime<Utc>,
}

/// Post row without its child collections
#[derive(Debug, Clone, FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

impl PostRow {
    pub fn into_post(self, likes: Vec<Like>, comments: Vec<Comment>) -> Post {
        Post {
            id: self.id,
            user: self.user_id,
            text: self.text,
            name: self.name,
            avatar: self.avatar,
            likes,
            comments,
            date: self.created_at,
        }
    }
}

/// Fields needed to insert a post or comment; name and avatar are copied from the author
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub user: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
}

/// Request DTO for creating a post or a comment
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TextRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Text is required"))]
    #[schema(example = "Hello DevConnector")]
    pub text: String,
}

impl OrderedValidate for TextRequest {
    const FIELD_ORDER: &'static [&'static str] = &["text"];
}

/// Acknowledgement body for deletions
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}
