//! In-memory storage for development and testing
//!
//! Every write takes the collection's write lock, so uniqueness checks and
//! inserts are atomic just like the database constraints they stand in for.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{normalize_email, StoreError};
use crate::auth::{
    models::{NewUser, User},
    repository::UserStore,
};
use crate::posts::{
    models::{Comment, Like, NewEntry, Post},
    repository::PostStore,
};

/// In-memory user storage
#[derive(Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let email = normalize_email(&user.email);
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate);
        }

        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email,
            password_hash: user.password_hash,
            avatar: user.avatar,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let email = normalize_email(email);
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}

/// In-memory post storage
///
/// Likes and comments are kept newest first, matching the database ordering.
#[derive(Default)]
pub struct MemoryPostStore {
    posts: Arc<RwLock<HashMap<Uuid, Post>>>,
}

impl MemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn create(&self, post: NewEntry) -> Result<Post, StoreError> {
        let post = Post {
            id: Uuid::new_v4(),
            user: post.user,
            text: post.text,
            name: post.name,
            avatar: post.avatar,
            likes: Vec::new(),
            comments: Vec::new(),
            date: Utc::now(),
        };
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.posts.write().await.remove(&id).is_some())
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(StoreError::MissingParent)?;

        if post.likes.iter().any(|like| like.user == user_id) {
            return Ok(false);
        }
        post.likes.insert(0, Like { user: user_id });
        Ok(true)
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(&post_id) else {
            return Ok(false);
        };

        let before = post.likes.len();
        post.likes.retain(|like| like.user != user_id);
        Ok(post.likes.len() != before)
    }

    async fn likes(&self, post_id: Uuid) -> Result<Vec<Like>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts.get(&post_id).map(|p| p.likes.clone()).unwrap_or_default())
    }

    async fn add_comment(&self, post_id: Uuid, comment: NewEntry) -> Result<Comment, StoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&post_id).ok_or(StoreError::MissingParent)?;

        let comment = Comment {
            id: Uuid::new_v4(),
            user: comment.user,
            text: comment.text,
            name: comment.name,
            avatar: comment.avatar,
            date: Utc::now(),
        };
        post.comments.insert(0, comment.clone());
        Ok(comment)
    }

    async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, StoreError> {
        let mut posts = self.posts.write().await;
        let Some(post) = posts.get_mut(&post_id) else {
            return Ok(false);
        };

        let before = post.comments.len();
        post.comments.retain(|c| c.id != comment_id);
        Ok(post.comments.len() != before)
    }

    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        let posts = self.posts.read().await;
        Ok(posts
            .get(&post_id)
            .map(|p| p.comments.clone())
            .unwrap_or_default())
    }
}
