use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::{ensure_owner, UserStore};
use crate::posts::{
    error::PostError,
    models::{Comment, Like, NewEntry, Post},
    repository::PostStore,
};

/// Service layer for posts, likes and comments
///
/// Deletions go through the ownership guard; likes and comments are open to
/// any authenticated user.
pub struct PostService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    /// Build an entry stamped with the author's current name and avatar
    async fn entry_for(&self, author_id: Uuid, text: String) -> Result<NewEntry, PostError> {
        let author = self
            .users
            .find_by_id(author_id)
            .await?
            .ok_or(PostError::AuthorNotFound)?;

        Ok(NewEntry {
            user: author.id,
            text,
            name: author.name,
            avatar: author.avatar,
        })
    }

    async fn require_post(&self, post_id: Uuid) -> Result<Post, PostError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(PostError::NotFound)
    }

    pub async fn create_post(&self, author_id: Uuid, text: String) -> Result<Post, PostError> {
        let entry = self.entry_for(author_id, text).await?;
        let post = self.posts.create(entry).await?;

        info!("Created post {} for user_id={}", post.id, author_id);
        Ok(post)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, PostError> {
        Ok(self.posts.list().await?)
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<Post, PostError> {
        self.require_post(post_id).await
    }

    /// Delete a post owned by the requester
    pub async fn delete_post(&self, post_id: Uuid, requester_id: Uuid) -> Result<(), PostError> {
        let post = self.require_post(post_id).await?;
        ensure_owner(post.user, requester_id)?;

        if !self.posts.delete(post_id).await? {
            return Err(PostError::NotFound);
        }

        info!("Deleted post {} by user_id={}", post_id, requester_id);
        Ok(())
    }

    pub async fn like(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<Like>, PostError> {
        self.require_post(post_id).await?;

        if !self.posts.add_like(post_id, user_id).await? {
            return Err(PostError::AlreadyLiked);
        }
        Ok(self.posts.likes(post_id).await?)
    }

    pub async fn unlike(&self, post_id: Uuid, user_id: Uuid) -> Result<Vec<Like>, PostError> {
        self.require_post(post_id).await?;

        if !self.posts.remove_like(post_id, user_id).await? {
            return Err(PostError::NotLiked);
        }
        Ok(self.posts.likes(post_id).await?)
    }

    pub async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: Uuid,
        text: String,
    ) -> Result<Vec<Comment>, PostError> {
        self.require_post(post_id).await?;

        let entry = self.entry_for(author_id, text).await?;
        let comment = self.posts.add_comment(post_id, entry).await?;

        info!("Added comment {} to post {}", comment.id, post_id);
        Ok(self.posts.comments(post_id).await?)
    }

    /// Delete a comment owned by the requester
    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Vec<Comment>, PostError> {
        let post = self.require_post(post_id).await?;
        let comment = post
            .comments
            .iter()
            .find(|c| c.id == comment_id)
            .ok_or(PostError::CommentNotFound)?;

        ensure_owner(comment.user, requester_id)?;

        if !self.posts.remove_comment(post_id, comment_id).await? {
            return Err(PostError::CommentNotFound);
        }

        info!("Deleted comment {} from post {}", comment_id, post_id);
        Ok(self.posts.comments(post_id).await?)
    }
}
