use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::posts::models::{Comment, Like, NewEntry, Post, PostRow};
use crate::storage::StoreError;

/// Persistence for posts and their likes and comments
///
/// Collections are returned newest first.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn create(&self, post: NewEntry) -> Result<Post, StoreError>;
    async fn list(&self) -> Result<Vec<Post>, StoreError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError>;
    /// Returns false when the post did not exist
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
    /// Returns false when the user had already liked the post
    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    /// Returns false when the user had not liked the post
    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError>;
    async fn likes(&self, post_id: Uuid) -> Result<Vec<Like>, StoreError>;
    async fn add_comment(&self, post_id: Uuid, comment: NewEntry) -> Result<Comment, StoreError>;
    /// Returns false when no such comment exists on the post
    async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, StoreError>;
    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError>;
}

/// Repository for database operations on posts
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn likes_for(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Like>>, StoreError> {
        let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(
            r#"
            SELECT post_id, user_id
            FROM post_likes
            WHERE post_id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<Like>> = HashMap::new();
        for (post_id, user) in rows {
            grouped.entry(post_id).or_default().push(Like { user });
        }
        Ok(grouped)
    }

    async fn comments_for(
        &self,
        post_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Comment>>, StoreError> {
        let rows: Vec<(Uuid, Uuid, Uuid, String, String, String, chrono::DateTime<chrono::Utc>)> =
            sqlx::query_as(
                r#"
                SELECT post_id, id, user_id, text, name, avatar, created_at
                FROM post_comments
                WHERE post_id = ANY($1)
                ORDER BY created_at DESC
                "#,
            )
            .bind(post_ids)
            .fetch_all(&self.pool)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for (post_id, id, user, text, name, avatar, date) in rows {
            grouped.entry(post_id).or_default().push(Comment {
                id,
                user,
                text,
                name,
                avatar,
                date,
            });
        }
        Ok(grouped)
    }

    async fn assemble(&self, rows: Vec<PostRow>) -> Result<Vec<Post>, StoreError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut likes = self.likes_for(&ids).await?;
        let mut comments = self.comments_for(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let id = row.id;
                row.into_post(
                    likes.remove(&id).unwrap_or_default(),
                    comments.remove(&id).unwrap_or_default(),
                )
            })
            .collect())
    }
}

#[async_trait]
impl PostStore for PgPostStore {
    async fn create(&self, post: NewEntry) -> Result<Post, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (id, user_id, text, name, avatar)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, text, name, avatar, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post.user)
        .bind(&post.text)
        .bind(&post.name)
        .bind(&post.avatar)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_post(Vec::new(), Vec::new()))
    }

    async fn list(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        self.assemble(rows).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, user_id, text, name, avatar, created_at FROM posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        // Likes and comments go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO post_likes (post_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (post_id, user_id) DO NOTHING
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_like(&self, post_id: Uuid, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM post_likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn likes(&self, post_id: Uuid) -> Result<Vec<Like>, StoreError> {
        Ok(self
            .likes_for(&[post_id])
            .await?
            .remove(&post_id)
            .unwrap_or_default())
    }

    async fn add_comment(&self, post_id: Uuid, comment: NewEntry) -> Result<Comment, StoreError> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO post_comments (id, post_id, user_id, text, name, avatar)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id AS "user", text, name, avatar, created_at AS "date"
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(comment.user)
        .bind(&comment.text)
        .bind(&comment.name)
        .bind(&comment.avatar)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn remove_comment(&self, post_id: Uuid, comment_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM post_comments WHERE post_id = $1 AND id = $2")
            .bind(post_id)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn comments(&self, post_id: Uuid) -> Result<Vec<Comment>, StoreError> {
        Ok(self
            .comments_for(&[post_id])
            .await?
            .remove(&post_id)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{models::NewUser, PgUserStore, UserStore};

    async fn create_test_pool() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .expect("TEST_DATABASE_URL must be set for database tests");
        let pool = crate::db::create_pool(&database_url)
            .await
            .expect("Failed to connect to test database");
        crate::db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        pool
    }

    async fn create_test_user(pool: &PgPool) -> Uuid {
        PgUserStore::new(pool.clone())
            .create(NewUser {
                name: "Test User".to_string(),
                email: format!("test{}@example.com", Uuid::new_v4().simple()),
                password_hash: "test_hash".to_string(),
                avatar: "avatar".to_string(),
            })
            .await
            .expect("Failed to create test user")
            .id
    }

    fn entry(user: Uuid, text: &str) -> NewEntry {
        NewEntry {
            user,
            text: text.to_string(),
            name: "Test User".to_string(),
            avatar: "avatar".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_like_is_unique_per_user() {
        let pool = create_test_pool().await;
        let user = create_test_user(&pool).await;
        let store = PgPostStore::new(pool);

        let post = store.create(entry(user, "hello")).await.unwrap();
        assert!(store.add_like(post.id, user).await.unwrap());
        assert!(!store.add_like(post.id, user).await.unwrap());
        assert_eq!(store.likes(post.id).await.unwrap(), vec![Like { user }]);

        assert!(store.remove_like(post.id, user).await.unwrap());
        assert!(!store.remove_like(post.id, user).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_delete_cascades_to_comments() {
        let pool = create_test_pool().await;
        let user = create_test_user(&pool).await;
        let store = PgPostStore::new(pool);

        let post = store.create(entry(user, "hello")).await.unwrap();
        let comment = store.add_comment(post.id, entry(user, "first")).await.unwrap();
        assert_eq!(store.comments(post.id).await.unwrap()[0].id, comment.id);

        assert!(store.delete(post.id).await.unwrap());
        assert!(store.find_by_id(post.id).await.unwrap().is_none());
        assert!(store.comments(post.id).await.unwrap().is_empty());
        assert!(!store.delete(post.id).await.unwrap());
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_comment_on_missing_post() {
        let pool = create_test_pool().await;
        let user = create_test_user(&pool).await;
        let store = PgPostStore::new(pool);

        let result = store.add_comment(Uuid::new_v4(), entry(user, "orphan")).await;
        assert!(matches!(result, Err(StoreError::MissingParent)));
    }
}
