// HTTP handlers for post endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;
use crate::posts::{
    error::PostError,
    models::{Comment, Like, MessageResponse, Post, TextRequest},
};
use crate::validation::ValidatedJson;
use crate::AppState;

/// Ids that do not parse cannot name a stored record
fn parse_id(raw: &str, missing: PostError) -> Result<Uuid, PostError> {
    Uuid::parse_str(raw).map_err(|_| missing)
}

/// Create a post
/// POST /api/posts
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = TextRequest,
    responses(
        (status = 200, description = "Post created", body = Post),
        (status = 400, description = "Validation failed", body = String,
            example = json!({"errors": [{"msg": "Text is required", "param": "text", "location": "body"}]})),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"msg": "Token is not valid"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn create_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<TextRequest>,
) -> Result<Json<Post>, ApiError> {
    let post = state.posts.create_post(user.id, request.text).await?;
    Ok(Json(post))
}

/// List all posts, newest first
/// GET /api/posts
#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "All posts", body = Vec<Post>),
        (status = 401, description = "Missing or invalid token", body = String, example = json!({"msg": "Token is not valid"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn list_posts_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.posts.list_posts().await?;
    tracing::debug!("Retrieved {} posts", posts.len());
    Ok(Json(posts))
}

/// Get a post by id
/// GET /api/posts/{id}
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post found", body = Post),
        (status = 404, description = "Post not found", body = String, example = json!({"msg": "Post not found"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn get_post_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post_id = parse_id(&id, PostError::NotFound)?;
    let post = state.posts.get_post(post_id).await?;
    Ok(Json(post))
}

/// Delete a post owned by the caller
/// DELETE /api/posts/{id}
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Post deleted", body = MessageResponse),
        (status = 401, description = "Caller does not own the post", body = String, example = json!({"msg": "User not authorized"})),
        (status = 404, description = "Post not found", body = String, example = json!({"msg": "Post not found"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn delete_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let post_id = parse_id(&id, PostError::NotFound)?;
    state.posts.delete_post(post_id, user.id).await?;

    Ok(Json(MessageResponse {
        msg: "Post deleted".to_string(),
    }))
}

/// Like a post
/// PUT /api/posts/like/{id}
#[utoipa::path(
    put,
    path = "/api/posts/like/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Likes after the change", body = Vec<Like>),
        (status = 400, description = "Already liked", body = String, example = json!({"msg": "Post already liked"})),
        (status = 404, description = "Post not found", body = String, example = json!({"msg": "Post not found"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn like_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let post_id = parse_id(&id, PostError::NotFound)?;
    let likes = state.posts.like(post_id, user.id).await?;
    Ok(Json(likes))
}

/// Remove the caller's like from a post
/// PUT /api/posts/unlike/{id}
#[utoipa::path(
    put,
    path = "/api/posts/unlike/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Likes after the change", body = Vec<Like>),
        (status = 400, description = "Not liked", body = String, example = json!({"msg": "You did not like the post"})),
        (status = 404, description = "Post not found", body = String, example = json!({"msg": "Post not found"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn unlike_post_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<Vec<Like>>, ApiError> {
    let post_id = parse_id(&id, PostError::NotFound)?;
    let likes = state.posts.unlike(post_id, user.id).await?;
    Ok(Json(likes))
}

/// Comment on a post
/// POST /api/posts/comments/{id}
#[utoipa::path(
    post,
    path = "/api/posts/comments/{id}",
    params(("id" = String, Path, description = "Post ID")),
    request_body = TextRequest,
    responses(
        (status = 200, description = "Comments after the change", body = Vec<Comment>),
        (status = 400, description = "Validation failed", body = String,
            example = json!({"errors": [{"msg": "Text is required", "param": "text", "location": "body"}]})),
        (status = 404, description = "Post not found", body = String, example = json!({"msg": "Post not found"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn add_comment_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<TextRequest>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = parse_id(&id, PostError::NotFound)?;
    let comments = state.posts.add_comment(post_id, user.id, request.text).await?;
    Ok(Json(comments))
}

/// Delete a comment owned by the caller
/// DELETE /api/posts/{id}/comments/{comment_id}
#[utoipa::path(
    delete,
    path = "/api/posts/{id}/comments/{comment_id}",
    params(
        ("id" = String, Path, description = "Post ID"),
        ("comment_id" = String, Path, description = "Comment ID")
    ),
    responses(
        (status = 200, description = "Comments after the change", body = Vec<Comment>),
        (status = 401, description = "Caller does not own the comment", body = String, example = json!({"msg": "User not authorized"})),
        (status = 404, description = "Post or comment not found", body = String, example = json!({"msg": "Comment does not exist"}))
    ),
    security(("token" = [])),
    tag = "posts"
)]
pub async fn delete_comment_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((id, comment_id)): Path<(String, String)>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    let post_id = parse_id(&id, PostError::NotFound)?;
    let comment_id = parse_id(&comment_id, PostError::CommentNotFound)?;

    let comments = state
        .posts
        .delete_comment(post_id, comment_id, user.id)
        .await?;
    Ok(Json(comments))
}
