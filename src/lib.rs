pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod posts;
pub mod storage;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::FromRef,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, PasswordService, PgUserStore, TokenService, UserStore};
use config::AppConfig;
use posts::{PgPostStore, PostService, PostStore};
use storage::{MemoryPostStore, MemoryUserStore};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::register_handler,
        auth::handlers::login_handler,
        auth::handlers::me_handler,
        posts::handlers::create_post_handler,
        posts::handlers::list_posts_handler,
        posts::handlers::get_post_handler,
        posts::handlers::delete_post_handler,
        posts::handlers::like_post_handler,
        posts::handlers::unlike_post_handler,
        posts::handlers::add_comment_handler,
        posts::handlers::delete_comment_handler,
    ),
    components(schemas(
        auth::models::RegisterRequest,
        auth::models::LoginRequest,
        auth::models::TokenResponse,
        auth::models::UserResponse,
        posts::models::Post,
        posts::models::Like,
        posts::models::Comment,
        posts::models::TextRequest,
        posts::models::MessageResponse,
    )),
    modifiers(&TokenSecurity),
    tags(
        (name = "auth", description = "Registration, login and the current user"),
        (name = "posts", description = "Posts, likes and comments")
    ),
    info(
        title = "DevConnector API",
        version = "1.0.0",
        description = "Users, token authentication and posts for the DevConnector network"
    )
)]
pub struct ApiDoc;

/// Declares the `x-auth-token` header as the API's security scheme
struct TokenSecurity;

impl Modify for TokenSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(auth::AUTH_HEADER))),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub tokens: Arc<TokenService>,
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

impl AppState {
    /// Wire services over the given stores
    pub fn new(config: &AppConfig, users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>) -> Self {
        let tokens = Arc::new(TokenService::with_ttl(
            config.jwt_secret.clone(),
            config.token_ttl_seconds,
        ));
        let passwords = PasswordService::new(config.bcrypt_cost);

        Self {
            auth: Arc::new(AuthService::new(users.clone(), passwords, tokens.clone())),
            posts: Arc::new(PostService::new(posts, users)),
            tokens,
        }
    }

    /// State backed by in-memory stores
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            config,
            Arc::new(MemoryUserStore::new()),
            Arc::new(MemoryPostStore::new()),
        )
    }

    /// State backed by PostgreSQL when configured, in-memory otherwise
    pub async fn from_config(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let Some(database_url) = config.database_url.as_deref() else {
            tracing::warn!("DATABASE_URL not set, using in-memory storage; data is lost on restart");
            return Ok(Self::in_memory(config));
        };

        let pool = db::create_pool(database_url).await?;
        db::run_migrations(&pool).await?;

        Ok(Self::new(
            config,
            Arc::new(PgUserStore::new(pool.clone())),
            Arc::new(PgPostStore::new(pool)),
        ))
    }
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/users", post(auth::register_handler))
        .route("/api/auth", get(auth::me_handler).post(auth::login_handler))
        .route(
            "/api/posts",
            get(posts::list_posts_handler).post(posts::create_post_handler),
        )
        .route(
            "/api/posts/:id",
            get(posts::get_post_handler).delete(posts::delete_post_handler),
        )
        .route("/api/posts/like/:id", put(posts::like_post_handler))
        .route("/api/posts/unlike/:id", put(posts::unlike_post_handler))
        .route("/api/posts/comments/:id", post(posts::add_comment_handler))
        .route(
            "/api/posts/:id/comments/:comment_id",
            delete(posts::delete_comment_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
