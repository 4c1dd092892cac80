// Authentication module
// Token-based authentication: registration, login, the request gate and ownership checks

pub mod avatar;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod ownership;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, me_handler, register_handler};
pub use middleware::{AuthenticatedUser, AUTH_HEADER};
pub use models::{LoginRequest, RegisterRequest, TokenResponse, User, UserResponse};
pub use ownership::{authorize, ensure_owner, Access};
pub use password::PasswordService;
pub use repository::{PgUserStore, UserStore};
pub use service::AuthService;
pub use token::TokenService;
