//! Authentication module
//!
//! - Password hashing and verification
//! - Token issuing and validation
//! - Authentication middleware
//! - Login handler

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use handlers::login;
pub use jwt::{Claims, TokenError, TokenIssuer};
pub use middleware::{authenticate, AuthAccount};
pub use password::PasswordHasher;
