//! Account Service Library
//!
//! Account CRUD over HTTP with bcrypt password hashing, HS256 bearer tokens
//! and SQLite persistence.

pub mod api;
pub mod auth;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use crate::core::{AppError, Config, Logger};
pub use api::ApiServer;
pub use db::{AccountStore, DatabaseManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
