//! Database module
//!
//! - SQLite connection pool management
//! - Schema migrations
//! - The account store capability and its implementations

pub mod manager;
pub mod memory;
pub mod migrations;
pub mod models;
pub mod repository;

pub use manager::DatabaseManager;
pub use memory::InMemoryAccountStore;
pub use models::{Account, AccountUpdate, NewAccount};
pub use repository::{AccountStore, SqliteAccountStore};
