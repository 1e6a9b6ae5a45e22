pub mod accounts;
pub mod system;
pub mod transfer;

pub use accounts::*;
pub use system::*;
pub use transfer::*;

use crate::api::middleware::HttpMetrics;
use crate::auth::{PasswordHasher, TokenIssuer};
use crate::db::AccountStore;
use std::sync::Arc;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub tokens: Arc<TokenIssuer>,
    pub hasher: PasswordHasher,
    pub metrics: Arc<HttpMetrics>,
    /// Restrict `/account/{id}` to the token's own account
    pub enforce_ownership: bool,
}

impl AppState {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        tokens: TokenIssuer,
        hasher: PasswordHasher,
        enforce_ownership: bool,
    ) -> Self {
        Self {
            accounts,
            tokens: Arc::new(tokens),
            hasher,
            metrics: Arc::new(HttpMetrics::new()),
            enforce_ownership,
        }
    }
}
