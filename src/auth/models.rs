//! Authentication request/response models

use crate::db::models::Account;
use serde::{Deserialize, Serialize};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub account_number: i64,
    pub password: String,
}

/// Account plus a freshly issued token, returned by create and login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account: Account,
    pub token: String,
}
