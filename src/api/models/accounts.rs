use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::core::error::{AppError, Result};
use crate::db::models::{AccountUpdate, NewAccount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MIN_PASSWORD_LEN: usize = 8;

pub const WEAK_PASSWORD_MESSAGE: &str = "password must be at least 8 characters long and include an uppercase letter, number, and special symbol";

/// Request body for POST /account
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub password: String,
}

impl CreateAccountRequest {
    /// Check every field and report all failures at once
    pub fn validate(&self) -> Result<()> {
        let mut errors = BTreeMap::new();

        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if value.is_empty() {
                errors.insert(field.to_string(), format!("{} is required", field));
            } else if !value.chars().all(char::is_alphabetic) {
                errors.insert(field.to_string(), format!("{} must contain only letters", field));
            }
        }

        if self.password.is_empty() {
            errors.insert("password".to_string(), "password is required".to_string());
        } else if self.password.len() > MAX_PASSWORD_BYTES {
            errors.insert(
                "password".to_string(),
                format!("password must be at most {} bytes", MAX_PASSWORD_BYTES),
            );
        } else if !is_strong_password(&self.password) {
            errors.insert("password".to_string(), WEAK_PASSWORD_MESSAGE.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(req: CreateAccountRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            password: req.password,
        }
    }
}

fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric())
}

/// Request body for PATCH /account/{id}; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UpdateAccountRequest> for AccountUpdate {
    fn from(req: UpdateAccountRequest) -> Self {
        AccountUpdate {
            first_name: req.first_name,
            last_name: req.last_name,
        }
        .normalized()
    }
}

/// Request body for POST /transfer, echoed back unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub to_account: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}
