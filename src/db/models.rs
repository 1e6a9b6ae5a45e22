//! Database models
//!
//! Data structures representing database tables

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account record in the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// bcrypt hash, never sent to clients
    #[serde(skip_serializing, default)]
    pub password: String,
    #[serde(rename = "account_number")]
    pub number: i64,
    #[serde(rename = "account_balance", with = "rust_decimal::serde::float")]
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an account. The password is plaintext here and is
/// hashed by the store before it is persisted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

/// Partial update of an account's mutable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl AccountUpdate {
    /// Drop fields that are absent or empty
    pub fn normalized(self) -> Self {
        Self {
            first_name: self.first_name.filter(|s| !s.is_empty()),
            last_name: self.last_name.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_serialized() {
        let account = Account {
            id: 1,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            password: "$2b$04$hash".to_string(),
            number: 100_000_001,
            balance: Decimal::ZERO,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["account_number"], 100_000_001);
        assert_eq!(json["first_name"], "Jane");
        assert!(json["account_balance"].is_number());
        assert!(json.get("balance").is_none());
    }

    #[test]
    fn test_update_normalization() {
        let update = AccountUpdate {
            first_name: Some(String::new()),
            last_name: Some("Doe".to_string()),
        }
        .normalized();

        assert_eq!(update.first_name, None);
        assert_eq!(update.last_name.as_deref(), Some("Doe"));
        assert!(!update.is_empty());
        assert!(AccountUpdate::default().is_empty());
    }
}
