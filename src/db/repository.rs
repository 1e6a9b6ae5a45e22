//! Account persistence
//!
//! [`AccountStore`] is the storage capability the HTTP layer depends on.
//! [`SqliteAccountStore`] is the production implementation; an in-memory one
//! lives in [`crate::db::memory`].

use crate::auth::password::PasswordHasher;
use crate::core::error::{AppError, Result};
use crate::db::manager::DatabaseManager;
use crate::db::models::{Account, AccountUpdate, NewAccount};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::{Type, Value};
use rusqlite::{OptionalExtension, Row};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

/// First account number handed out; the sequence adds to it
pub const ACCOUNT_NUMBER_BASE: i64 = 100_000_000;

/// CRUD operations on accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Hash the password, allocate a fresh account number and persist the
    /// account. Returns the new id.
    async fn create(&self, account: NewAccount) -> Result<i64>;

    async fn get_by_id(&self, id: i64) -> Result<Account>;

    async fn get_by_number(&self, number: i64) -> Result<Account>;

    /// Apply only the non-empty fields of `update`. An empty update is a
    /// successful no-op; otherwise a missing id is `NotFound`.
    async fn update(&self, id: i64, update: AccountUpdate) -> Result<()>;

    async fn delete(&self, id: i64) -> Result<()>;

    /// All accounts ordered by id
    async fn list(&self) -> Result<Vec<Account>>;
}

const ACCOUNT_COLUMNS: &str = "id, first_name, last_name, password, number, balance, created_at";

/// SQLite-backed account store
pub struct SqliteAccountStore {
    db: Arc<DatabaseManager>,
    hasher: PasswordHasher,
}

impl SqliteAccountStore {
    pub fn new(db: Arc<DatabaseManager>, hasher: PasswordHasher) -> Self {
        Self { db, hasher }
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Account> {
        let balance: String = row.get(5)?;
        let balance = Decimal::from_str(&balance)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

        Ok(Account {
            id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            password: row.get(3)?,
            number: row.get(4)?,
            balance,
            created_at: row.get(6)?,
        })
    }
}

/// Build the `UPDATE` statement for the supplied fields.
///
/// Returns `None` when there is nothing to update. Parameters are positional
/// and the account id is always last.
pub fn build_update(id: i64, update: &AccountUpdate) -> Option<(String, Vec<Value>)> {
    let mut clauses: Vec<String> = Vec::new();
    let mut params: Vec<Value> = Vec::new();

    if let Some(first_name) = update.first_name.as_ref().filter(|s| !s.is_empty()) {
        params.push(Value::Text(first_name.clone()));
        clauses.push(format!("first_name = ?{}", params.len()));
    }
    if let Some(last_name) = update.last_name.as_ref().filter(|s| !s.is_empty()) {
        params.push(Value::Text(last_name.clone()));
        clauses.push(format!("last_name = ?{}", params.len()));
    }

    if clauses.is_empty() {
        return None;
    }

    params.push(Value::Integer(id));
    let sql = format!(
        "UPDATE accounts SET {} WHERE id = ?{}",
        clauses.join(", "),
        params.len()
    );
    Some((sql, params))
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create(&self, account: NewAccount) -> Result<i64> {
        let password_hash = self.hasher.hash_blocking(account.password).await?;
        let created_at = Utc::now();

        let id = self
            .db
            .transaction(move |tx| {
                tx.execute("INSERT INTO account_numbers DEFAULT VALUES", [])?;
                let number = ACCOUNT_NUMBER_BASE + tx.last_insert_rowid();

                tx.execute(
                    "INSERT INTO accounts (first_name, last_name, password, number, balance, created_at) \
                     VALUES (?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        &account.first_name,
                        &account.last_name,
                        &password_hash,
                        number,
                        Decimal::ZERO.to_string(),
                        created_at,
                    ],
                )?;
                Ok(tx.last_insert_rowid())
            })
            .await?;

        tracing::debug!(account_id = id, "Account row inserted");
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Account> {
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM accounts WHERE id = ?", ACCOUNT_COLUMNS),
                    [id],
                    Self::map_row,
                )
                .optional()?
                .ok_or_else(|| AppError::account_not_found(id))
            })
            .await
    }

    async fn get_by_number(&self, number: i64) -> Result<Account> {
        self.db
            .execute(move |conn| {
                conn.query_row(
                    &format!("SELECT {} FROM accounts WHERE number = ?", ACCOUNT_COLUMNS),
                    [number],
                    Self::map_row,
                )
                .optional()?
                .ok_or_else(|| AppError::NotFound(format!("account number {}", number)))
            })
            .await
    }

    async fn update(&self, id: i64, update: AccountUpdate) -> Result<()> {
        let Some((sql, params)) = build_update(id, &update) else {
            return Ok(());
        };

        self.db
            .execute(move |conn| {
                let changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
                if changed == 0 {
                    return Err(AppError::account_not_found(id));
                }
                Ok(())
            })
            .await
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.db
            .execute(move |conn| {
                let changed = conn.execute("DELETE FROM accounts WHERE id = ?", [id])?;
                if changed == 0 {
                    return Err(AppError::account_not_found(id));
                }
                Ok(())
            })
            .await
    }

    async fn list(&self) -> Result<Vec<Account>> {
        self.db
            .execute(|conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT {} FROM accounts ORDER BY id", ACCOUNT_COLUMNS))?;
                let accounts = stmt
                    .query_map([], Self::map_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(accounts)
            })
            .await
    }
}
