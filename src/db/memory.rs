//! In-memory [`AccountStore`] for tests and embedding

use crate::auth::password::PasswordHasher;
use crate::core::error::{AppError, Result};
use crate::db::models::{Account, AccountUpdate, NewAccount};
use crate::db::repository::{AccountStore, ACCOUNT_NUMBER_BASE};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    accounts: BTreeMap<i64, Account>,
    last_id: i64,
    last_number_seq: i64,
}

/// Account store backed by a map. Ids and numbers come from counters that
/// only move forward, matching the SQLite store.
pub struct InMemoryAccountStore {
    inner: RwLock<Inner>,
    hasher: PasswordHasher,
}

impl InMemoryAccountStore {
    pub fn new(hasher: PasswordHasher) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            hasher,
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: NewAccount) -> Result<i64> {
        let password = self.hasher.hash_blocking(account.password).await?;

        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        inner.last_number_seq += 1;
        let id = inner.last_id;
        let number = ACCOUNT_NUMBER_BASE + inner.last_number_seq;

        inner.accounts.insert(
            id,
            Account {
                id,
                first_name: account.first_name,
                last_name: account.last_name,
                password,
                number,
                balance: Decimal::ZERO,
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn get_by_id(&self, id: i64) -> Result<Account> {
        self.inner
            .read()
            .await
            .accounts
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::account_not_found(id))
    }

    async fn get_by_number(&self, number: i64) -> Result<Account> {
        self.inner
            .read()
            .await
            .accounts
            .values()
            .find(|a| a.number == number)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("account number {}", number)))
    }

    async fn update(&self, id: i64, update: AccountUpdate) -> Result<()> {
        let update = update.normalized();
        if update.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.write().await;
        let account = inner
            .accounts
            .get_mut(&id)
            .ok_or_else(|| AppError::account_not_found(id))?;

        if let Some(first_name) = update.first_name {
            account.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            account.last_name = last_name;
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.inner
            .write()
            .await
            .accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::account_not_found(id))
    }

    async fn list(&self) -> Result<Vec<Account>> {
        Ok(self.inner.read().await.accounts.values().cloned().collect())
    }
}
