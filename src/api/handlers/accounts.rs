//! Account CRUD handlers

use crate::api::extract::{AccountId, JsonBody};
use crate::api::handlers::AppState;
use crate::api::models::{CreateAccountRequest, UpdateAccountRequest};
use crate::auth::models::AuthResponse;
use crate::auth::AuthAccount;
use crate::core::error::Result;
use crate::db::{Account, AccountUpdate};
use axum::{extract::State, http::StatusCode, Json};

/// Handler for GET /account
pub async fn list_accounts(State(state): State<AppState>) -> Result<Json<Vec<Account>>> {
    let accounts = state.accounts.list().await?;
    Ok(Json(accounts))
}

/// Handler for POST /account
///
/// Validates the body, stores the account with a hashed password and answers
/// with the new account plus a token for it.
pub async fn create_account(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let id = state.accounts.create(req.into()).await?;
    let account = state.accounts.get_by_id(id).await?;
    let token = state.tokens.issue(account.id, account.number)?;

    tracing::info!(account_id = account.id, account_number = account.number, "Account created");

    Ok((StatusCode::CREATED, Json(AuthResponse { account, token })))
}

/// Handler for GET /account/{id}
pub async fn get_account(
    State(state): State<AppState>,
    caller: AuthAccount,
    AccountId(id): AccountId,
) -> Result<Json<Account>> {
    caller.authorize(id, state.enforce_ownership)?;

    let account = state.accounts.get_by_id(id).await?;
    Ok(Json(account))
}

/// Handler for PATCH /account/{id}
pub async fn update_account(
    State(state): State<AppState>,
    caller: AuthAccount,
    AccountId(id): AccountId,
    JsonBody(req): JsonBody<UpdateAccountRequest>,
) -> Result<StatusCode> {
    caller.authorize(id, state.enforce_ownership)?;

    let update: AccountUpdate = req.into();
    state.accounts.update(id, update).await?;

    tracing::info!(account_id = id, "Account updated");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /account/{id}
pub async fn delete_account(
    State(state): State<AppState>,
    caller: AuthAccount,
    AccountId(id): AccountId,
) -> Result<StatusCode> {
    caller.authorize(id, state.enforce_ownership)?;

    state.accounts.delete(id).await?;

    tracing::info!(account_id = id, "Account deleted");
    Ok(StatusCode::NO_CONTENT)
}
