//! Authentication API handlers

use crate::api::extract::JsonBody;
use crate::api::handlers::AppState;
use crate::auth::models::{AuthResponse, LoginRequest};
use crate::core::error::{AppError, Result};
use axum::{extract::State, Json};

/// Handler for POST /login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    tracing::info!(account_number = req.account_number, "Login attempt");

    let account = match state.accounts.get_by_number(req.account_number).await {
        Ok(account) => account,
        Err(AppError::NotFound(_)) => {
            tracing::warn!(account_number = req.account_number, "Unknown account number");
            return Err(AppError::InvalidCredentials);
        }
        Err(e) => return Err(e),
    };

    let is_valid = state
        .hasher
        .verify_blocking(req.password, account.password.clone())
        .await?;
    if !is_valid {
        tracing::warn!(account_id = account.id, "Invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(account.id, account.number)?;

    tracing::info!(account_id = account.id, "Login successful");

    Ok(Json(AuthResponse { account, token }))
}
