//! Authentication middleware

use crate::api::handlers::AppState;
use crate::core::error::{AppError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Identity of the caller, stored in request extensions once the token and
/// the account behind it have been checked
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthAccount {
    pub id: i64,
    pub number: i64,
}

impl AuthAccount {
    /// Check access to `account_id`. Only restricts when ownership is enforced.
    pub fn authorize(&self, account_id: i64, enforce_ownership: bool) -> Result<()> {
        if enforce_ownership && self.id != account_id {
            return Err(AppError::Forbidden(format!(
                "account {} cannot access account {}",
                self.id, account_id
            )));
        }
        Ok(())
    }
}

/// Token from the `Authorization` header, with or without a `Bearer ` prefix
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim_start();
    let token = value.strip_prefix("Bearer").map_or(value, |rest| {
        // "Bearer" only counts as a scheme when followed by whitespace or nothing
        if rest.is_empty() || rest.starts_with(char::is_whitespace) {
            rest
        } else {
            value
        }
    });
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Gate for protected routes. Rejects with 401 unless the request carries a
/// valid token for an account that still exists.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(request.headers()) {
        Some(t) => t,
        None => {
            return AppError::Unauthorized("missing authentication token".to_string())
                .into_response()
        }
    };

    let claims = match state.tokens.verify(&token) {
        Ok(c) => c,
        Err(e) => return AppError::Unauthorized(e.to_string()).into_response(),
    };

    let account = match state.accounts.get_by_id(claims.account_id).await {
        Ok(account) => account,
        Err(AppError::NotFound(_)) => {
            return AppError::Unauthorized("account no longer exists".to_string())
                .into_response()
        }
        Err(e) => return e.into_response(),
    };

    if account.number != claims.account_number {
        return AppError::Unauthorized("token does not match account".to_string())
            .into_response();
    }

    tracing::debug!(account_id = account.id, "Request authenticated");

    request.extensions_mut().insert(AuthAccount {
        id: account.id,
        number: account.number,
    });

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthAccount
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthAccount>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("request not authenticated".to_string()))
    }
}
