use crate::api::extract::JsonBody;
use crate::api::models::TransferRequest;
use axum::Json;

/// Handler for POST /transfer
///
/// Balances are not moved; the decoded request is echoed back.
pub async fn transfer(JsonBody(req): JsonBody<TransferRequest>) -> Json<TransferRequest> {
    tracing::info!(to_account = req.to_account, amount = %req.amount, "Transfer requested");
    Json(req)
}
