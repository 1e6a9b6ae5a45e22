//! Health and metrics endpoints

use crate::api::handlers::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

/// Handler for GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Handler for GET /metrics
pub async fn get_metrics(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let Json(value) = health_check().await;

        assert_eq!(value["status"], "ok");
        assert_eq!(value["version"], crate::VERSION);
        let timestamp = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}
