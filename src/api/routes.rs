//! API routes

use crate::api::handlers::{
    create_account, delete_account, get_account, get_metrics, health_check, list_accounts,
    transfer, update_account, AppState,
};
use crate::api::middleware::{trace_id_middleware, track_metrics};
use crate::auth::handlers::login;
use crate::auth::middleware::authenticate;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the full application router: routes, auth gate, metrics, tracing and CORS
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Router {
    // Routes behind the token gate
    let protected_routes = Router::new()
        .route(
            "/account/:id",
            get(get_account).patch(update_account).delete(delete_account),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let public_routes = Router::new()
        .route("/account", get(list_accounts).post(create_account))
        .route("/login", post(login))
        .route("/transfer", post(transfer))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics));

    public_routes
        .merge(protected_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(trace_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(allowed_origins)),
        )
}

/// Build CORS layer from allowed origins configuration
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.iter().any(|origin| origin == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::TRACE_ID_HEADER;
    use crate::auth::{PasswordHasher, TokenIssuer};
    use crate::db::{DatabaseManager, InMemoryAccountStore, SqliteAccountStore};
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    const PASSWORD: &str = "Secret123!";

    fn test_app(enforce_ownership: bool) -> Router {
        let hasher = PasswordHasher::new(4);
        let state = AppState::new(
            Arc::new(InMemoryAccountStore::new(hasher)),
            TokenIssuer::new("test-secret", 900),
            hasher,
            enforce_ownership,
        );
        build_router(state, &["*".to_string()])
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    async fn create(app: &Router, first: &str, last: &str) -> (i64, i64, String) {
        let (status, body) = send(
            app,
            Method::POST,
            "/account",
            None,
            Some(json!({"first_name": first, "last_name": last, "password": PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);

        (
            body["account"]["id"].as_i64().unwrap(),
            body["account"]["account_number"].as_i64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_account_hides_password() {
        let app = test_app(false);

        let (status, body) = send(
            &app,
            Method::POST,
            "/account",
            None,
            Some(json!({"first_name": "Jane", "last_name": "Doe", "password": PASSWORD})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["account"]["first_name"], "Jane");
        assert_eq!(body["account"]["last_name"], "Doe");
        assert_eq!(body["account"]["account_balance"], 0.0);
        assert!(body["account"].get("password").is_none());
        assert!(!body["token"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_account_reports_every_invalid_field() {
        let app = test_app(false);

        let (status, body) = send(
            &app,
            Method::POST,
            "/account",
            None,
            Some(json!({"first_name": "J4ne", "password": "weak"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation failed");
        assert_eq!(body["details"]["first_name"], "first_name must contain only letters");
        assert_eq!(body["details"]["last_name"], "last_name is required");
        assert!(body["details"]["password"].is_string());
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let app = test_app(false);
        let (id, number, _) = create(&app, "Jane", "Doe").await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"account_number": number, "password": PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["account"]["id"], id);
        assert!(!body["token"].as_str().unwrap().is_empty());

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"account_number": number, "password": "Wrong123!"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid login credentials"}));

        let (status, body) = send(
            &app,
            Method::POST,
            "/login",
            None,
            Some(json!({"account_number": 1, "password": PASSWORD})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid login credentials"}));
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = test_app(false);
        let (id, _, _) = create(&app, "Jane", "Doe").await;
        let uri = format!("/account/{}", id);

        let (status, body) = send(&app, Method::GET, &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].as_str().unwrap().starts_with("user not authorized"));

        let (status, _) = send(&app, Method::GET, &uri, Some("not-a-token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_any_valid_token_reads_any_account() {
        let app = test_app(false);
        let (jane_id, jane_number, _) = create(&app, "Jane", "Doe").await;
        let (_, _, john_token) = create(&app, "John", "Roe").await;

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/account/{}", jane_id),
            Some(&john_token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], jane_id);
        assert_eq!(body["account_number"], jane_number);
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn test_ownership_enforced_when_enabled() {
        let app = test_app(true);
        let (jane_id, _, jane_token) = create(&app, "Jane", "Doe").await;
        let (_, _, john_token) = create(&app, "John", "Roe").await;
        let uri = format!("/account/{}", jane_id);

        let (status, _) = send(&app, Method::GET, &uri, Some(&john_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::GET, &uri, Some(&jane_token), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let app = test_app(false);
        let (id, number, token) = create(&app, "Jane", "Doe").await;
        let uri = format!("/account/{}", id);

        let (status, body) = send(
            &app,
            Method::PATCH,
            &uri,
            Some(&token),
            Some(json!({"first_name": "Janet"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (_, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(body["first_name"], "Janet");
        assert_eq!(body["last_name"], "Doe");
        assert_eq!(body["account_number"], number);

        let (status, _) = send(&app, Method::PATCH, &uri, Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
        assert_eq!(body["first_name"], "Janet");
    }

    #[tokio::test]
    async fn test_delete_revokes_token() {
        let app = test_app(false);
        let (id, _, token) = create(&app, "Jane", "Doe").await;
        let (other_id, _, other_token) = create(&app, "John", "Roe").await;

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/account/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        // The deleted account's token no longer authenticates anywhere
        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/account/{}", other_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(
            &app,
            Method::GET,
            &format!("/account/{}", id),
            Some(&other_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &app,
            Method::DELETE,
            &format!("/account/{}", id),
            Some(&other_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_account_id() {
        let app = test_app(false);
        let (_, _, token) = create(&app, "Jane", "Doe").await;

        let (status, body) = send(&app, Method::GET, "/account/abc", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid account id"}));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let app = test_app(false);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/account")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_accounts() {
        let app = test_app(false);
        create(&app, "Jane", "Doe").await;
        create(&app, "John", "Roe").await;

        let (status, body) = send(&app, Method::GET, "/account", None, None).await;

        assert_eq!(status, StatusCode::OK);
        let accounts = body.as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["first_name"], "Jane");
        assert_eq!(accounts[1]["first_name"], "John");
        assert!(accounts.iter().all(|a| a.get("password").is_none()));
    }

    #[tokio::test]
    async fn test_transfer_echoes_request() {
        let app = test_app(false);

        let (status, body) = send(
            &app,
            Method::POST,
            "/transfer",
            None,
            Some(json!({"to_account": 100000002, "amount": 25.5})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"to_account": 100000002, "amount": 25.5}));
    }

    #[tokio::test]
    async fn test_metrics_and_trace_header() {
        let app = test_app(false);
        create(&app, "Jane", "Doe").await;
        send(&app, Method::GET, "/account/1", None, None).await;

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(TRACE_ID_HEADER));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains(
            "account_service_http_requests_total{route=\"/account\",method=\"POST\",status=\"2xx\"} 1"
        ));
        assert!(text.contains(
            "account_service_http_requests_total{route=\"/account/:id\",method=\"GET\",status=\"4xx\"} 1"
        ));
    }

    #[tokio::test]
    async fn test_sqlite_backed_flow() {
        let hasher = PasswordHasher::new(4);
        let db = Arc::new(DatabaseManager::new_in_memory().unwrap());
        let state = AppState::new(
            Arc::new(SqliteAccountStore::new(db, hasher)),
            TokenIssuer::new("test-secret", 900),
            hasher,
            false,
        );
        let app = build_router(state, &["http://localhost:3000".to_string()]);

        let (id, number, token) = create(&app, "Jane", "Doe").await;
        assert!(number > crate::db::repository::ACCOUNT_NUMBER_BASE);

        let (status, body) = send(
            &app,
            Method::GET,
            &format!("/account/{}", id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["account_number"], number);
    }

    #[tokio::test]
    async fn test_health_route() {
        let app = test_app(false);
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
