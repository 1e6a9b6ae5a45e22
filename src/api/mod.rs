//! REST API module
//!
//! - HTTP server and routing
//! - Account, login and transfer handlers
//! - Request tracing and metrics middleware
//! - Request body and path extractors

pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod server;

pub use handlers::AppState;
pub use middleware::{trace_id_middleware, TraceId, TRACE_ID_HEADER};
pub use models::ErrorResponse;
pub use routes::build_router;
pub use server::ApiServer;
