pub mod metrics;
pub mod trace;

pub use metrics::{track_metrics, HttpMetrics};
pub use trace::{trace_id_middleware, TraceId, TRACE_ID_HEADER};
