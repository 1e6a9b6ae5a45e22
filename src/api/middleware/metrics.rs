//! HTTP request metrics rendered in the Prometheus text format

use crate::api::handlers::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Mutex;
use std::time::Instant;

pub const METRICS_NAMESPACE: &str = "account_service";

/// Prometheus default histogram buckets, in seconds
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct RequestKey {
    route: String,
    method: String,
}

#[derive(Debug, Clone)]
struct Histogram {
    // Cumulative counts, one per entry of DEFAULT_BUCKETS
    buckets: [u64; DEFAULT_BUCKETS.len()],
    count: u64,
    sum: f64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            buckets: [0; DEFAULT_BUCKETS.len()],
            count: 0,
            sum: 0.0,
        }
    }
}

impl Histogram {
    fn observe(&mut self, seconds: f64) {
        for (bound, bucket) in DEFAULT_BUCKETS.iter().zip(self.buckets.iter_mut()) {
            if seconds <= *bound {
                *bucket += 1;
            }
        }
        self.count += 1;
        self.sum += seconds;
    }
}

#[derive(Debug, Default)]
struct Registry {
    // (route, method) -> status class -> count
    requests: BTreeMap<RequestKey, BTreeMap<&'static str, u64>>,
    durations: BTreeMap<RequestKey, Histogram>,
}

/// Request counters and latency histograms keyed by route template and method
#[derive(Debug, Default)]
pub struct HttpMetrics {
    registry: Mutex<Registry>,
}

impl HttpMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one finished request
    pub fn record(&self, route: &str, method: &str, status: u16, seconds: f64) {
        let key = RequestKey {
            route: route.to_string(),
            method: method.to_string(),
        };

        let mut registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        *registry
            .requests
            .entry(key.clone())
            .or_default()
            .entry(status_class(status))
            .or_insert(0) += 1;
        registry.durations.entry(key).or_default().observe(seconds);
    }

    /// Number of requests recorded for a route, method and status class
    pub fn requests_total(&self, route: &str, method: &str, class: &str) -> u64 {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let key = RequestKey {
            route: route.to_string(),
            method: method.to_string(),
        };
        registry
            .requests
            .get(&key)
            .and_then(|by_class| by_class.get(class))
            .copied()
            .unwrap_or(0)
    }

    /// Render all series in the Prometheus text exposition format
    pub fn render(&self) -> String {
        let registry = self.registry.lock().unwrap_or_else(|e| e.into_inner());
        let mut output = String::new();

        let requests = format!("{}_http_requests_total", METRICS_NAMESPACE);
        let _ = writeln!(output, "# HELP {} Total number of HTTP requests", requests);
        let _ = writeln!(output, "# TYPE {} counter", requests);
        for (key, by_class) in &registry.requests {
            for (class, count) in by_class {
                let _ = writeln!(
                    output,
                    "{}{{route=\"{}\",method=\"{}\",status=\"{}\"}} {}",
                    requests, key.route, key.method, class, count
                );
            }
        }

        let duration = format!("{}_http_request_duration_seconds", METRICS_NAMESPACE);
        let _ = writeln!(output, "# HELP {} HTTP request latency in seconds", duration);
        let _ = writeln!(output, "# TYPE {} histogram", duration);
        for (key, histogram) in &registry.durations {
            let labels = format!("route=\"{}\",method=\"{}\"", key.route, key.method);
            for (bound, count) in DEFAULT_BUCKETS.iter().zip(histogram.buckets.iter()) {
                let _ = writeln!(
                    output,
                    "{}_bucket{{{},le=\"{}\"}} {}",
                    duration, labels, bound, count
                );
            }
            let _ = writeln!(
                output,
                "{}_bucket{{{},le=\"+Inf\"}} {}",
                duration, labels, histogram.count
            );
            let _ = writeln!(output, "{}_sum{{{}}} {}", duration, labels, histogram.sum);
            let _ = writeln!(output, "{}_count{{{}}} {}", duration, labels, histogram.count);
        }

        output
    }
}

/// Collapse a status code into its class label, e.g. 404 -> "4xx"
pub fn status_class(status: u16) -> &'static str {
    match status {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Route-layer middleware timing each request against its matched route
pub async fn track_metrics(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());
    let method = request.method().to_string();

    let start = Instant::now();
    let response = next.run(request).await;

    state.metrics.record(
        &route,
        &method,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}
