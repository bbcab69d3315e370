// Metrics and observability module
// This file handles collection and reporting of upstream call latency,
// route outcomes and dropped quotes
//
// Numan Thabit 2025 Nov

use once_cell::sync::Lazy;
use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec,
    Encoder, HistogramVec, TextEncoder,
};

pub static REQ_LATENCY: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "sor_request_latency_seconds",
        "latency for upstream calls",
        &["service", "method"]
    )
    .unwrap()
});

pub static REQ_ERRORS: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sor_request_errors_total",
        "errors by upstream",
        &["service", "method"]
    )
    .unwrap()
});

pub static ROUTE_OUTCOMES: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "sor_route_outcomes_total",
        "route computations by outcome (found, no_route, error)",
        &["outcome"]
    )
    .unwrap()
});

pub static QUOTES_DROPPED: Lazy<Counter> = Lazy::new(|| {
    register_counter!(
        "sor_quotes_dropped_total",
        "quotes dropped because a field was missing"
    )
    .unwrap()
});

/// Render the default registry in the prometheus text format.
pub fn render() -> String {
    let mut buf = Vec::new();
    let encoder = TextEncoder::new();
    if encoder.encode(&prometheus::gather(), &mut buf).is_err() {
        return String::new();
    }
    String::from_utf8(buf).unwrap_or_default()
}
