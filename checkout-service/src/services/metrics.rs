//! Metrics module for checkout-service.
//! HTTP request metrics come from the `metrics` recorder; checkout counters
//! live in the default Prometheus registry. Both are rendered by `/metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use prometheus::{
    histogram_opts, opts, register_histogram_vec, register_int_counter_vec, Encoder,
    HistogramVec, IntCounterVec, TextEncoder,
};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Database query duration histogram
pub static DB_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        histogram_opts!(
            "checkout_db_query_duration_seconds",
            "Database query duration"
        ),
        &["operation"]
    )
    .expect("Failed to register DB_QUERY_DURATION")
});

/// Barcode scans by outcome (hit / miss)
pub static SCANS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!("checkout_scans_total", "Total barcode scans by result"),
        &["result"]
    )
    .expect("Failed to register SCANS_TOTAL")
});

/// Gateway order creations by outcome
pub static PAYMENT_ORDERS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "checkout_payment_orders_total",
            "Total payment orders created by status"
        ),
        &["status"]
    )
    .expect("Failed to register PAYMENT_ORDERS_TOTAL")
});

/// Payment signature checks by outcome
pub static PAYMENT_VERIFICATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        opts!(
            "checkout_payment_verifications_total",
            "Total payment signature verifications by result"
        ),
        &["result"]
    )
    .expect("Failed to register PAYMENT_VERIFICATIONS_TOTAL")
});

/// Install the HTTP metrics recorder and register checkout counters.
/// Safe to call more than once; only the first call installs the recorder.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_none() {
        match PrometheusBuilder::new().install_recorder() {
            Ok(handle) => {
                let _ = METRICS_HANDLE.set(handle);
            }
            Err(e) => tracing::warn!(error = %e, "Prometheus recorder not installed"),
        }
    }

    // Force initialization of lazy statics
    let _ = &*DB_QUERY_DURATION;
    let _ = &*SCANS_TOTAL;
    let _ = &*PAYMENT_ORDERS_TOTAL;
    let _ = &*PAYMENT_VERIFICATIONS_TOTAL;
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_ok() {
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

pub fn record_scan(result: &str) {
    SCANS_TOTAL.with_label_values(&[result]).inc();
}

pub fn record_payment_order(status: &str) {
    PAYMENT_ORDERS_TOTAL.with_label_values(&[status]).inc();
}

pub fn record_payment_verification(result: &str) {
    PAYMENT_VERIFICATIONS_TOTAL.with_label_values(&[result]).inc();
}
