//! Metrics helpers for the composition and publishing engine.
//!
//! Thin wrappers around the `metrics` macros so callers never deal with
//! metric name strings directly.

use metrics::{counter, histogram};

pub fn save_success() {
    counter!("composer_saves_success_total").increment(1);
}

pub fn save_error() {
    counter!("composer_saves_error_total").increment(1);
}

pub fn save_skipped_unchanged() {
    counter!("composer_saves_skipped_unchanged_total").increment(1);
}

pub fn publish_success() {
    counter!("composer_publishes_success_total").increment(1);
}

pub fn publish_error() {
    counter!("composer_publishes_error_total").increment(1);
}

pub fn validation_failed() {
    counter!("composer_validation_failures_total").increment(1);
}

pub fn conflicts_resolved(count: usize) {
    counter!("composer_conflicts_resolved_total").increment(count as u64);
}

pub fn enrichment_applied(modules: usize) {
    counter!("composer_enriched_modules_total").increment(modules as u64);
}

pub fn enrichment_discarded_stale() {
    counter!("composer_enrichment_discarded_stale_total").increment(1);
}

pub fn gateway_call(endpoint: &'static str, seconds: f64) {
    histogram!("composer_gateway_call_seconds", "endpoint" => endpoint).record(seconds);
}

pub fn gateway_error(endpoint: &'static str) {
    counter!("composer_gateway_errors_total", "endpoint" => endpoint).increment(1);
}
