//! Prometheus registry and text exposition.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(mergebox_core::metrics::FEED_FETCHES.clone()))
        .ok();
    registry
        .register(Box::new(mergebox_core::metrics::PROBE_BATCHES.clone()))
        .ok();
    registry
        .register(Box::new(mergebox_core::metrics::PROBE_RESULTS.clone()))
        .ok();
}

/// Render the registry in the Prometheus text format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
