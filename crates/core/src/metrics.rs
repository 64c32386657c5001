//! Prometheus metrics for core components.
//!
//! Statics only; the server registers them into its registry and exposes
//! them on `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

/// Feed fetches by dataset ("catalog", "playlist") and result.
pub static FEED_FETCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mergebox_feed_fetches_total", "Total feed fetch attempts"),
        &["dataset", "result"], // "ok", "error"
    )
    .unwrap()
});

/// Probe batches issued, by entry kind.
pub static PROBE_BATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mergebox_probe_batches_total", "Total probe batches issued"),
        &["kind"], // "vod", "live", "resolver", "playlist"
    )
    .unwrap()
});

/// Individual probe results, by entry kind and outcome.
pub static PROBE_RESULTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("mergebox_probe_results_total", "Total per-entry probe results"),
        &["kind", "outcome"], // "reachable", "unreachable"
    )
    .unwrap()
});
