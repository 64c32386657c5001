//! The liveness-probing capability seam.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{LiveEntry, ResolverEntry, VodEntry};

/// Errors that can occur when the probe capability itself fails.
///
/// Distinct from a truthful all-offline result: callers fold an `Err` by
/// leaving every status untouched.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe unavailable: {0}")]
    Unavailable(String),

    #[error("probe task failed: {0}")]
    TaskFailed(String),
}

/// Result of probing one entry: reachability plus the entry echoed back.
///
/// The echo is what makes key-based correlation possible; callers must never
/// rely on result order matching input order.
#[derive(Debug, Clone)]
pub struct ProbeOutcome<T> {
    pub reachable: bool,
    pub entry: T,
}

/// Capability for checking reachability of dataset entries.
///
/// Every method takes the full candidate set in one batched call and is free
/// to reorder, batch internally, or drop individual results.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe_vods(
        &self,
        items: Vec<VodEntry>,
    ) -> Result<Vec<ProbeOutcome<VodEntry>>, ProbeError>;

    async fn probe_lives(
        &self,
        items: Vec<LiveEntry>,
    ) -> Result<Vec<ProbeOutcome<LiveEntry>>, ProbeError>;

    async fn probe_resolvers(
        &self,
        items: Vec<ResolverEntry>,
    ) -> Result<Vec<ProbeOutcome<ResolverEntry>>, ProbeError>;

    /// Probe a set of URLs and return the confirmed-reachable subset.
    async fn probe_urls(&self, urls: Vec<String>) -> Result<Vec<String>, ProbeError>;
}
