//! Mock prober for testing.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::catalog::merge::live_key;
use crate::catalog::{LiveEntry, ResolverEntry, VodEntry};
use crate::probe::{ProbeError, ProbeOutcome, Prober};

/// Mock implementation of the `Prober` trait.
///
/// Reachability is decided against a configured set of identifiers: the
/// `key` field for VOD entries, the structural identity key for lives, the
/// URL for resolvers and plain URLs. Results are returned in reverse input
/// order, so tests exercise key-based correlation rather than positional
/// luck. One probe call can be scripted to fail.
#[derive(Default)]
pub struct MockProber {
    reachable: Mutex<HashSet<String>>,
    fail_next: Mutex<bool>,
    batch_sizes: Mutex<Vec<usize>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an identifier (VOD key, live identity key, or URL) reachable.
    pub fn mark_reachable(&self, id: &str) {
        self.reachable.lock().unwrap().insert(id.to_string());
    }

    /// Make the next probe call fail with a capability error.
    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    /// Sizes of the batches probed so far.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    fn take_failure(&self) -> Result<(), ProbeError> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            return Err(ProbeError::Unavailable("simulated failure".to_string()));
        }
        Ok(())
    }

    fn probe_by<T, F>(&self, items: Vec<T>, id: F) -> Result<Vec<ProbeOutcome<T>>, ProbeError>
    where
        F: Fn(&T) -> String,
    {
        self.take_failure()?;
        self.batch_sizes.lock().unwrap().push(items.len());
        let reachable = self.reachable.lock().unwrap();
        let mut outcomes: Vec<ProbeOutcome<T>> = items
            .into_iter()
            .map(|entry| ProbeOutcome {
                reachable: reachable.contains(&id(&entry)),
                entry,
            })
            .collect();
        outcomes.reverse();
        Ok(outcomes)
    }
}

#[async_trait]
impl Prober for MockProber {
    async fn probe_vods(
        &self,
        items: Vec<VodEntry>,
    ) -> Result<Vec<ProbeOutcome<VodEntry>>, ProbeError> {
        self.probe_by(items, |e| e.key.clone())
    }

    async fn probe_lives(
        &self,
        items: Vec<LiveEntry>,
    ) -> Result<Vec<ProbeOutcome<LiveEntry>>, ProbeError> {
        self.probe_by(items, live_key)
    }

    async fn probe_resolvers(
        &self,
        items: Vec<ResolverEntry>,
    ) -> Result<Vec<ProbeOutcome<ResolverEntry>>, ProbeError> {
        self.probe_by(items, |e| e.url.clone())
    }

    async fn probe_urls(&self, urls: Vec<String>) -> Result<Vec<String>, ProbeError> {
        self.take_failure()?;
        self.batch_sizes.lock().unwrap().push(urls.len());
        let reachable = self.reachable.lock().unwrap();
        Ok(urls
            .into_iter()
            .filter(|u| reachable.contains(u))
            .collect())
    }
}
