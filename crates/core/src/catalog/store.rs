//! The catalog dataset store: load, merge, probe, persist.
//!
//! One instance owns one running dataset. Every public operation acquires
//! the dataset mutex for its whole span, so mutating operations are
//! serialized; an advisory busy flag is raised alongside for callers that
//! want to surface in-flight work. No public operation returns an error:
//! fetch, parse, probe and persist failures all degrade to "no progress for
//! this step" with a logged diagnostic.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::fetch::{split_feed_list, Fetcher};
use crate::metrics;
use crate::persist::StateStore;
use crate::probe::{ProbeOutcome, Prober};

use super::merge::{
    backfill_scraper, derive_features, fold_statuses, live_key, merge_sources, resolver_key,
};
use super::parse::parse_source;
use super::types::{CatalogSource, LiveEntry, ResolverEntry, VodEntry};

/// Storage key for the serialized catalog dataset.
pub const CATALOG_STATE_KEY: &str = "catalog-state";

/// Clears the advisory busy flag on every exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct CatalogStore {
    fetcher: Arc<dyn Fetcher>,
    prober: Arc<dyn Prober>,
    state_store: Arc<dyn StateStore>,
    state: Mutex<Option<CatalogSource>>,
    busy: AtomicBool,
}

impl CatalogStore {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        prober: Arc<dyn Prober>,
        state_store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            fetcher,
            prober,
            state_store,
            state: Mutex::new(None),
            busy: AtomicBool::new(false),
        }
    }

    /// Advisory in-flight indicator for callers that surface progress.
    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    async fn begin(&self) -> (MutexGuard<'_, Option<CatalogSource>>, BusyGuard<'_>) {
        let state = self.state.lock().await;
        self.busy.store(true, Ordering::SeqCst);
        (state, BusyGuard(&self.busy))
    }

    async fn fetch_source(&self, uri: &str) -> Option<CatalogSource> {
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }
        let raw = match self.fetcher.fetch(uri).await {
            Ok(raw) => {
                metrics::FEED_FETCHES
                    .with_label_values(&["catalog", "ok"])
                    .inc();
                raw
            }
            Err(e) => {
                metrics::FEED_FETCHES
                    .with_label_values(&["catalog", "error"])
                    .inc();
                warn!(uri, error = %e, "catalog feed fetch failed");
                return None;
            }
        };
        match parse_source(&raw) {
            Ok(mut source) => {
                derive_features(&mut source.sites);
                Some(source)
            }
            Err(e) => {
                warn!(uri, error = %e, "catalog feed parse failed");
                None
            }
        }
    }

    /// Replace the working dataset wholesale from one feed.
    ///
    /// A failing fetch or parse leaves the prior dataset untouched.
    pub async fn load(&self, uri: &str) {
        let (mut state, _busy) = self.begin().await;
        if let Some(source) = self.fetch_source(uri).await {
            info!(
                uri,
                sites = source.sites.len(),
                lives = source.lives.len(),
                "catalog loaded"
            );
            *state = Some(source);
        }
    }

    /// Merge one feed into the working dataset.
    pub async fn push(&self, uri: &str) {
        let (mut state, _busy) = self.begin().await;
        self.push_locked(&mut state, uri).await;
    }

    /// Merge every feed in a delimited list, one at a time.
    ///
    /// Strictly sequential so first-seen-wins identity stays deterministic;
    /// a failing feed is skipped and the loop continues.
    pub async fn push_many(&self, list: &str) {
        let (mut state, _busy) = self.begin().await;
        for uri in split_feed_list(list) {
            self.push_locked(&mut state, &uri).await;
        }
    }

    async fn push_locked(&self, state: &mut Option<CatalogSource>, uri: &str) {
        let Some(incoming) = self.fetch_source(uri).await else {
            return;
        };
        let merged = match state.take() {
            None => incoming,
            Some(existing) => merge_sources(existing, incoming),
        };
        *state = Some(merged);
    }

    /// Probe every VOD entry and fold statuses back by `key`.
    pub async fn check(&self) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        let items = source.sites.clone();
        Self::check_vods_into(&self.prober, source, items).await;
    }

    /// Probe an arbitrary subset of VOD entries and fold statuses back into
    /// the full dataset; entries outside the subset are left untouched.
    pub async fn check_vods_by(&self, items: Vec<VodEntry>) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        Self::check_vods_into(&self.prober, source, items).await;
    }

    async fn check_vods_into(
        prober: &Arc<dyn Prober>,
        source: &mut CatalogSource,
        items: Vec<VodEntry>,
    ) {
        if items.is_empty() {
            return;
        }
        metrics::PROBE_BATCHES.with_label_values(&["vod"]).inc();
        match prober.probe_vods(items).await {
            Ok(results) => {
                record_outcomes("vod", &results);
                let sites = fold_statuses(
                    std::mem::take(&mut source.sites),
                    &results,
                    |e| e.key.clone(),
                    |e, s| e.status = s,
                );
                source.sites = sites;
            }
            Err(e) => warn!(error = %e, "vod probe failed, statuses left untouched"),
        }
    }

    /// Probe live entries (all, or an explicit subset) and fold statuses
    /// back by structural identity key.
    pub async fn check_lives(&self, subset: Option<Vec<LiveEntry>>) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        let items = subset.unwrap_or_else(|| source.lives.clone());
        if items.is_empty() {
            return;
        }
        metrics::PROBE_BATCHES.with_label_values(&["live"]).inc();
        match self.prober.probe_lives(items).await {
            Ok(results) => {
                record_outcomes("live", &results);
                let lives = fold_statuses(
                    std::mem::take(&mut source.lives),
                    &results,
                    live_key,
                    |e, s| e.status = s,
                );
                source.lives = lives;
            }
            Err(e) => warn!(error = %e, "live probe failed, statuses left untouched"),
        }
    }

    /// Probe resolver entries (all, or an explicit subset) and fold statuses
    /// back by resolver URL.
    pub async fn check_resolvers(&self, subset: Option<Vec<ResolverEntry>>) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        let items = match subset {
            Some(items) => items,
            None => source.parses.clone().unwrap_or_default(),
        };
        if items.is_empty() {
            return;
        }
        metrics::PROBE_BATCHES
            .with_label_values(&["resolver"])
            .inc();
        match self.prober.probe_resolvers(items).await {
            Ok(results) => {
                record_outcomes("resolver", &results);
                let parses = fold_statuses(
                    source.parses.take().unwrap_or_default(),
                    &results,
                    resolver_key,
                    |e, s| e.status = s,
                );
                source.parses = Some(parses);
            }
            Err(e) => warn!(error = %e, "resolver probe failed, statuses left untouched"),
        }
    }

    /// Remove VOD entries matching the given list's `name + "-" + key`
    /// compound keys.
    pub async fn remove_vods_by(&self, items: &[VodEntry]) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        let keys: HashSet<String> = items
            .iter()
            .map(|i| format!("{}-{}", i.name, i.key))
            .collect();
        let sites: Vec<VodEntry> = std::mem::take(&mut source.sites)
            .into_iter()
            .filter(|i| !keys.contains(&format!("{}-{}", i.name, i.key)))
            .collect();
        source.sites = sites;
    }

    /// Remove resolvers matching the given list's `name + "-" + url`
    /// compound keys.
    pub async fn remove_resolvers_by(&self, items: &[ResolverEntry]) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        let Some(parses) = source.parses.take() else {
            return;
        };
        let keys: HashSet<String> = items
            .iter()
            .map(|i| format!("{}-{}", i.name, i.url))
            .collect();
        let parses: Vec<ResolverEntry> = parses
            .into_iter()
            .filter(|i| !keys.contains(&format!("{}-{}", i.name, i.url)))
            .collect();
        source.parses = Some(parses);
    }

    /// Index-based removal for order-sensitive collections. Callers must
    /// snapshot the index immediately before calling; out-of-range is a
    /// no-op.
    pub async fn remove_live(&self, index: usize) {
        let (mut state, _busy) = self.begin().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        if index < source.lives.len() {
            source.lives.remove(index);
        }
    }

    /// Index-based resolver removal; see [`Self::remove_live`].
    pub async fn remove_resolver(&self, index: usize) {
        let (mut state, _busy) = self.begin().await;
        let Some(parses) = state.as_mut().and_then(|s| s.parses.as_mut()) else {
            return;
        };
        if index < parses.len() {
            parses.remove(index);
        }
    }

    /// Index-based ad-host removal; see [`Self::remove_live`].
    pub async fn remove_ad(&self, index: usize) {
        let (mut state, _busy) = self.begin().await;
        let Some(ads) = state.as_mut().and_then(|s| s.ads.as_mut()) else {
            return;
        };
        if index < ads.len() {
            ads.remove(index);
        }
    }

    /// Append a live entry unless one with the same playback URL exists.
    pub async fn add_live(&self, entry: LiveEntry) {
        let mut state = self.state.lock().await;
        let Some(source) = state.as_mut() else {
            return;
        };
        if !source.lives.iter().any(|l| l.url == entry.url) {
            source.lives.push(entry);
        }
    }

    pub async fn set_wallpaper(&self, wallpaper: &str) {
        let mut state = self.state.lock().await;
        if let Some(source) = state.as_mut() {
            source.wallpaper = Some(wallpaper.to_string());
        }
    }

    pub async fn set_warning_text(&self, text: &str) {
        let mut state = self.state.lock().await;
        if let Some(source) = state.as_mut() {
            source.warning_text = Some(text.to_string());
        }
    }

    /// Clone of the live dataset.
    pub async fn snapshot(&self) -> Option<CatalogSource> {
        self.state.lock().await.clone()
    }

    /// The live dataset serialized as JSON, without persistence backfill.
    pub async fn to_text(&self) -> Option<String> {
        let state = self.state.lock().await;
        state.as_ref().and_then(|s| serde_json::to_string(s).ok())
    }

    /// Write the persistence view of the dataset.
    ///
    /// The view is a deep copy with the scraper default backfilled; the live
    /// dataset keeps the distinction between inherited and explicit scraper
    /// references.
    pub async fn persist(&self) {
        let (state, _busy) = self.begin().await;
        let Some(source) = state.as_ref() else {
            return;
        };
        let mut snapshot = source.clone();
        let default = snapshot.spider.clone();
        backfill_scraper(&mut snapshot.sites, default.as_deref());
        let text = match serde_json::to_string_pretty(&snapshot) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "catalog serialization failed");
                return;
            }
        };
        if let Err(e) = self.state_store.save(CATALOG_STATE_KEY, &text) {
            warn!(error = %e, "catalog persist failed");
        }
    }

    /// Reload the last persisted dataset, if any.
    pub async fn restore(&self) {
        let (mut state, _busy) = self.begin().await;
        match self.state_store.load(CATALOG_STATE_KEY) {
            Ok(Some(text)) => match parse_source(&text) {
                Ok(source) => *state = Some(source),
                Err(e) => warn!(error = %e, "persisted catalog state is unreadable"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "catalog restore failed"),
        }
    }
}

fn record_outcomes<T>(kind: &str, results: &[ProbeOutcome<T>]) {
    let reachable = results.iter().filter(|r| r.reachable).count();
    metrics::PROBE_RESULTS
        .with_label_values(&[kind, "reachable"])
        .inc_by(reachable as u64);
    metrics::PROBE_RESULTS
        .with_label_values(&[kind, "unreachable"])
        .inc_by((results.len() - reachable) as u64);
}
