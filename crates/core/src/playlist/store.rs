//! The playlist dataset store: load, append-merge, probe, persist.
//!
//! Same discipline as the catalog store: the dataset mutex is held for an
//! operation's whole span, an advisory busy flag is raised alongside, and
//! failures degrade to "no progress" with a logged diagnostic.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use crate::fetch::{split_feed_list, Fetcher};
use crate::metrics;
use crate::persist::StateStore;
use crate::probe::Prober;
use crate::status::LinkStatus;

use super::merge::{append, dedupe, flatten_groups, group_view, move_items};
use super::parse::{parse_lines, to_text};
use super::types::{PlaylistEntry, PlaylistGroup};

/// Storage key for the serialized playlist.
pub const PLAYLIST_STATE_KEY: &str = "playlist-state";

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct PlaylistStore {
    fetcher: Arc<dyn Fetcher>,
    prober: Arc<dyn Prober>,
    state_store: Arc<dyn StateStore>,
    state: Mutex<Vec<PlaylistEntry>>,
    busy: AtomicBool,
}

impl PlaylistStore {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        prober: Arc<dyn Prober>,
        state_store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            fetcher,
            prober,
            state_store,
            state: Mutex::new(Vec::new()),
            busy: AtomicBool::new(false),
        }
    }

    /// Advisory in-flight indicator for callers that surface progress.
    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    async fn begin(&self) -> (MutexGuard<'_, Vec<PlaylistEntry>>, BusyGuard<'_>) {
        let state = self.state.lock().await;
        self.busy.store(true, Ordering::SeqCst);
        (state, BusyGuard(&self.busy))
    }

    async fn fetch_text(&self, uri: &str) -> Option<String> {
        let uri = uri.trim();
        if uri.is_empty() {
            return None;
        }
        match self.fetcher.fetch(uri).await {
            Ok(text) => {
                metrics::FEED_FETCHES
                    .with_label_values(&["playlist", "ok"])
                    .inc();
                Some(text)
            }
            Err(e) => {
                metrics::FEED_FETCHES
                    .with_label_values(&["playlist", "error"])
                    .inc();
                warn!(uri, error = %e, "playlist feed fetch failed");
                None
            }
        }
    }

    /// Replace the playlist wholesale from one feed.
    ///
    /// A failing fetch leaves the prior content untouched.
    pub async fn load(&self, uri: &str) {
        let (mut state, _busy) = self.begin().await;
        if let Some(text) = self.fetch_text(uri).await {
            let entries = dedupe(parse_lines(&text));
            info!(uri, records = entries.len(), "playlist loaded");
            *state = entries;
        }
    }

    /// Replace the playlist wholesale from already-fetched text.
    pub async fn update(&self, text: &str) {
        let (mut state, _busy) = self.begin().await;
        *state = dedupe(parse_lines(text));
    }

    /// Append-merge one feed into the playlist.
    pub async fn push(&self, uri: &str) {
        let (mut state, _busy) = self.begin().await;
        self.push_locked(&mut state, uri).await;
    }

    /// Append-merge every feed in a delimited list, one at a time, with
    /// per-feed failure isolation.
    pub async fn push_many(&self, list: &str) {
        let (mut state, _busy) = self.begin().await;
        for uri in split_feed_list(list) {
            self.push_locked(&mut state, &uri).await;
        }
    }

    async fn push_locked(&self, state: &mut Vec<PlaylistEntry>, uri: &str) {
        let Some(text) = self.fetch_text(uri).await else {
            return;
        };
        let merged = append(std::mem::take(state), parse_lines(&text));
        *state = merged;
    }

    /// Probe all HTTP entries and fold the confirmed-reachable set back by
    /// URL: confirmed is online, HTTP-but-unconfirmed is offline, non-HTTP
    /// records keep their prior status.
    pub async fn check(&self) {
        let (mut state, _busy) = self.begin().await;
        let urls: Vec<String> = state
            .iter()
            .filter(|e| e.http)
            .map(|e| e.url.clone())
            .collect();
        if urls.is_empty() {
            return;
        }
        metrics::PROBE_BATCHES
            .with_label_values(&["playlist"])
            .inc();
        match self.prober.probe_urls(urls).await {
            Ok(confirmed) => {
                let confirmed: HashSet<String> = confirmed.into_iter().collect();
                let entries = std::mem::take(&mut *state)
                    .into_iter()
                    .map(|mut entry| {
                        if confirmed.contains(&entry.url) {
                            entry.online = LinkStatus::Online;
                        } else if entry.http {
                            entry.online = LinkStatus::Offline;
                        }
                        entry
                    })
                    .collect();
                *state = entries;
            }
            Err(e) => warn!(error = %e, "url probe failed, statuses left untouched"),
        }
    }

    /// Probe an arbitrary subset of records and fold statuses back into the
    /// full playlist; records outside the subset are left untouched.
    pub async fn check_by(&self, items: &[PlaylistEntry]) {
        let (mut state, _busy) = self.begin().await;
        let urls: Vec<String> = items
            .iter()
            .filter(|e| e.http)
            .map(|e| e.url.clone())
            .collect();
        if urls.is_empty() {
            return;
        }
        let subset: HashSet<&str> = items.iter().map(|e| e.url.as_str()).collect();
        metrics::PROBE_BATCHES
            .with_label_values(&["playlist"])
            .inc();
        match self.prober.probe_urls(urls).await {
            Ok(confirmed) => {
                let confirmed: HashSet<String> = confirmed.into_iter().collect();
                let entries = std::mem::take(&mut *state)
                    .into_iter()
                    .map(|mut entry| {
                        if subset.contains(entry.url.as_str()) && entry.http {
                            entry.online = if confirmed.contains(&entry.url) {
                                LinkStatus::Online
                            } else {
                                LinkStatus::Offline
                            };
                        }
                        entry
                    })
                    .collect();
                *state = entries;
            }
            Err(e) => warn!(error = %e, "url probe failed, statuses left untouched"),
        }
    }

    /// Remove records matching the given list's `name + "-" + url` compound
    /// keys.
    pub async fn remove_by(&self, items: &[PlaylistEntry]) {
        let (mut state, _busy) = self.begin().await;
        let keys: HashSet<String> = items
            .iter()
            .map(|e| format!("{}-{}", e.name, e.url))
            .collect();
        let entries: Vec<PlaylistEntry> = std::mem::take(&mut *state)
            .into_iter()
            .filter(|e| !keys.contains(&format!("{}-{}", e.name, e.url)))
            .collect();
        *state = entries;
    }

    /// The derived grouping view.
    pub async fn groups(&self) -> Vec<PlaylistGroup> {
        let state = self.state.lock().await;
        group_view(&state)
    }

    /// Replace the playlist with a flattened grouping view; the supported
    /// way to reorder or restructure groups.
    pub async fn set_groups(&self, groups: Vec<PlaylistGroup>) {
        let mut state = self.state.lock().await;
        *state = flatten_groups(groups);
    }

    /// Move records (by hash) from one group to another.
    pub async fn move_items(&self, hashes: &[String], from: &str, to: &str) {
        let mut state = self.state.lock().await;
        let moved = move_items(std::mem::take(&mut *state), hashes, from, to);
        *state = moved;
    }

    /// Clone of the current records.
    pub async fn entries(&self) -> Vec<PlaylistEntry> {
        self.state.lock().await.clone()
    }

    /// The playlist serialized back to `name,url` lines.
    pub async fn to_text(&self) -> String {
        let state = self.state.lock().await;
        to_text(&state)
    }

    /// Write the serialized playlist under its storage key.
    pub async fn persist(&self) {
        let (state, _busy) = self.begin().await;
        let text = to_text(&state);
        if let Err(e) = self.state_store.save(PLAYLIST_STATE_KEY, &text) {
            warn!(error = %e, "playlist persist failed");
        }
    }

    /// Reload the last persisted playlist, if any.
    pub async fn restore(&self) {
        let (mut state, _busy) = self.begin().await;
        match self.state_store.load(PLAYLIST_STATE_KEY) {
            Ok(Some(text)) => *state = dedupe(parse_lines(&text)),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "playlist restore failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockFetcher, MockProber, MockStateStore};

    fn store_with(
        fetcher: MockFetcher,
        prober: MockProber,
    ) -> (PlaylistStore, Arc<MockStateStore>) {
        let state_store = Arc::new(MockStateStore::new());
        let store = PlaylistStore::new(
            Arc::new(fetcher),
            Arc::new(prober),
            state_store.clone(),
        );
        (store, state_store)
    }

    #[tokio::test]
    async fn test_load_dedupes() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Group1,\nMovie1,http://x\nMovie1,http://x");
        let (store, _) = store_with(fetcher, MockProber::new());

        store.load("http://feed").await;

        let entries = store.entries().await;
        assert_eq!(entries.len(), 2);
        assert!(entries[0].group);
        assert_eq!(entries[1].name, "Movie1");
    }

    #[tokio::test]
    async fn test_push_failure_leaves_playlist_unchanged() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Movie1,http://x");
        fetcher.fail_on("http://broken");
        let (store, _) = store_with(fetcher, MockProber::new());

        store.load("http://feed").await;
        let before = store.to_text().await;
        store.push("http://broken").await;
        assert_eq!(store.to_text().await, before);
    }

    #[tokio::test]
    async fn test_check_folds_confirmed_urls() {
        let fetcher = MockFetcher::new();
        fetcher.set_response(
            "http://feed",
            "Group1,\nMovie1,http://x\nMovie2,http://y\nLocal,/data/a.mp4",
        );
        let prober = MockProber::new();
        prober.mark_reachable("http://x");
        let (store, _) = store_with(fetcher, prober);

        store.load("http://feed").await;
        store.check().await;

        let entries = store.entries().await;
        // Marker untouched, confirmed online, http-unconfirmed offline,
        // non-http untouched.
        assert_eq!(entries[0].online, LinkStatus::Untested);
        assert_eq!(entries[1].online, LinkStatus::Online);
        assert_eq!(entries[2].online, LinkStatus::Offline);
        assert_eq!(entries[3].online, LinkStatus::Untested);
    }

    #[tokio::test]
    async fn test_check_probe_failure_leaves_statuses() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Movie1,http://x");
        let prober = MockProber::new();
        prober.fail_next();
        let (store, _) = store_with(fetcher, prober);

        store.load("http://feed").await;
        store.check().await;

        assert_eq!(store.entries().await[0].online, LinkStatus::Untested);
    }

    #[tokio::test]
    async fn test_check_by_scopes_to_subset() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Movie1,http://x\nMovie2,http://y");
        let prober = MockProber::new();
        let (store, _) = store_with(fetcher, prober);

        store.load("http://feed").await;
        let subset = vec![store.entries().await[0].clone()];
        store.check_by(&subset).await;

        let entries = store.entries().await;
        assert_eq!(entries[0].online, LinkStatus::Offline);
        assert_eq!(entries[1].online, LinkStatus::Untested);
    }

    #[tokio::test]
    async fn test_remove_by_compound_key() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Movie1,http://x\nMovie2,http://y");
        let (store, _) = store_with(fetcher, MockProber::new());

        store.load("http://feed").await;
        let target = store.entries().await[0].clone();
        store.remove_by(&[target]).await;

        let entries = store.entries().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Movie2");
    }

    #[tokio::test]
    async fn test_persist_and_restore_round_trip() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Group1,\nMovie1,http://x");
        let (store, state_store) = store_with(fetcher, MockProber::new());
        store.load("http://feed").await;
        store.persist().await;

        assert_eq!(
            state_store.saved(PLAYLIST_STATE_KEY).unwrap(),
            "Group1,\nMovie1,http://x"
        );

        let restored =
            PlaylistStore::new(Arc::new(MockFetcher::new()), Arc::new(MockProber::new()), state_store);
        restored.restore().await;
        assert_eq!(restored.entries().await.len(), 2);
    }

    #[tokio::test]
    async fn test_move_items_between_groups() {
        let fetcher = MockFetcher::new();
        fetcher.set_response("http://feed", "Group1,\nA,http://a\nGroup2,\nB,http://b");
        let (store, _) = store_with(fetcher, MockProber::new());
        store.load("http://feed").await;

        let groups = store.groups().await;
        let from = groups[0].raw.as_ref().unwrap().hash.clone();
        let to = groups[1].raw.as_ref().unwrap().hash.clone();
        let moved = vec![groups[0].items[0].hash.clone()];
        store.move_items(&moved, &from, &to).await;

        let groups = store.groups().await;
        assert!(groups[0].items.is_empty());
        assert_eq!(groups[1].items.len(), 2);
    }
}
