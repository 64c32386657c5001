//! End-to-end playlist lifecycle: fetch, append-merge, group edits, probe,
//! persist.

use std::sync::Arc;

use mergebox_core::testing::{MockFetcher, MockProber, MockStateStore};
use mergebox_core::{LinkStatus, PlaylistStore, PLAYLIST_STATE_KEY};

const FEED_ONE: &str = "CCTV,#genre#\nCCTV-1,http://live.example/cctv1.m3u8\nCCTV-2,http://live.example/cctv2.m3u8";
const FEED_TWO: &str = "CCTV,#genre#\nCCTV-1,http://live.example/cctv1.m3u8\nLocal,#genre#\nArchive,/data/archive.mp4";

fn build_store() -> (PlaylistStore, Arc<MockFetcher>, Arc<MockProber>, Arc<MockStateStore>) {
    let fetcher = Arc::new(MockFetcher::new());
    let prober = Arc::new(MockProber::new());
    let state_store = Arc::new(MockStateStore::new());
    let store = PlaylistStore::new(fetcher.clone(), prober.clone(), state_store.clone());
    (store, fetcher, prober, state_store)
}

#[tokio::test]
async fn test_full_playlist_lifecycle() {
    let (store, fetcher, prober, state_store) = build_store();
    fetcher.set_response("http://feeds.example/one.txt", FEED_ONE);
    fetcher.set_response("http://feeds.example/two.txt", FEED_TWO);

    store.load("http://feeds.example/one.txt").await;
    store.push("http://feeds.example/two.txt").await;

    // The duplicated marker and entry collapsed; the incoming CCTV group was
    // emptied by dedup and pruned at the concatenation boundary.
    let names: Vec<String> = store
        .entries()
        .await
        .iter()
        .map(|e| e.name.clone())
        .collect();
    assert_eq!(names, vec!["CCTV", "CCTV-1", "CCTV-2", "Local", "Archive"]);

    // Probe: only cctv1 is confirmed; the local file is out of scope.
    prober.mark_reachable("http://live.example/cctv1.m3u8");
    store.check().await;
    let entries = store.entries().await;
    assert_eq!(entries[1].online, LinkStatus::Online);
    assert_eq!(entries[2].online, LinkStatus::Offline);
    assert_eq!(entries[4].online, LinkStatus::Untested);
    // One batched call with both http URLs.
    assert_eq!(prober.batch_sizes(), vec![2]);

    // Persist writes the flat name,url serialization.
    store.persist().await;
    let saved = state_store.saved(PLAYLIST_STATE_KEY).unwrap();
    assert_eq!(
        saved,
        "CCTV,#genre#\nCCTV-1,http://live.example/cctv1.m3u8\nCCTV-2,http://live.example/cctv2.m3u8\nLocal,#genre#\nArchive,/data/archive.mp4"
    );
}

#[tokio::test]
async fn test_group_move_conserves_records() {
    let (store, fetcher, _, _) = build_store();
    fetcher.set_response("http://feed", FEED_ONE);
    store.load("http://feed").await;
    store.push("http://feed-two").await; // fails, no-op
    fetcher.set_response("http://feed-two", FEED_TWO);
    store.push("http://feed-two").await;

    let before = store.entries().await.len();
    let groups = store.groups().await;
    let from = groups[0].raw.as_ref().unwrap().hash.clone();
    let to = groups[1].raw.as_ref().unwrap().hash.clone();
    let moved: Vec<String> = groups[0]
        .items
        .iter()
        .take(1)
        .map(|e| e.hash.clone())
        .collect();

    store.move_items(&moved, &from, &to).await;

    let entries = store.entries().await;
    assert_eq!(entries.len(), before);
    let groups = store.groups().await;
    assert_eq!(groups[0].items.len(), 1);
    assert_eq!(groups[1].items.len(), 2);
    assert_eq!(groups[1].items[1].name, "CCTV-1");
}

#[tokio::test]
async fn test_group_view_round_trips_through_set_groups() {
    let (store, fetcher, _, _) = build_store();
    fetcher.set_response("http://feed", FEED_TWO);
    store.load("http://feed").await;

    let view = store.groups().await;
    store.set_groups(view.clone()).await;

    assert_eq!(store.groups().await, view);
}

#[tokio::test]
async fn test_failed_append_leaves_playlist_byte_identical() {
    let (store, fetcher, _, _) = build_store();
    fetcher.set_response("http://feed", FEED_ONE);
    fetcher.fail_on("http://gone");
    store.load("http://feed").await;

    let before = store.to_text().await;
    store.push("http://gone").await;
    assert_eq!(store.to_text().await, before);
}
