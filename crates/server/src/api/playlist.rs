//! Playlist API handlers.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use mergebox_core::{PlaylistEntry, PlaylistGroup};

use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FeedRequest {
    /// One feed location, or several separated by common delimiters.
    pub feeds: String,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct EntriesRequest {
    #[serde(default)]
    pub entries: Vec<PlaylistEntry>,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub hashes: Vec<String>,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    pub entries: Vec<PlaylistEntry>,
    pub busy: bool,
}

#[derive(Debug, Serialize)]
pub struct GroupsResponse {
    pub groups: Vec<PlaylistGroup>,
}

#[derive(Debug, Deserialize)]
pub struct GroupsRequest {
    pub groups: Vec<PlaylistGroup>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

fn ok() -> Json<SuccessResponse> {
    Json(SuccessResponse {
        message: "ok".to_string(),
    })
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/playlist
pub async fn get_playlist(State(state): State<Arc<AppState>>) -> Json<PlaylistResponse> {
    Json(PlaylistResponse {
        entries: state.playlist().entries().await,
        busy: state.playlist().busy(),
    })
}

/// GET /api/v1/playlist/text
pub async fn get_playlist_text(State(state): State<Arc<AppState>>) -> String {
    state.playlist().to_text().await
}

/// GET /api/v1/playlist/groups
pub async fn get_groups(State(state): State<Arc<AppState>>) -> Json<GroupsResponse> {
    Json(GroupsResponse {
        groups: state.playlist().groups().await,
    })
}

/// POST /api/v1/playlist/load
pub async fn load_playlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedRequest>,
) -> Json<SuccessResponse> {
    state.playlist().load(request.feeds.trim()).await;
    ok()
}

/// POST /api/v1/playlist/feeds
pub async fn push_playlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedRequest>,
) -> Json<SuccessResponse> {
    state.playlist().push_many(&request.feeds).await;
    ok()
}

/// POST /api/v1/playlist/update
///
/// Wholesale replace from already-edited text.
pub async fn update_playlist(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> Json<SuccessResponse> {
    state.playlist().update(&request.text).await;
    ok()
}

/// POST /api/v1/playlist/check
pub async fn check_playlist(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.playlist().check().await;
    ok()
}

/// POST /api/v1/playlist/check/subset
pub async fn check_playlist_subset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EntriesRequest>,
) -> Json<SuccessResponse> {
    state.playlist().check_by(&request.entries).await;
    ok()
}

/// POST /api/v1/playlist/remove
pub async fn remove_entries(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EntriesRequest>,
) -> Json<SuccessResponse> {
    state.playlist().remove_by(&request.entries).await;
    ok()
}

/// POST /api/v1/playlist/groups
///
/// Replace the playlist with a flattened grouping view.
pub async fn set_groups(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GroupsRequest>,
) -> Json<SuccessResponse> {
    state.playlist().set_groups(request.groups).await;
    ok()
}

/// POST /api/v1/playlist/groups/move
pub async fn move_items(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MoveRequest>,
) -> Json<SuccessResponse> {
    state
        .playlist()
        .move_items(&request.hashes, &request.from, &request.to)
        .await;
    ok()
}

/// POST /api/v1/playlist/persist
pub async fn persist_playlist(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.playlist().persist().await;
    ok()
}
