//! Catalog API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use mergebox_core::{CatalogSource, LiveEntry, ResolverEntry, VodEntry};

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
pub struct EntriesRequest {
    #[serde(default)]
    pub entries: Vec<VodEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ResolversRequest {
    #[serde(default)]
    pub entries: Vec<ResolverEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ValueRequest {
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub source: Option<CatalogSource>,
    pub busy: bool,
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

/// GET /api/v1/catalog
pub async fn get_catalog(State(state): State<Arc<AppState>>) -> Json<CatalogResponse> {
    Json(CatalogResponse {
        source: state.catalog().snapshot().await,
        busy: state.catalog().busy(),
    })
}

/// POST /api/v1/catalog/load
///
/// Wholesale replace from one feed.
pub async fn load_catalog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedRequest>,
) -> Json<SuccessResponse> {
    state.catalog().load(request.feeds.trim()).await;
    ok()
}

/// POST /api/v1/catalog/feeds
///
/// Merge every listed feed into the running dataset.
pub async fn push_catalog(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FeedRequest>,
) -> Json<SuccessResponse> {
    state.catalog().push_many(&request.feeds).await;
    ok()
}

/// POST /api/v1/catalog/check
pub async fn check_catalog(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.catalog().check().await;
    ok()
}

/// POST /api/v1/catalog/check/subset
pub async fn check_catalog_subset(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EntriesRequest>,
) -> Json<SuccessResponse> {
    state.catalog().check_vods_by(request.entries).await;
    ok()
}

/// POST /api/v1/catalog/check/lives
pub async fn check_lives(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.catalog().check_lives(None).await;
    ok()
}

/// POST /api/v1/catalog/check/resolvers
pub async fn check_resolvers(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.catalog().check_resolvers(None).await;
    ok()
}

/// POST /api/v1/catalog/remove
pub async fn remove_entries(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EntriesRequest>,
) -> Json<SuccessResponse> {
    state.catalog().remove_vods_by(&request.entries).await;
    ok()
}

/// POST /api/v1/catalog/resolvers/remove
pub async fn remove_resolvers(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResolversRequest>,
) -> Json<SuccessResponse> {
    state.catalog().remove_resolvers_by(&request.entries).await;
    ok()
}

/// DELETE /api/v1/catalog/lives/{index}
pub async fn remove_live(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Json<SuccessResponse> {
    state.catalog().remove_live(index).await;
    ok()
}

/// DELETE /api/v1/catalog/ads/{index}
pub async fn remove_ad(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Json<SuccessResponse> {
    state.catalog().remove_ad(index).await;
    ok()
}

/// POST /api/v1/catalog/lives
pub async fn add_live(
    State(state): State<Arc<AppState>>,
    Json(entry): Json<LiveEntry>,
) -> Json<SuccessResponse> {
    state.catalog().add_live(entry).await;
    ok()
}

/// PUT /api/v1/catalog/wallpaper
pub async fn set_wallpaper(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValueRequest>,
) -> Json<SuccessResponse> {
    state.catalog().set_wallpaper(&request.value).await;
    ok()
}

/// PUT /api/v1/catalog/warning-text
pub async fn set_warning_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ValueRequest>,
) -> Json<SuccessResponse> {
    state.catalog().set_warning_text(&request.value).await;
    ok()
}

/// POST /api/v1/catalog/persist
pub async fn persist_catalog(State(state): State<Arc<AppState>>) -> Json<SuccessResponse> {
    state.catalog().persist().await;
    ok()
}
