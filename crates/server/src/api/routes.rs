use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{catalog, handlers, playlist};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Catalog dataset
        .route("/catalog", get(catalog::get_catalog))
        .route("/catalog/load", post(catalog::load_catalog))
        .route("/catalog/feeds", post(catalog::push_catalog))
        .route("/catalog/check", post(catalog::check_catalog))
        .route("/catalog/check/subset", post(catalog::check_catalog_subset))
        .route("/catalog/check/lives", post(catalog::check_lives))
        .route("/catalog/check/resolvers", post(catalog::check_resolvers))
        .route("/catalog/remove", post(catalog::remove_entries))
        .route("/catalog/resolvers/remove", post(catalog::remove_resolvers))
        .route("/catalog/lives", post(catalog::add_live))
        .route("/catalog/lives/{index}", delete(catalog::remove_live))
        .route("/catalog/ads/{index}", delete(catalog::remove_ad))
        .route("/catalog/wallpaper", put(catalog::set_wallpaper))
        .route("/catalog/warning-text", put(catalog::set_warning_text))
        .route("/catalog/persist", post(catalog::persist_catalog))
        // Playlist dataset
        .route("/playlist", get(playlist::get_playlist))
        .route("/playlist/text", get(playlist::get_playlist_text))
        .route("/playlist/groups", get(playlist::get_groups))
        .route("/playlist/load", post(playlist::load_playlist))
        .route("/playlist/feeds", post(playlist::push_playlist))
        .route("/playlist/update", post(playlist::update_playlist))
        .route("/playlist/check", post(playlist::check_playlist))
        .route("/playlist/check/subset", post(playlist::check_playlist_subset))
        .route("/playlist/remove", post(playlist::remove_entries))
        .route("/playlist/groups", post(playlist::set_groups))
        .route("/playlist/groups/move", post(playlist::move_items))
        .route("/playlist/persist", post(playlist::persist_playlist))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/metrics", get(handlers::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
