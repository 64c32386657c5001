pub mod catalog;
pub mod config;
pub mod fetch;
pub mod identity;
pub mod metrics;
pub mod persist;
pub mod playlist;
pub mod probe;
pub mod status;
pub mod testing;

pub use catalog::{
    parse_source, CatalogParseError, CatalogSource, CatalogStore, ChannelGroup, FilterRule,
    LiveEntry, ResolverEntry, VodEntry, CATALOG_STATE_KEY,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, FetchConfig,
    ProbeConfig,
};
pub use fetch::{split_feed_list, FetchError, Fetcher, HttpFetcher};
pub use identity::content_hash;
pub use persist::{PersistError, SqliteStateStore, StateStore};
pub use playlist::{PlaylistEntry, PlaylistGroup, PlaylistStore, PLAYLIST_STATE_KEY};
pub use probe::{NetProber, ProbeError, ProbeOutcome, Prober};
pub use status::LinkStatus;
