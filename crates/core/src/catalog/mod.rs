//! Structured catalog feeds: parsing, merging, deduplication, probing.
//!
//! A catalog aggregates five independently-deduplicated collections (VOD
//! sources, live sources, resolvers, flags, ad-filter rules) plus a few
//! dataset-wide fields. [`CatalogStore`] owns the running dataset;
//! [`merge`] holds the pure identity-key and combination rules.

pub mod merge;
mod parse;
mod store;
mod types;

pub use parse::{parse_source, parse_source_with_comment, CatalogParseError, DEFAULT_COMMENT_SIGIL};
pub use store::{CatalogStore, CATALOG_STATE_KEY};
pub use types::{
    CatalogSource, ChannelGroup, FilterRule, IjkOption, IjkOptionGroup, LiveEntry, ResolverEntry,
    VodEntry,
};
