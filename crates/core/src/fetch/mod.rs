//! Fetching raw feed content from user-supplied locations.

mod http;
mod types;

pub use http::HttpFetcher;
pub use types::{FetchError, Fetcher};

/// Whether a string is an http(s) URL. Probing and playlist classification
/// are scoped to these.
pub fn is_http_url(value: &str) -> bool {
    let lower = value.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Split a user-pasted list of feed locations on common delimiters.
///
/// Feeds are merged strictly in the order they appear here; callers rely on
/// that for deterministic first-seen-wins identity.
pub fn split_feed_list(list: &str) -> Vec<String> {
    list.split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
