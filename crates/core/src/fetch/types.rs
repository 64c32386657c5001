//! The feed-fetching capability seam.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching feed content.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("empty feed location")]
    EmptyLocation,

    #[error("request failed: {0}")]
    Request(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("location is neither a URL nor an existing file: {0}")]
    UnknownLocation(String),
}

/// Capability for reading raw feed content from a user-supplied location.
///
/// Implementations decide which location shapes they support; the mergers
/// only ever see the returned text and treat every failure as an empty feed.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<String, FetchError>;
}
