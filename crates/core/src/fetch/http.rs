//! HTTP and local-file fetcher.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::FetchConfig;

use super::types::{FetchError, Fetcher};

/// Production fetcher: HTTP(S) URLs via a shared client, everything else is
/// tried as a local file path.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(FetchError::EmptyLocation);
        }

        // A parseable URL with a host goes over the network; bare paths and
        // scheme-less strings fall through to the filesystem.
        if let Some(href) = url::Url::parse(uri).ok().filter(|u| u.has_host()) {
            let response = self
                .client
                .get(href)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| FetchError::Request(e.to_string()))?;
            return response
                .text()
                .await
                .map_err(|e| FetchError::Request(e.to_string()));
        }

        if Path::new(uri).exists() {
            return Ok(tokio::fs::read_to_string(uri).await?);
        }

        Err(FetchError::UnknownLocation(uri.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::new(&FetchConfig::default())
    }

    #[tokio::test]
    async fn test_fetch_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Group1,").unwrap();
        writeln!(file, "Movie1,http://x").unwrap();

        let content = fetcher().fetch(file.path().to_str().unwrap()).await.unwrap();
        assert!(content.contains("Movie1,http://x"));
    }

    #[tokio::test]
    async fn test_fetch_empty_location() {
        let result = fetcher().fetch("   ").await;
        assert!(matches!(result, Err(FetchError::EmptyLocation)));
    }

    #[tokio::test]
    async fn test_fetch_unknown_location() {
        let result = fetcher().fetch("/nonexistent/feed.json").await;
        assert!(matches!(result, Err(FetchError::UnknownLocation(_))));
    }
}
