//! Network prober: TCP connectivity and HTTP accessibility checks.

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::catalog::{LiveEntry, ResolverEntry, VodEntry};
use crate::config::ProbeConfig;
use crate::fetch::is_http_url;

use super::types::{ProbeError, ProbeOutcome, Prober};

/// Production prober.
///
/// Quick mode checks whether the URL's server accepts a TCP connection; full
/// mode additionally issues a GET and requires a success status. Checks fan
/// out with bounded concurrency; per-URL failures simply count as
/// unreachable, so the capability itself never fails here.
pub struct NetProber {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl NetProber {
    pub fn new(config: ProbeConfig) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/112.0",
            )
            .connect_timeout(Duration::from_secs(config.request_connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, config }
    }

    fn concurrency(&self) -> usize {
        self.config.concurrency.max(1)
    }

    /// IPv6 literals are skipped (counted unreachable) when configured; they
    /// time out slowly on v4-only networks.
    fn skipped(&self, uri: &str) -> bool {
        self.config.skip_ipv6 && uri.contains("://[")
    }

    /// Whether the URL's server accepts a TCP connection. Does not look at
    /// the content behind the URL.
    async fn url_connectivity(&self, uri: &str) -> bool {
        let Ok(parsed) = url::Url::parse(uri) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let port = parsed.port_or_known_default().unwrap_or(80);
        let connect = tokio::net::TcpStream::connect(format!("{host}:{port}"));
        matches!(
            tokio::time::timeout(
                Duration::from_millis(self.config.connect_timeout_ms),
                connect
            )
            .await,
            Ok(Ok(_))
        )
    }

    /// Whether the URL answers a GET with a success status.
    async fn url_accessibility(&self, uri: &str) -> bool {
        if !self.url_connectivity(uri).await {
            return false;
        }
        match self.client.get(uri).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(uri, error = %e, "accessibility check failed");
                false
            }
        }
    }

    async fn check_url(&self, uri: &str) -> bool {
        if self.skipped(uri) {
            return false;
        }
        if self.config.quick_mode {
            self.url_connectivity(uri).await
        } else {
            self.url_accessibility(uri).await
        }
    }

    async fn vod_reachable(&self, entry: &VodEntry) -> bool {
        // Only the api and ext fields are network-testable; spider keys and
        // other non-URL endpoints pass.
        if !is_http_url(&entry.api) {
            return true;
        }
        if !self.check_url(&entry.api).await {
            return false;
        }
        if let Some(serde_json::Value::String(ext)) = entry.ext.as_ref() {
            if is_http_url(ext) && !is_local_url(ext) {
                return self.check_url(ext).await;
            }
        }
        true
    }

    async fn live_reachable(&self, entry: &LiveEntry) -> bool {
        if let Some(url) = entry.url.as_deref() {
            if self.check_url(url).await {
                return true;
            }
        }
        for group in entry.channels.as_deref().unwrap_or_default() {
            for url in &group.urls {
                if self.check_url(url).await {
                    return true;
                }
            }
        }
        false
    }

    async fn resolver_reachable(&self, entry: &ResolverEntry) -> bool {
        if is_http_url(&entry.url) {
            self.check_url(&entry.url).await
        } else {
            true
        }
    }
}

fn is_local_url(url: &str) -> bool {
    url.starts_with("http://127.0.0.1") || url.starts_with("http://localhost")
}

#[async_trait]
impl Prober for NetProber {
    async fn probe_vods(
        &self,
        items: Vec<VodEntry>,
    ) -> Result<Vec<ProbeOutcome<VodEntry>>, ProbeError> {
        let outcomes = stream::iter(items.into_iter().map(|entry| async move {
            let reachable = self.vod_reachable(&entry).await;
            ProbeOutcome { reachable, entry }
        }))
        .buffer_unordered(self.concurrency())
        .collect()
        .await;
        Ok(outcomes)
    }

    async fn probe_lives(
        &self,
        items: Vec<LiveEntry>,
    ) -> Result<Vec<ProbeOutcome<LiveEntry>>, ProbeError> {
        let outcomes = stream::iter(items.into_iter().map(|entry| async move {
            let reachable = self.live_reachable(&entry).await;
            ProbeOutcome { reachable, entry }
        }))
        .buffer_unordered(self.concurrency())
        .collect()
        .await;
        Ok(outcomes)
    }

    async fn probe_resolvers(
        &self,
        items: Vec<ResolverEntry>,
    ) -> Result<Vec<ProbeOutcome<ResolverEntry>>, ProbeError> {
        let outcomes = stream::iter(items.into_iter().map(|entry| async move {
            let reachable = self.resolver_reachable(&entry).await;
            ProbeOutcome { reachable, entry }
        }))
        .buffer_unordered(self.concurrency())
        .collect()
        .await;
        Ok(outcomes)
    }

    async fn probe_urls(&self, urls: Vec<String>) -> Result<Vec<String>, ProbeError> {
        let confirmed = stream::iter(urls.into_iter().map(|url| async move {
            let reachable = url::Url::parse(&url).is_ok() && self.check_url(&url).await;
            reachable.then_some(url)
        }))
        .buffer_unordered(self.concurrency())
        .filter_map(|confirmed| async move { confirmed })
        .collect()
        .await;
        Ok(confirmed)
    }
}
