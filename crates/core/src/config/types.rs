use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("mergebox.db")
}

/// Feed fetching configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Total request timeout in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    #[serde(default = "default_fetch_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// User agent sent with feed requests; some feed hosts reject unknown
    /// clients.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_fetch_timeout(),
            connect_timeout_secs: default_fetch_connect_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    30
}

fn default_fetch_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/112.0".to_string()
}

/// Liveness probing configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Quick mode only checks TCP connectivity; full mode also issues a GET.
    #[serde(default)]
    pub quick_mode: bool,
    /// Skip IPv6 literal URLs; they time out slowly on v4-only networks.
    #[serde(default = "default_true")]
    pub skip_ipv6: bool,
    /// Maximum concurrent checks per batch.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// TCP connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// HTTP connect timeout in seconds for full-mode checks.
    #[serde(default = "default_request_connect_timeout")]
    pub request_connect_timeout_secs: u64,
    /// Total HTTP request timeout in seconds for full-mode checks.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            quick_mode: false,
            skip_ipv6: default_true(),
            concurrency: default_concurrency(),
            connect_timeout_ms: default_connect_timeout_ms(),
            request_connect_timeout_secs: default_request_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    16
}

fn default_connect_timeout_ms() -> u64 {
    500
}

fn default_request_connect_timeout() -> u64 {
    6
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.path, PathBuf::from("mergebox.db"));
        assert_eq!(config.probe.concurrency, 16);
        assert!(config.probe.skip_ipv6);
        assert!(!config.probe.quick_mode);
    }
}
