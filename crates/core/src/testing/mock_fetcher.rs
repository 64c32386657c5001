//! Mock fetcher for testing.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::fetch::{FetchError, Fetcher};

/// Mock implementation of the `Fetcher` trait.
///
/// Provides controllable behavior for testing:
/// - Return configured content per location
/// - Simulate fetch failures per location
/// - Track fetched locations for assertions
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, String>>,
    failures: Mutex<HashSet<String>>,
    fetched: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the content returned for a location.
    pub fn set_response(&self, uri: &str, content: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(uri.to_string(), content.to_string());
    }

    /// Make fetches of a location fail.
    pub fn fail_on(&self, uri: &str) {
        self.failures.lock().unwrap().insert(uri.to_string());
    }

    /// Locations fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        self.fetched.lock().unwrap().push(uri.to_string());
        if self.failures.lock().unwrap().contains(uri) {
            return Err(FetchError::Request("simulated failure".to_string()));
        }
        self.responses
            .lock()
            .unwrap()
            .get(uri)
            .cloned()
            .ok_or_else(|| FetchError::UnknownLocation(uri.to_string()))
    }
}
