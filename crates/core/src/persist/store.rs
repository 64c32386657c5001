//! The state-persistence capability seam.

use thiserror::Error;

/// Errors that can occur while persisting or reading dataset state.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("database error: {0}")]
    Database(String),
}

/// Keyed-blob storage for serialized dataset state.
///
/// From the mergers' perspective this is fire-and-forget: a failed save is
/// logged and skipped, never propagated.
pub trait StateStore: Send + Sync {
    /// Write `value` under `key`, replacing any previous value.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;

    /// Read the value stored under `key`.
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;
}
