//! Types for flat text playlists.

use serde::{Deserialize, Serialize};

use crate::status::LinkStatus;

/// One playlist line: either a playable entry or a group marker.
///
/// The original line is kept verbatim so the sequence round-trips losslessly
/// and so records can be addressed by content hash instead of position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub online: LinkStatus,
    /// Whether `url` has an http(s) scheme; probing is scoped to these.
    pub http: bool,
    /// True when this line opens a named section instead of naming a
    /// playable entry.
    pub group: bool,
    /// The original line, unmodified.
    pub raw: String,
    /// Content hash of `raw`; the record's identity.
    pub hash: String,
}

/// A bucket of the derived grouping view: a marker and the records it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistGroup {
    pub group: String,
    /// The marker record. `None` only for the synthetic bucket collecting
    /// records that precede any marker.
    pub raw: Option<PlaylistEntry>,
    pub items: Vec<PlaylistEntry>,
}
