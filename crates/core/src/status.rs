//! Liveness status attached to dataset entries.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reachability of a single entry, as recorded by the last probe.
///
/// Serialized as an integer for wire compatibility with existing state
/// blobs: `0` untested, `1` online, `-1` offline. This is the only field
/// mutated after an entry has been merged into the dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinkStatus {
    #[default]
    Untested,
    Online,
    Offline,
}

impl LinkStatus {
    pub fn from_reachable(reachable: bool) -> Self {
        if reachable {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            Self::Untested => 0,
            Self::Online => 1,
            Self::Offline => -1,
        }
    }
}

impl Serialize for LinkStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for LinkStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Anything outside the known values reads as untested rather than
        // failing the whole document.
        Ok(match i8::deserialize(deserializer)? {
            1 => Self::Online,
            -1 => Self::Offline,
            _ => Self::Untested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [LinkStatus::Untested, LinkStatus::Online, LinkStatus::Offline] {
            let json = serde_json::to_string(&status).unwrap();
            let parsed: LinkStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_status_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&LinkStatus::Online).unwrap(), "1");
        assert_eq!(serde_json::to_string(&LinkStatus::Offline).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&LinkStatus::Untested).unwrap(), "0");
    }

    #[test]
    fn test_unknown_value_reads_as_untested() {
        let parsed: LinkStatus = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, LinkStatus::Untested);
    }
}
