//! Content-identity hashing shared by both mergers.

use sha2::{Digest, Sha256};

/// Stable identifier for a piece of raw content.
///
/// Same input always yields the same identifier; distinct inputs practically
/// never collide (SHA-256, no truncation). Playlist records use this as their
/// dedup identity, and group moves address records by it so they stay safe
/// against concurrent reordering.
pub fn content_hash(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_deterministic() {
        assert_eq!(content_hash("Movie,http://x"), content_hash("Movie,http://x"));
    }

    #[test]
    fn test_distinct_inputs_distinct_hashes() {
        assert_ne!(content_hash("Movie,http://x"), content_hash("Movie,http://y"));
    }

    #[test]
    fn test_trailing_whitespace_is_significant() {
        assert_ne!(content_hash("Movie,http://x"), content_hash("Movie,http://x "));
    }

    #[test]
    fn test_hash_is_full_width_hex() {
        let hash = content_hash("");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
