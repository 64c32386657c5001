//! Comment-tolerant parsing of catalog source documents.
//!
//! Catalog feeds circulate as JSON with ad-hoc decorations: full lines of
//! `#` commentary, `//` comments and trailing commas. Parsing strips the
//! decorations in stages and retries, so a clean document parses on the
//! first attempt and a decorated one on the second.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use thiserror::Error;

use super::types::CatalogSource;

/// The comment sigil that marks a full line as commentary in the wild.
pub const DEFAULT_COMMENT_SIGIL: char = '#';

#[derive(Debug, Error)]
pub enum CatalogParseError {
    #[error("document is not valid JSON: {0}")]
    InvalidDocument(String),
}

static INLINE_SLASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+//[^\n]*").unwrap());
static TRAILING_COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r",\s*([}\]])").unwrap());

/// Parse a raw catalog document with the default comment sigil.
pub fn parse_source(raw: &str) -> Result<CatalogSource, CatalogParseError> {
    parse_source_with_comment(raw, DEFAULT_COMMENT_SIGIL)
}

/// Parse a raw catalog document, treating full lines starting with `sigil`
/// as commentary.
pub fn parse_source_with_comment(
    raw: &str,
    sigil: char,
) -> Result<CatalogSource, CatalogParseError> {
    let cleaned = strip_full_line_comments(raw, &sigil.to_string());
    if let Ok(source) = serde_json::from_str::<CatalogSource>(&cleaned) {
        return Ok(source);
    }

    // Second pass: `//` comments and trailing commas. `//` is only treated
    // as a comment at line start or after whitespace, which keeps scheme
    // separators in URLs intact.
    let cleaned = strip_full_line_comments(&cleaned, "//");
    let cleaned = INLINE_SLASH_COMMENT.replace_all(&cleaned, "");
    let cleaned = TRAILING_COMMA.replace_all(&cleaned, "$1");
    serde_json::from_str(&cleaned).map_err(|e| CatalogParseError::InvalidDocument(e.to_string()))
}

fn strip_full_line_comments(raw: &str, prefix: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with(prefix))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_document() {
        let raw = r#"{"sites": [{"key": "a", "name": "A", "type": 1, "api": "http://a"}], "lives": []}"#;
        let source = parse_source(raw).unwrap();
        assert_eq!(source.sites.len(), 1);
        assert_eq!(source.sites[0].key, "a");
    }

    #[test]
    fn test_parse_strips_hash_comment_lines() {
        let raw = "# feed header\n{\"sites\": [], \"lives\": []}\n# trailing note";
        let source = parse_source(raw).unwrap();
        assert!(source.sites.is_empty());
    }

    #[test]
    fn test_parse_strips_slash_comments_and_trailing_commas() {
        let raw = r#"
// generated config
{
    "sites": [
        {"key": "a", "name": "A", "type": 1, "api": "http://a/api"}, // main site
    ],
    "lives": [],
}
"#;
        let source = parse_source(raw).unwrap();
        assert_eq!(source.sites.len(), 1);
        // The URL's scheme separator survived comment stripping.
        assert_eq!(source.sites[0].api, "http://a/api");
    }

    #[test]
    fn test_parse_custom_sigil() {
        let raw = "; header\n{\"sites\": [], \"lives\": []}";
        let source = parse_source_with_comment(raw, ';').unwrap();
        assert!(source.lives.is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_source("not a document").is_err());
    }
}
