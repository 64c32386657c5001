//! Parsing flat `name,url` playlist text into records.

use crate::fetch::is_http_url;
use crate::identity::content_hash;

use super::types::PlaylistEntry;

/// Parse playlist text into records, one per non-blank line.
///
/// Each line splits into at most two comma-delimited fields, so a URL
/// containing commas survives verbatim. A line whose url field is empty or
/// starts with a comment sigil is a group marker; everything else is a
/// playable entry. The content hash covers the whole raw line, which keeps
/// two lines distinct even when they only differ outside the name/url
/// fields.
pub fn parse_lines(text: &str) -> Vec<PlaylistEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut fields = line.splitn(2, ',');
            let name = fields.next().unwrap_or_default().to_string();
            let url = fields.next().unwrap_or_default().to_string();
            let group = url.is_empty() || url.starts_with('#');
            PlaylistEntry {
                name,
                http: is_http_url(&url),
                group,
                url,
                online: Default::default(),
                raw: line.to_string(),
                hash: content_hash(line),
            }
        })
        .collect()
}

/// Serialize records back to playlist text: one `name,url` pair per line.
/// Group markers come out as `name,` or `name,#...`.
pub fn to_text(entries: &[PlaylistEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{},{}", entry.name, entry.url))
        .collect::<Vec<_>>()
        .join("\n")
}
