//! Types for structured catalog source documents.
//!
//! A catalog document aggregates video-on-demand sources (`sites`), live
//! sources (`lives`), URL resolvers (`parses`), VIP flags, ad hosts and
//! ad-filter rules, plus a handful of dataset-wide fields. Field names follow
//! the wire format; numeric fields that feeds commonly quote as strings are
//! deserialized leniently.

use serde::{Deserialize, Deserializer, Serialize};

use crate::status::LinkStatus;

/// One aggregate catalog dataset.
///
/// `sites` and `lives` are always present (possibly empty); the remaining
/// collections are optional on the wire and stay absent until some feed
/// provides them.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CatalogSource {
    #[serde(default)]
    pub sites: Vec<VodEntry>,
    #[serde(default)]
    pub lives: Vec<LiveEntry>,
    /// URL-resolution helper services.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parses: Option<Vec<ResolverEntry>>,
    /// Labels marking entries that need a VIP resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
    /// Player tuning option groups, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ijk: Option<Vec<IjkOptionGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<FilterRule>>,
    /// Ad host strings; set semantics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ads: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallpaper: Option<String>,
    /// Dataset-wide default scraper-library reference; entries without an
    /// explicit `jar` inherit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spider: Option<String>,
    #[serde(
        rename = "warningText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub warning_text: Option<String>,
}

/// A video-on-demand source descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VodEntry {
    pub key: String,
    pub name: String,
    /// 0 xml, 1 json, 3 spider.
    #[serde(rename = "type", default, deserialize_with = "lenient_i32")]
    pub source_type: i32,
    /// API endpoint.
    pub api: String,
    #[serde(default, deserialize_with = "lenient_i32")]
    pub searchable: i32,
    #[serde(rename = "quickSearch", default, deserialize_with = "lenient_i32")]
    pub quick_search: i32,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i32",
        skip_serializing_if = "Option::is_none"
    )]
    pub filterable: Option<i32>,
    #[serde(
        rename = "playerUrl",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub player_url: Option<String>,
    /// Extension payload; opaque to the merger but part of the identity key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<serde_json::Value>,
    /// Scraper-library reference; inherits the dataset-wide `spider` when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jar: Option<String>,
    /// 0 system, 1 ijk, 2 exo, 10 mxplayer, -1 use the global setting.
    #[serde(
        rename = "playerType",
        default,
        deserialize_with = "lenient_opt_i32",
        skip_serializing_if = "Option::is_none"
    )]
    pub player_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    /// Selector for sites that need a click before sniffing starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_opt_i32",
        skip_serializing_if = "Option::is_none"
    )]
    pub hide: Option<i32>,
    /// Display-only feature tags derived from the capability flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<String>,
    #[serde(default)]
    pub status: LinkStatus,
}

/// A live-broadcast source descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<Vec<ChannelGroup>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epg: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_opt_i32",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_type: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub status: LinkStatus,
}

/// A named list of stream URLs inside a live entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelGroup {
    pub name: String,
    pub urls: Vec<String>,
}

/// A URL-resolution helper service descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverEntry {
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_i32")]
    pub source_type: i32,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<serde_json::Value>,
    #[serde(default)]
    pub status: LinkStatus,
}

/// An ad-filter rule, targeting one host or several.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<Vec<String>>,
}

/// A player tuning option group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IjkOptionGroup {
    pub group: String,
    pub options: Vec<IjkOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IjkOption {
    pub category: i32,
    pub name: String,
    pub value: String,
}

/// A number that feeds may quote as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeNumber {
    Number(i64),
    Text(String),
}

impl MaybeNumber {
    fn into_i32<E: serde::de::Error>(self) -> Result<i32, E> {
        match self {
            MaybeNumber::Number(n) => Ok(n as i32),
            MaybeNumber::Text(s) => s.trim().parse().map_err(E::custom),
        }
    }
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    MaybeNumber::deserialize(deserializer)?.into_i32()
}

fn lenient_opt_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<MaybeNumber>::deserialize(deserializer)? {
        Some(value) => value.into_i32().map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_fields_accept_strings() {
        let json = r#"{
            "key": "csp_test",
            "name": "Test",
            "type": "3",
            "api": "csp_Test",
            "searchable": "1",
            "quickSearch": 0,
            "filterable": "1"
        }"#;
        let entry: VodEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.source_type, 3);
        assert_eq!(entry.searchable, 1);
        assert_eq!(entry.quick_search, 0);
        assert_eq!(entry.filterable, Some(1));
        assert_eq!(entry.status, LinkStatus::Untested);
    }

    #[test]
    fn test_absent_optional_fields_not_serialized() {
        let source = CatalogSource::default();
        let json = serde_json::to_string(&source).unwrap();
        assert!(!json.contains("parses"));
        assert!(!json.contains("wallpaper"));
        assert!(json.contains("\"sites\":[]"));
    }

    #[test]
    fn test_warning_text_wire_name() {
        let source = CatalogSource {
            warning_text: Some("stay legal".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&source).unwrap();
        assert!(json.contains("\"warningText\":\"stay legal\""));
    }
}
