//! Merge, dedup and reconcile rules for catalog datasets.
//!
//! Every collection has an identity key deciding when two records denote the
//! same real-world item; merging concatenates existing-first and keeps the
//! first occurrence per key, so records already in the dataset win ties.

use std::collections::{HashMap, HashSet};

use crate::probe::ProbeOutcome;
use crate::status::LinkStatus;

use super::types::{CatalogSource, FilterRule, LiveEntry, ResolverEntry, VodEntry};

/// Identity key for a VOD entry: `api` and `ext` concatenated.
///
/// There is deliberately no separator between the two parts, matching the
/// established dataset format; renaming an entry does not create a
/// duplicate, changing its endpoint or extension payload does.
pub fn vod_key(entry: &VodEntry) -> String {
    format!("{}{}", entry.api, ext_fragment(entry.ext.as_ref()))
}

fn ext_fragment(ext: Option<&serde_json::Value>) -> String {
    match ext {
        None => String::new(),
        // A string payload contributes its raw text, any other JSON shape
        // its compact serialization.
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Identity key for a live entry: the playback URL plus every stream URL of
/// every sub-channel. Structural, not name-based.
pub fn live_key(entry: &LiveEntry) -> String {
    let channel_urls = entry
        .channels
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| c.urls.join(","))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}{}", entry.url.as_deref().unwrap_or_default(), channel_urls)
}

/// Identity key for a resolver entry.
pub fn resolver_key(entry: &ResolverEntry) -> String {
    entry.url.clone()
}

/// Identity key for an ad-filter rule: the single `host` when present,
/// otherwise the concatenation of its host, regex and rule lists.
pub fn rule_key(rule: &FilterRule) -> String {
    if let Some(host) = rule.host.as_deref().filter(|h| !h.is_empty()) {
        return host.to_string();
    }
    format!(
        "{}{}{}",
        rule.hosts.as_deref().unwrap_or_default().join(","),
        rule.regex.as_deref().unwrap_or_default().join(","),
        rule.rule.as_deref().unwrap_or_default().join(",")
    )
}

/// Keep the first occurrence of every identity key, preserving order.
pub fn dedupe_by_key<T, F>(items: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> String,
{
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    for item in items {
        if seen.insert(key(&item)) {
            kept.push(item);
        }
    }
    kept
}

/// Backfill missing scraper references from a dataset-wide default.
///
/// This is the single canonical backfill: both the merge path (incoming
/// entries inherit the incoming dataset's default) and the persistence
/// snapshot go through it. Idempotent; an entry with an explicit `jar` is
/// never touched.
pub fn backfill_scraper(entries: &mut [VodEntry], default: Option<&str>) {
    let Some(default) = default.filter(|d| !d.is_empty()) else {
        return;
    };
    for entry in entries.iter_mut() {
        if entry.jar.as_deref().is_none_or(str::is_empty) {
            entry.jar = Some(default.to_string());
        }
    }
}

/// Display-only feature tags for a VOD entry, derived from its capability
/// flags.
pub fn feature_tags(entry: &VodEntry) -> String {
    let mut tags = Vec::new();
    if entry.searchable != 0 {
        tags.push("search");
    }
    if entry.quick_search != 0 {
        tags.push("quick search");
    }
    if entry.filterable.unwrap_or_default() != 0 {
        tags.push("filter");
    }
    tags.join(", ")
}

/// Attach derived feature tags to every entry of a freshly parsed feed.
pub fn derive_features(entries: &mut [VodEntry]) {
    for entry in entries.iter_mut() {
        let tags = feature_tags(entry);
        entry.features = (!tags.is_empty()).then_some(tags);
    }
}

/// Merge an incoming dataset into an existing one, returning the combined
/// dataset.
///
/// Per collection: concatenate existing-first, dedupe by identity key.
/// Incoming VOD entries inherit the incoming dataset's scraper default
/// before the merge. Flag and ad lists union through a seen-set. Dataset
/// singletons (wallpaper, spider, warning text, ijk options) keep the
/// existing value and adopt the incoming one only when absent.
pub fn merge_sources(existing: CatalogSource, mut incoming: CatalogSource) -> CatalogSource {
    backfill_scraper(&mut incoming.sites, incoming.spider.as_deref());

    let sites = dedupe_by_key(
        existing.sites.into_iter().chain(incoming.sites).collect(),
        vod_key,
    );
    let lives = dedupe_by_key(
        existing.lives.into_iter().chain(incoming.lives).collect(),
        live_key,
    );
    let parses = merge_keyed(existing.parses, incoming.parses, resolver_key);
    let rules = merge_keyed(existing.rules, incoming.rules, rule_key);
    let flags = union_strings(existing.flags, incoming.flags);
    let ads = union_strings(existing.ads, incoming.ads);

    CatalogSource {
        sites,
        lives,
        parses,
        flags,
        ijk: existing.ijk.or(incoming.ijk),
        rules,
        ads,
        wallpaper: existing.wallpaper.or(incoming.wallpaper),
        spider: existing.spider.or(incoming.spider),
        warning_text: existing.warning_text.or(incoming.warning_text),
    }
}

fn merge_keyed<T, F>(existing: Option<Vec<T>>, incoming: Option<Vec<T>>, key: F) -> Option<Vec<T>>
where
    F: Fn(&T) -> String,
{
    match (existing, incoming) {
        (None, None) => None,
        (existing, incoming) => Some(dedupe_by_key(
            existing
                .unwrap_or_default()
                .into_iter()
                .chain(incoming.unwrap_or_default())
                .collect(),
            key,
        )),
    }
}

fn union_strings(
    existing: Option<Vec<String>>,
    incoming: Option<Vec<String>>,
) -> Option<Vec<String>> {
    match (existing, incoming) {
        (existing, None) => existing,
        (None, incoming) => incoming,
        (Some(existing), Some(incoming)) => {
            let mut seen = HashSet::new();
            Some(
                existing
                    .into_iter()
                    .chain(incoming)
                    .filter(|s| seen.insert(s.clone()))
                    .collect(),
            )
        }
    }
}

/// Fold probe results back into a collection by identity key.
///
/// The probe capability is free to reorder, batch or drop results, so
/// correlation is strictly by key: entries with a result get the matching
/// status, entries without one keep their prior status. The collection is
/// rebuilt with updates substituted in place; nothing is removed.
pub fn fold_statuses<T, K, A>(
    entries: Vec<T>,
    results: &[ProbeOutcome<T>],
    key: K,
    apply: A,
) -> Vec<T>
where
    K: Fn(&T) -> String,
    A: Fn(&mut T, LinkStatus),
{
    let statuses: HashMap<String, LinkStatus> = results
        .iter()
        .map(|r| (key(&r.entry), LinkStatus::from_reachable(r.reachable)))
        .collect();
    entries
        .into_iter()
        .map(|mut entry| {
            if let Some(status) = statuses.get(&key(&entry)) {
                apply(&mut entry, *status);
            }
            entry
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_vod(key: &str, api: &str) -> VodEntry {
        VodEntry {
            key: key.to_string(),
            name: key.to_uppercase(),
            source_type: 1,
            api: api.to_string(),
            searchable: 1,
            quick_search: 0,
            filterable: None,
            player_url: None,
            ext: None,
            jar: None,
            player_type: None,
            categories: None,
            click: None,
            hide: None,
            features: None,
            status: LinkStatus::Untested,
        }
    }

    fn source_with_sites(sites: Vec<VodEntry>) -> CatalogSource {
        CatalogSource {
            sites,
            ..Default::default()
        }
    }

    #[test]
    fn test_first_seen_wins_on_key_collision() {
        let mut first = make_vod("a", "http://u1");
        first.name = "from feed 1".to_string();
        let mut second = make_vod("a", "http://u1");
        second.name = "from feed 2".to_string();

        let merged = merge_sources(
            source_with_sites(vec![first]),
            source_with_sites(vec![second, make_vod("b", "http://u2")]),
        );

        assert_eq!(merged.sites.len(), 2);
        assert_eq!(merged.sites[0].name, "from feed 1");
        assert_eq!(merged.sites[1].key, "b");
    }

    #[test]
    fn test_merge_order_changes_winner_not_key_set() {
        let feed_a = || source_with_sites(vec![make_vod("a", "http://u1")]);
        let feed_b = || {
            let mut entry = make_vod("a2", "http://u1");
            entry.name = "other".to_string();
            source_with_sites(vec![entry])
        };

        // Both entries share the identity key (same api, no ext).
        let ab = merge_sources(feed_a(), feed_b());
        let ba = merge_sources(feed_b(), feed_a());

        assert_eq!(ab.sites.len(), 1);
        assert_eq!(ba.sites.len(), 1);
        assert_eq!(ab.sites[0].key, "a");
        assert_eq!(ba.sites[0].key, "a2");
    }

    #[test]
    fn test_merge_with_itself_changes_nothing() {
        let mut source = source_with_sites(vec![make_vod("a", "http://u1")]);
        source.flags = Some(vec!["vip".to_string()]);
        source.ads = Some(vec!["ads.example".to_string()]);

        let merged = merge_sources(source.clone(), source.clone());

        assert_eq!(merged.sites.len(), source.sites.len());
        assert_eq!(merged.flags, source.flags);
        assert_eq!(merged.ads, source.ads);
    }

    #[test]
    fn test_vod_key_concatenates_api_and_ext() {
        let mut with_ext = make_vod("a", "http://u");
        with_ext.ext = Some(serde_json::Value::String("x.js".to_string()));
        assert_eq!(vod_key(&with_ext), "http://ux.js");
        assert_eq!(vod_key(&make_vod("a", "http://u")), "http://u");
    }

    #[test]
    fn test_live_key_covers_all_channel_urls() {
        use crate::catalog::types::ChannelGroup;
        let entry = LiveEntry {
            name: Some("cctv".to_string()),
            group: None,
            channels: Some(vec![
                ChannelGroup {
                    name: "hd".to_string(),
                    urls: vec!["http://1".to_string(), "http://2".to_string()],
                },
                ChannelGroup {
                    name: "sd".to_string(),
                    urls: vec!["http://3".to_string()],
                },
            ]),
            epg: None,
            source_type: None,
            url: Some("http://base".to_string()),
            status: LinkStatus::Untested,
        };
        assert_eq!(live_key(&entry), "http://basehttp://1,http://2,http://3");

        // Renaming does not change identity; touching a stream URL does.
        let mut renamed = entry.clone();
        renamed.name = Some("cctv renamed".to_string());
        assert_eq!(live_key(&renamed), live_key(&entry));
        let mut retargeted = entry.clone();
        retargeted.channels.as_mut().unwrap()[0].urls[0] = "http://other".to_string();
        assert_ne!(live_key(&retargeted), live_key(&entry));
    }

    #[test]
    fn test_rule_key_falls_back_to_list_concatenation() {
        let rule = FilterRule {
            hosts: Some(vec!["a.com".to_string(), "b.com".to_string()]),
            name: None,
            regex: Some(vec!["^ad".to_string()]),
            host: None,
            rule: None,
        };
        assert_eq!(rule_key(&rule), "a.com,b.com^ad");

        let keyed = FilterRule {
            host: Some("c.com".to_string()),
            ..rule
        };
        assert_eq!(rule_key(&keyed), "c.com");
    }

    #[test]
    fn test_backfill_scraper_is_idempotent_and_preserves_explicit() {
        let mut entries = vec![make_vod("a", "http://u1"), make_vod("b", "http://u2")];
        entries[1].jar = Some("custom.jar".to_string());

        backfill_scraper(&mut entries, Some("default.jar"));
        backfill_scraper(&mut entries, Some("default.jar"));

        assert_eq!(entries[0].jar.as_deref(), Some("default.jar"));
        assert_eq!(entries[1].jar.as_deref(), Some("custom.jar"));
    }

    #[test]
    fn test_incoming_inherits_incoming_default_scraper() {
        let incoming = CatalogSource {
            sites: vec![make_vod("a", "http://u1")],
            spider: Some("spider.jar".to_string()),
            ..Default::default()
        };
        let merged = merge_sources(CatalogSource::default(), incoming);
        assert_eq!(merged.sites[0].jar.as_deref(), Some("spider.jar"));
    }

    #[test]
    fn test_flag_union_keeps_first_occurrence_order() {
        let merged = union_strings(
            Some(vec!["a".to_string(), "b".to_string()]),
            Some(vec!["b".to_string(), "c".to_string()]),
        )
        .unwrap();
        assert_eq!(merged, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_feature_tags_reflect_capabilities() {
        let mut entry = make_vod("a", "http://u");
        entry.searchable = 1;
        entry.quick_search = 1;
        entry.filterable = Some(1);
        assert_eq!(feature_tags(&entry), "search, quick search, filter");

        entry.searchable = 0;
        entry.quick_search = 0;
        entry.filterable = None;
        assert_eq!(feature_tags(&entry), "");
    }

    #[test]
    fn test_fold_statuses_matches_by_key_not_position() {
        let entries = vec![make_vod("a", "http://u1"), make_vod("b", "http://u2")];
        // Results arrive reordered and partial.
        let results = vec![ProbeOutcome {
            reachable: true,
            entry: make_vod("b", "http://u2"),
        }];

        let folded = fold_statuses(
            entries,
            &results,
            |e| e.key.clone(),
            |e, s| e.status = s,
        );

        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0].status, LinkStatus::Untested);
        assert_eq!(folded[1].status, LinkStatus::Online);
    }
}
