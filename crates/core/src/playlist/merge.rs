//! Dedup, append-merge and group operations for playlists.

use std::collections::HashSet;

use super::types::{PlaylistEntry, PlaylistGroup};

/// Keep the first occurrence of every content hash, preserving order.
pub fn dedupe(entries: Vec<PlaylistEntry>) -> Vec<PlaylistEntry> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(entries.len());
    for entry in entries {
        if seen.insert(entry.hash.clone()) {
            kept.push(entry);
        }
    }
    kept
}

/// Append incoming records after existing ones, dedupe by hash, and prune
/// groups emptied by the concatenation boundary.
pub fn append(existing: Vec<PlaylistEntry>, incoming: Vec<PlaylistEntry>) -> Vec<PlaylistEntry> {
    let merged = dedupe(existing.into_iter().chain(incoming).collect());
    prune_empty_groups(merged)
}

/// Drop group markers that own zero records.
///
/// The decision looks at the immediate next record only, left to right: a
/// marker directly followed by another marker is dropped, a trailing marker
/// is kept. A group whose children appear right after it is never touched.
pub fn prune_empty_groups(entries: Vec<PlaylistEntry>) -> Vec<PlaylistEntry> {
    let mut kept = Vec::with_capacity(entries.len());
    let mut iter = entries.into_iter().peekable();
    while let Some(entry) = iter.next() {
        if entry.group {
            if let Some(next) = iter.peek() {
                if next.group {
                    continue;
                }
            }
        }
        kept.push(entry);
    }
    kept
}

/// Derive the grouping view: every non-marker record is bucketed under the
/// most recent marker. Records before the first marker collect into a
/// synthetic bucket with no marker record.
pub fn group_view(entries: &[PlaylistEntry]) -> Vec<PlaylistGroup> {
    let mut groups: Vec<PlaylistGroup> = Vec::new();
    for entry in entries {
        if entry.group {
            groups.push(PlaylistGroup {
                group: entry.name.clone(),
                raw: Some(entry.clone()),
                items: Vec::new(),
            });
        } else {
            if groups.is_empty() {
                groups.push(PlaylistGroup {
                    group: String::new(),
                    raw: None,
                    items: Vec::new(),
                });
            }
            groups
                .last_mut()
                .expect("group bucket exists")
                .items
                .push(entry.clone());
        }
    }
    groups
}

/// Flatten a grouping view back to the flat sequence: `[marker, ...items]`
/// per bucket, in bucket order. This is the sole supported way to reorder or
/// restructure groups.
pub fn flatten_groups(groups: Vec<PlaylistGroup>) -> Vec<PlaylistEntry> {
    groups
        .into_iter()
        .flat_map(|g| g.raw.into_iter().chain(g.items))
        .collect()
}

/// Move the records matching `hashes` from one group to another.
///
/// Groups and records are addressed by content hash, never by position, so
/// the move stays correct under concurrent reordering. Unknown source or
/// destination hashes make this a no-op; requested hashes absent from the
/// source group are ignored. Moved records keep their relative order and
/// are appended to the destination group's children.
pub fn move_items(
    entries: Vec<PlaylistEntry>,
    hashes: &[String],
    from: &str,
    to: &str,
) -> Vec<PlaylistEntry> {
    let mut groups = group_view(&entries);
    let marker_index = |groups: &[PlaylistGroup], hash: &str| {
        groups
            .iter()
            .position(|g| g.raw.as_ref().is_some_and(|r| r.hash == hash))
    };
    let Some(from_index) = marker_index(&groups, from) else {
        return entries;
    };
    let Some(to_index) = marker_index(&groups, to) else {
        return entries;
    };

    let wanted: HashSet<&str> = hashes.iter().map(String::as_str).collect();
    let (moved, retained): (Vec<_>, Vec<_>) = groups[from_index]
        .items
        .drain(..)
        .partition(|item| wanted.contains(item.hash.as_str()));
    groups[from_index].items = retained;
    groups[to_index].items.extend(moved);
    flatten_groups(groups)
}
