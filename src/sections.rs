//! Section classifier: groups listing records by two-letter key prefix

use serde::Serialize;
use std::collections::BTreeMap;

use crate::listing::ObjectRecord;

/// Sentinel prefix for keys matching no section convention
pub const UNSORTED: &str = "unsorted";

/// A display grouping of objects sharing a key prefix
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub prefix: String,
    pub label: String,
    pub members: Vec<ObjectRecord>,
}

/// Partition records into sections by the `xx-` key prefix convention.
///
/// Prefix sections come out in ascending lexicographic order with
/// `Unsorted` last, omitted when empty. Members are sorted ascending by
/// key. Pure and deterministic for a given input.
pub fn classify(records: &[ObjectRecord]) -> Vec<Section> {
    let mut groups: BTreeMap<String, Vec<ObjectRecord>> = BTreeMap::new();
    let mut unsorted: Vec<ObjectRecord> = Vec::new();

    for record in records {
        match section_prefix(&record.key) {
            Some(prefix) => groups.entry(prefix).or_default().push(record.clone()),
            None => unsorted.push(record.clone()),
        }
    }

    let mut sections: Vec<Section> = groups
        .into_iter()
        .map(|(prefix, mut members)| {
            members.sort_by(|a, b| a.key.cmp(&b.key));
            Section {
                label: prefix.to_uppercase(),
                prefix,
                members,
            }
        })
        .collect();

    if !unsorted.is_empty() {
        unsorted.sort_by(|a, b| a.key.cmp(&b.key));
        sections.push(Section {
            prefix: UNSORTED.to_string(),
            label: "Unsorted".to_string(),
            members: unsorted,
        });
    }

    sections
}

/// Two ASCII lowercase letters followed by a hyphen, anchored at key start
fn section_prefix(key: &str) -> Option<String> {
    let bytes = key.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_lowercase()
        && bytes[1].is_ascii_lowercase()
        && bytes[2] == b'-'
    {
        Some(key[..2].to_string())
    } else {
        None
    }
}
