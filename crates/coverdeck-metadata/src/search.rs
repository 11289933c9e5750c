//! Best-match selection over search results.
//!
//! The heuristic is approximate: a unique title match wins,
//! anything else falls back to the newest release.

use chrono::NaiveDate;

use crate::record::Node;

/// Pick the record that most likely corresponds to `query`.
///
/// If exactly one record's `GameTitle` equals the query after trimming and
/// lowercasing both, that record is chosen. Otherwise the record with the
/// latest `ReleaseDate` wins; records without a parsed date rank oldest and
/// ties go to the earliest record in response order.
pub fn choose_best_match<'a>(records: &'a [Node], query: &str) -> Option<&'a Node> {
    let wanted = normalize(query);
    let mut matches = records.iter().filter(|r| {
        r.get("GameTitle")
            .and_then(Node::as_text)
            .is_some_and(|title| normalize(title) == wanted)
    });
    if let (Some(only), None) = (matches.next(), matches.next()) {
        return Some(only);
    }
    most_recent(records)
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}

fn release_date(record: &Node) -> Option<NaiveDate> {
    record.get("ReleaseDate").and_then(Node::as_date)
}

fn most_recent(records: &[Node]) -> Option<&Node> {
    let mut best: Option<&Node> = None;
    for record in records {
        // Strictly greater keeps the first of equal dates.
        match best {
            Some(current) if release_date(record) <= release_date(current) => {},
            _ => best = Some(record),
        }
    }
    best
}
