//! Spatiotemporal anchoring (SPEC_FULL.md §C): resolves relative time
//! references against a supplied reference instant, and location mentions
//! against a small gazetteer. Absent a gazetteer hit, anchors are left
//! unresolved rather than guessed.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct TemporalAnchor {
    pub phrase: String,
    pub resolved: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationAnchor {
    pub phrase: String,
    pub canonical_name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpatiotemporalAnchors {
    pub temporal: Vec<TemporalAnchor>,
    pub locations: Vec<LocationAnchor>,
}

fn default_gazetteer() -> HashMap<&'static str, &'static str> {
    [
        ("sf", "San Francisco, CA"),
        ("san francisco", "San Francisco, CA"),
        ("nyc", "New York City, NY"),
        ("new york", "New York City, NY"),
        ("london", "London, UK"),
        ("tokyo", "Tokyo, Japan"),
    ]
    .into_iter()
    .collect()
}

/// Resolve relative time phrases ("today", "tomorrow", "next week",
/// "yesterday") against `reference`.
pub fn resolve_temporal(text: &str, reference: DateTime<Utc>) -> Vec<TemporalAnchor> {
    let lower = text.to_lowercase();
    let mut anchors = Vec::new();
    let candidates: &[(&str, Duration)] = &[
        ("tomorrow", Duration::days(1)),
        ("yesterday", Duration::days(-1)),
        ("next week", Duration::weeks(1)),
        ("last week", Duration::weeks(-1)),
        ("today", Duration::zero()),
    ];
    for (phrase, offset) in candidates {
        if lower.contains(phrase) {
            anchors.push(TemporalAnchor {
                phrase: phrase.to_string(),
                resolved: reference + *offset,
            });
        }
    }
    anchors
}

/// Resolve location mentions against `gazetteer` (or the small built-in
/// default when `None`). A mention with no gazetteer hit is left
/// unresolved — it simply doesn't appear in the returned list, rather than
/// being guessed at.
pub fn resolve_locations(
    text: &str,
    gazetteer: Option<&HashMap<&str, &str>>,
) -> Vec<LocationAnchor> {
    let owned;
    let table = match gazetteer {
        Some(g) => g,
        None => {
            owned = default_gazetteer();
            &owned
        }
    };
    let lower = text.to_lowercase();
    table
        .iter()
        .filter(|(phrase, _)| lower.contains(*phrase))
        .map(|(phrase, canonical)| LocationAnchor {
            phrase: phrase.to_string(),
            canonical_name: canonical.to_string(),
        })
        .collect()
}

pub fn anchor(text: &str, reference: DateTime<Utc>) -> SpatiotemporalAnchors {
    SpatiotemporalAnchors {
        temporal: resolve_temporal(text, reference),
        locations: resolve_locations(text, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_tomorrow_relative_to_reference() {
        let reference = Utc::now();
        let anchors = resolve_temporal("let's meet tomorrow", reference);
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].resolved.date_naive(), (reference + Duration::days(1)).date_naive());
    }

    #[test]
    fn resolves_known_location() {
        let anchors = resolve_locations("flights into SF this weekend", None);
        assert!(anchors.iter().any(|a| a.canonical_name == "San Francisco, CA"));
    }

    #[test]
    fn unknown_location_left_unresolved() {
        let anchors = resolve_locations("flights into Narnia this weekend", None);
        assert!(anchors.is_empty());
    }
}
