//! Entity extraction (SPEC_FULL.md §C): a regex/pattern-based scanner
//! producing `ValidatedEntity` records for common shapes, feeding
//! `SignalTags.content_keywords` and the short-term memory entity cache.

use regex::Regex;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Path,
    IpAddress,
    Url,
    Identifier,
    QuotedString,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntity {
    pub field_name: String,
    pub value: String,
    pub entity_type: EntityType,
    pub span: (usize, usize),
    pub confidence: f64,
}

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[^\s)\]]+").unwrap());
static IP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").unwrap());
static PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:/[\w.\-]+){2,}").unwrap());
static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*::[A-Za-z0-9_:]+\b|\b[a-z0-9_]+_[a-z0-9_]+\(\)").unwrap());
static QUOTED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]{2,})"|'([^']{2,})'"#).unwrap());

fn scan_with(
    re: &Regex,
    text: &str,
    entity_type: EntityType,
    field_name: &str,
    confidence: f64,
) -> Vec<ValidatedEntity> {
    re.find_iter(text)
        .map(|m| ValidatedEntity {
            field_name: field_name.to_string(),
            value: m.as_str().to_string(),
            entity_type,
            span: (m.start(), m.end()),
            confidence,
        })
        .collect()
}

/// Extract entities across all recognized shapes, in descending priority
/// order (URLs before paths, so a URL's slashes aren't double-captured as a
/// path by a second pass over the same text).
pub fn extract(text: &str) -> Vec<ValidatedEntity> {
    let mut out = Vec::new();
    out.extend(scan_with(&URL_RE, text, EntityType::Url, "url", 0.95));
    out.extend(scan_with(&IP_RE, text, EntityType::IpAddress, "ip_address", 0.9));
    out.extend(scan_with(&PATH_RE, text, EntityType::Path, "path", 0.7));
    out.extend(scan_with(
        &IDENTIFIER_RE,
        text,
        EntityType::Identifier,
        "identifier",
        0.6,
    ));
    out.extend(scan_with(
        &QUOTED_RE,
        text,
        EntityType::QuotedString,
        "quoted",
        0.8,
    ));
    out.sort_by_key(|e| e.span.0);
    out
}

/// The subset of entity values worth carrying into `SignalTags.content_keywords`.
pub fn content_keywords(text: &str) -> Vec<String> {
    extract(text).into_iter().map(|e| e.value).collect()
}
