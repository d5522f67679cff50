// crates/memdrift-core/src/timemap.rs
//
// TimeMap data model: the parsed form of a Memento protocol Link-format
// TimeMap, listing every capture (Memento) of one original resource.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Relation tags a memento entry may carry in its `rel` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    First,
    Last,
    Memento,
}

impl Relation {
    /// Map a single `rel` token to a memento relation tag.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "first" => Some(Relation::First),
            "last" => Some(Relation::Last),
            "memento" => Some(Relation::Memento),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::First => "first",
            Relation::Last => "last",
            Relation::Memento => "memento",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One memento entry of a TimeMap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MementoRef {
    /// The URI-M of the capture.
    pub uri: String,
    /// The `datetime` attribute exactly as it appeared in the TimeMap.
    pub datetime: String,
    /// Relation tags, e.g. `{first, memento}`.
    pub relations: BTreeSet<Relation>,
}

impl MementoRef {
    pub fn is_first(&self) -> bool {
        self.relations.contains(&Relation::First)
    }

    pub fn is_last(&self) -> bool {
        self.relations.contains(&Relation::Last)
    }

    /// Capture time parsed from the RFC 1123 `datetime` attribute.
    ///
    /// The weekday name is ignored: archives are not always consistent about it
    /// and the day/month/year fields are authoritative. Returns `None` when the
    /// value is not a recognisable date.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        parse_http_date(&self.datetime)
    }
}

/// The `rel="self"` link of a TimeMap, with its optional validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelfLink {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

/// Parsed structure of a TimeMap.
///
/// Memento entries keep the order in which they appear in the source text;
/// they are never re-sorted by datetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeMap {
    /// URI-R of the original resource.
    pub original: Option<String>,
    /// URI-G of the resource's TimeGate.
    pub timegate: Option<String>,
    /// The TimeMap's own link.
    pub self_link: Option<SelfLink>,
    /// Links to further TimeMap pages (`rel="timemap"`).
    #[serde(default)]
    pub timemaps: Vec<String>,
    /// Memento entries in order of appearance.
    pub mementos: Vec<MementoRef>,
}

impl TimeMap {
    pub fn memento_count(&self) -> usize {
        self.mementos.len()
    }

    /// The first entry tagged `first`.
    pub fn first(&self) -> Option<&MementoRef> {
        self.mementos.iter().find(|m| m.is_first())
    }

    /// The first entry tagged `last`.
    pub fn last(&self) -> Option<&MementoRef> {
        self.mementos.iter().find(|m| m.is_last())
    }

    /// The memento every other capture is compared against: the entry tagged
    /// `first`, or the first listed entry when no entry carries that tag.
    pub fn baseline(&self) -> Option<&MementoRef> {
        self.first().or_else(|| self.mementos.first())
    }

    /// True when exactly one entry is tagged `first` and exactly one `last`.
    pub fn has_consistent_bounds(&self) -> bool {
        let firsts = self.mementos.iter().filter(|m| m.is_first()).count();
        let lasts = self.mementos.iter().filter(|m| m.is_last()).count();
        firsts == 1 && lasts == 1
    }
}

/// Parse an HTTP date such as `Tue, 21 Jan 2016 15:45:06 GMT`, ignoring the weekday.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    let without_weekday = match trimmed.split_once(',') {
        Some((_, rest)) => rest.trim(),
        None => trimmed,
    };
    if let Ok(naive) = NaiveDateTime::parse_from_str(without_weekday, "%d %b %Y %H:%M:%S GMT") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
