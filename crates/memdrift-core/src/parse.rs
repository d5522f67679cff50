// crates/memdrift-core/src/parse.rs
//
// Parser for TimeMaps in RFC 5988 Link format.
//
// A TimeMap is a comma-separated list of `<URI>; attr="value"; ...` segments.
// Commas and semicolons inside angle brackets or quoted strings belong to the
// URI or value, not to the list structure.

use std::collections::BTreeSet;

use crate::error::TimeMapParseError;
use crate::timemap::{MementoRef, Relation, SelfLink, TimeMap};

/// One `<URI>; attr=value...` entry of a Link list.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkSegment {
    uri: String,
    /// Attribute names lowercased, values unquoted, in order of appearance.
    params: Vec<(String, String)>,
}

impl LinkSegment {
    fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse TimeMap text into its structure. Pure: no I/O, no logging side effects
/// beyond warnings for segments whose `rel` names no known role.
///
/// Fails when a segment has no bracketed URI, or when a memento entry has no
/// `datetime` attribute.
pub fn parse_timemap(text: &str) -> Result<TimeMap, TimeMapParseError> {
    let mut timemap = TimeMap::default();

    for (index, raw) in split_outside(text, ',').into_iter().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() {
            continue;
        }
        let segment = parse_segment(raw, index)?;

        let Some(rel) = segment.param("rel") else {
            tracing::warn!(uri = %segment.uri, "TimeMap segment has no rel attribute, skipping");
            continue;
        };
        let tokens: Vec<String> = rel
            .split_whitespace()
            .map(|t| t.to_ascii_lowercase())
            .collect();

        let mut recognised = false;
        for token in &tokens {
            match token.as_str() {
                "original" => {
                    recognised = true;
                    timemap.original.get_or_insert_with(|| segment.uri.clone());
                }
                "timegate" => {
                    recognised = true;
                    timemap.timegate.get_or_insert_with(|| segment.uri.clone());
                }
                "self" => {
                    recognised = true;
                    timemap.self_link = Some(SelfLink {
                        uri: segment.uri.clone(),
                        from: segment.param("from").map(str::to_string),
                        until: segment.param("until").map(str::to_string),
                        content_type: segment.param("type").map(str::to_string),
                    });
                }
                "timemap" => {
                    recognised = true;
                    timemap.timemaps.push(segment.uri.clone());
                }
                _ => {}
            }
        }

        if tokens.iter().any(|t| t == "memento") {
            let datetime = segment.param("datetime").ok_or_else(|| {
                TimeMapParseError::MissingDatetime {
                    uri: segment.uri.clone(),
                }
            })?;
            let relations: BTreeSet<Relation> = tokens
                .iter()
                .filter_map(|t| Relation::from_token(t))
                .collect();
            timemap.mementos.push(MementoRef {
                uri: segment.uri.clone(),
                datetime: datetime.to_string(),
                relations,
            });
        } else if !recognised {
            tracing::warn!(uri = %segment.uri, rel, "unrecognised TimeMap rel, skipping");
        }
    }

    Ok(timemap)
}

fn parse_segment(raw: &str, index: usize) -> Result<LinkSegment, TimeMapParseError> {
    let missing = TimeMapParseError::MissingUri { segment: index };
    let rest = raw.strip_prefix('<').ok_or_else(|| missing.clone())?;
    let (uri, params_text) = rest.split_once('>').ok_or(missing)?;

    let mut params = Vec::new();
    for param in split_outside(params_text, ';') {
        let param = param.trim();
        if param.is_empty() {
            continue;
        }
        // Valueless parameters carry nothing a TimeMap needs.
        if let Some((name, value)) = param.split_once('=') {
            params.push((name.trim().to_ascii_lowercase(), unquote(value.trim())));
        }
    }

    Ok(LinkSegment {
        uri: uri.trim().to_string(),
        params,
    })
}

/// Split on `separator` wherever it is outside `<...>` and `"..."`.
fn split_outside(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut in_brackets = false;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_quotes => escaped = true,
            '"' if !in_brackets => in_quotes = !in_quotes,
            '<' if !in_quotes => in_brackets = true,
            '>' if !in_quotes => in_brackets = false,
            c if c == separator && !in_brackets && !in_quotes => {
                parts.push(&text[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\""),
        None => value.to_string(),
    }
}
