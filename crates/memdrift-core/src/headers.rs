// crates/memdrift-core/src/headers.rs
//
// Ordered HTTP-style header mapping attached to TimeMaps and Mementos.

use serde::{Deserialize, Serialize};

/// HTTP-style headers in arrival order.
///
/// Repeated names are kept as separate entries, so a header set survives a
/// store round trip exactly as it was ingested. Lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    /// Create an empty header mapping.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a header, keeping any earlier entry with the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// First value recorded for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Every value recorded for `name`, in arrival order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(name, value)` pairs in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse a `Name: value` line as typed on a command line.
    pub fn parse_line(line: &str) -> Option<(String, String)> {
        let (name, value) = line.split_once(':')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.trim().to_string()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(n, v)| (n.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_preserved_in_order() {
        let headers: Headers = vec![
            ("Link", "<a>; rel=\"first\""),
            ("Content-Type", "text/html"),
            ("Link", "<b>; rel=\"last\""),
        ]
        .into_iter()
        .collect();

        assert_eq!(headers.len(), 3);
        let links: Vec<&str> = headers.get_all("link").collect();
        assert_eq!(links, vec!["<a>; rel=\"first\"", "<b>; rel=\"last\""]);
        assert_eq!(headers.get("content-type"), Some("text/html"));
    }

    #[test]
    fn serializes_as_pairs() {
        let mut headers = Headers::new();
        headers.append("key1", "value1");
        headers.append("key1", "value2");
        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(json, r#"[["key1","value1"],["key1","value2"]]"#);
        let back: Headers = serde_json::from_str(&json).unwrap();
        assert_eq!(back, headers);
    }

    #[test]
    fn parse_line_splits_on_first_colon() {
        assert_eq!(
            Headers::parse_line("Memento-Datetime: Tue, 21 Jan 2016 15:45:06 GMT"),
            Some((
                "Memento-Datetime".to_string(),
                "Tue, 21 Jan 2016 15:45:06 GMT".to_string()
            ))
        );
        assert_eq!(Headers::parse_line("no colon here"), None);
        assert_eq!(Headers::parse_line(": empty name"), None);
    }
}
