use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

// Ordered, duplicate free collection of addresses or hostnames. Iteration is
// always ascending on the string form, which is what ends up in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSet {
    inner: BTreeSet<String>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: impl Into<String>) -> bool {
        self.inner.insert(value.into())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.inner.contains(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.inner.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for RecordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = RecordSet::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for RecordSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.inner.extend(iter.into_iter().map(Into::into));
    }
}

impl fmt::Display for RecordSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(value)?;
        }
        Ok(())
    }
}

/// One direction of a round trip: either the records found or the reason the
/// lookup failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Records(RecordSet),
    Error(String),
}

impl Answer {
    pub fn empty() -> Self {
        Answer::Records(RecordSet::new())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Answer::Error(_))
    }

    pub fn records(&self) -> Option<&RecordSet> {
        match self {
            Answer::Records(set) => Some(set),
            Answer::Error(_) => None,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Records(set) => fmt::Display::fmt(set, f),
            Answer::Error(reason) => write!(f, "ERROR: {}", reason),
        }
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of resolving one identifier in both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Addresses from forward lookups.
    pub forward: Answer,
    /// Hostnames from reverse lookups.
    pub reverse: Answer,
    pub consistent: bool,
}

impl ResolutionResult {
    pub(crate) fn resolved(forward: RecordSet, reverse: RecordSet, consistent: bool) -> Self {
        Self {
            forward: Answer::Records(forward),
            reverse: Answer::Records(reverse),
            consistent,
        }
    }

    pub(crate) fn forward_failed(reason: impl fmt::Display) -> Self {
        Self {
            forward: Answer::Error(reason.to_string()),
            reverse: Answer::empty(),
            consistent: false,
        }
    }

    pub(crate) fn reverse_failed(reason: impl fmt::Display) -> Self {
        Self {
            forward: Answer::empty(),
            reverse: Answer::Error(reason.to_string()),
            consistent: false,
        }
    }

    /// The `yes`/`no` flag written to the output.
    pub fn verdict(&self) -> &'static str {
        if self.consistent {
            "yes"
        } else {
            "no"
        }
    }

    /// The three derived column values, in output order.
    pub fn columns(&self) -> [String; 3] {
        [
            self.forward.to_string(),
            self.reverse.to_string(),
            self.verdict().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_set_sorts_and_dedups() {
        let set: RecordSet = ["192.0.2.9", "192.0.2.10", "192.0.2.9", "10.0.0.1"]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 3);
        assert_eq!(set.to_string(), "10.0.0.1 192.0.2.10 192.0.2.9");
        assert!(set.contains("192.0.2.10"));
        assert!(!set.contains("192.0.2.1"));
    }

    #[test]
    fn error_answers_render_with_marker() {
        let result = ResolutionResult::reverse_failed("lookup 192.0.2.1: no such host");
        assert_eq!(
            result.columns(),
            [
                String::new(),
                "ERROR: lookup 192.0.2.1: no such host".to_string(),
                "no".to_string()
            ]
        );
        assert!(result.reverse.is_error());
        assert!(result.forward.records().unwrap().is_empty());
    }

    #[test]
    fn result_serializes_as_flat_strings() {
        let result = ResolutionResult::resolved(
            ["192.0.2.5"].into_iter().collect(),
            ["example.com"].into_iter().collect(),
            true,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "forward": "192.0.2.5",
                "reverse": "example.com",
                "consistent": true,
            })
        );
    }
}
