use std::fmt;
use std::io;
use thiserror::Error;

/// Fatal errors. Any of these aborts the run; per-row lookup failures are
/// never represented here, see [`LookupError`].
#[derive(Debug, Error)]
pub enum RoundtripError {
    #[error("{0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    ParseInt(#[from] std::num::ParseIntError),

    #[error("failed to open input: {0}")]
    Open(String),

    #[error("stdin doesn't look like something I can read")]
    StdinTerminal,

    #[error("input is empty, expected a header row")]
    EmptyInput,

    #[error("record {line} has {found} columns, I was expecting {expected}\n{record}")]
    RowLength {
        line: usize,
        found: usize,
        expected: usize,
        record: String,
    },

    #[error("can't find input column '{0}'")]
    ColumnNotFound(String),

    #[error("input column {0} is out of range")]
    ColumnOutOfRange(i64),

    #[error("couldn't create output: {0}")]
    Output(String),

    #[error("while writing discards: {0}")]
    Discards(String),

    #[error("unknown output format '{0}'")]
    Format(String),

    #[error("couldn't build system resolver: {0}")]
    Resolver(String),

    #[error("couldn't set up logging: {0}")]
    Logging(String),
}

/// A single failed forward or reverse lookup. The round-trip resolver turns
/// these into error markers on the affected row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupError {
    query: String,
    reason: String,
}

impl LookupError {
    pub fn new(query: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            reason: reason.into(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

impl std::error::Error for LookupError {}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lookup {}: {}", self.query, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_error_names_the_query() {
        let err = LookupError::new("example.com", "no such host");
        assert_eq!(err.to_string(), "lookup example.com: no such host");
        assert_eq!(err.query(), "example.com");
    }

    #[test]
    fn row_length_message_points_at_file_line() {
        let err = RoundtripError::RowLength {
            line: 3,
            found: 1,
            expected: 2,
            record: "oops".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "record 3 has 1 columns, I was expecting 2\noops"
        );
    }
}
