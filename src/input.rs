use crate::error::RoundtripError;
use crate::Result;
use std::fs::File;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// A fully read CSV table. The first record is the header and every data
/// record is guaranteed to have the same number of fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    source: String,
    header: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Input {
    /// Reads `path`, or stdin when the path is missing or `-`.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(filepath) if filepath.as_os_str() != "-" => {
                let file = File::open(filepath).map_err(|e| {
                    RoundtripError::Open(format!("tried to read file {} got {}", filepath.display(), e))
                })?;
                Self::from_reader(file, filepath.display().to_string())
            }
            _ => {
                let stdin = io::stdin();
                if stdin.is_terminal() {
                    return Err(RoundtripError::StdinTerminal);
                }
                Self::from_reader(stdin.lock(), "stdin".to_string())
            }
        }
    }

    /// Parses a whole CSV document and checks that every record matches the
    /// header width. Nothing is resolved if this fails.
    pub fn from_reader<R: Read>(reader: R, source: String) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let mut rows = rows.into_iter();
        let header = rows.next().ok_or(RoundtripError::EmptyInput)?;
        let records: Vec<Vec<String>> = rows.collect();

        for (i, record) in records.iter().enumerate() {
            if record.len() != header.len() {
                return Err(RoundtripError::RowLength {
                    line: i + 2,
                    found: record.len(),
                    expected: header.len(),
                    record: record.join(","),
                });
            }
        }

        Ok(Self {
            source,
            header,
            records,
        })
    }

    /// Where the table came from, `stdin` or the file path.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }

    /// Number of lines read, header included.
    pub fn lines(&self) -> usize {
        self.records.len() + 1
    }

    /// Resolves a column selector to a zero based index. A selector that
    /// parses as an integer is a 1 based position, anything else is matched
    /// against the header names.
    pub fn column(&self, selector: &str) -> Result<usize> {
        match selector.trim().parse::<i64>() {
            Ok(position) => {
                if position < 1 || position as usize > self.header.len() {
                    return Err(RoundtripError::ColumnOutOfRange(position));
                }
                Ok(position as usize - 1)
            }
            Err(_) => self
                .header
                .iter()
                .rposition(|name| name == selector)
                .ok_or_else(|| RoundtripError::ColumnNotFound(selector.to_string())),
        }
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
        (self.header, self.records)
    }
}
