use crate::config::OutputFormat;
use crate::error::RoundtripError;
use crate::Result;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Opens `path` for writing, truncating it, or stdout when `None`.
pub fn destination(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| RoundtripError::Output(format!("{}: {}", path.display(), e)))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Writes the header and rows in the requested format.
pub fn write_table<W: Write>(
    writer: W,
    format: OutputFormat,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, header, rows),
        OutputFormat::Json => write_json(writer, header, rows),
    }
}

pub fn write_csv<W: Write>(writer: W, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

// One output row as a JSON object, keys in header order.
struct Keyed<'a> {
    header: &'a [String],
    row: &'a [String],
}

impl Serialize for Keyed<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.header.len()))?;
        for (key, value) in self.header.iter().zip(self.row) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub fn write_json<W: Write>(mut writer: W, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let keyed: Vec<Keyed<'_>> = rows
        .iter()
        .map(|row| Keyed {
            header,
            row: row.as_slice(),
        })
        .collect();
    serde_json::to_writer_pretty(&mut writer, &keyed)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes discarded rows as CSV under the original header.
pub fn write_discards(path: &Path, header: &[String], rows: &[Vec<String>]) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| RoundtripError::Discards(format!("{}: {}", path.display(), e)))?;
    write_csv(BufWriter::new(file), header, rows)
        .map_err(|e| RoundtripError::Discards(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn csv_quotes_when_needed() {
        let mut buf = Vec::new();
        let header = strings(&["id", "note"]);
        let rows = vec![strings(&["1", "a, b"]), strings(&["2", "plain"])];
        write_csv(&mut buf, &header, &rows).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "id,note\n1,\"a, b\"\n2,plain\n"
        );
    }

    #[test]
    fn json_keeps_header_order() {
        let mut buf = Vec::new();
        let header = strings(&["zeta", "alpha"]);
        let rows = vec![strings(&["1", "2"])];
        write_table(&mut buf, OutputFormat::Json, &header, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.find("zeta").unwrap() < text.find("alpha").unwrap());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value, serde_json::json!([{"zeta": "1", "alpha": "2"}]));
    }

    #[test]
    fn unwritable_destination_is_reported() {
        let err = destination(Some(Path::new("/nonexistent/dir/out.csv")))
            .err()
            .unwrap();
        assert!(err.to_string().starts_with("couldn't create output:"));
    }
}
