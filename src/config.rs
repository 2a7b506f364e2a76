use crate::error::RoundtripError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = RoundtripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(RoundtripError::Format(other.to_string())),
        }
    }
}

/// Everything a run needs to know, gathered from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// CSV to read, stdin when `None` or `-`.
    pub input: Option<PathBuf>,
    /// Where results go, stdout when `None` or `-`.
    pub output: Option<PathBuf>,
    /// Where unresolvable rows go. Only counted when `None`.
    pub discards: Option<PathBuf>,
    /// 1 based column number or header name.
    pub column: String,
    pub format: OutputFormat,
    /// Rows resolved at once. Output order never depends on this.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            discards: None,
            column: "1".to_string(),
            format: OutputFormat::Csv,
            concurrency: 1,
        }
    }
}

impl Config {
    /// The output path, or `None` when results go to stdout.
    pub fn output_path(&self) -> Option<&Path> {
        self.output
            .as_deref()
            .filter(|path| path.as_os_str() != "-")
    }

    /// Human readable output destination.
    pub fn output_name(&self) -> String {
        match self.output_path() {
            Some(path) => path.display().to_string(),
            None => "stdout".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn dash_means_stdout() {
        let mut config = Config::default();
        assert_eq!(config.output_name(), "stdout");
        config.output = Some(PathBuf::from("-"));
        assert_eq!(config.output_path(), None);
        config.output = Some(PathBuf::from("out.csv"));
        assert_eq!(config.output_name(), "out.csv");
    }
}
