//! Command-line argument definitions.

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::{DEFAULT_DELIMITER, DEFAULT_QUOTE, ParserConfig};
use crate::error::CsvError;

/// Convert CSV into a JSON array of rows keyed by the header.
#[derive(Parser, Debug, Clone)]
#[command(name = "csvrows")]
#[command(about = "Convert CSV into a JSON array of rows keyed by the header")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Input file (reads stdin when absent or `-`)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Field delimiter (exactly one character)
    #[arg(short, long, default_value_t = DEFAULT_DELIMITER.to_string())]
    pub delimiter: String,

    /// Quote character (exactly one character)
    #[arg(short, long, default_value_t = DEFAULT_QUOTE.to_string())]
    pub quote: String,

    /// Pretty-print the JSON output (default)
    #[arg(long, conflicts_with = "compact")]
    pub pretty: bool,

    /// Write the JSON output on a single line
    #[arg(long)]
    pub compact: bool,

    /// Keep every field as a string
    #[arg(long)]
    pub no_parse_number: bool,

    /// Log parse progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl Args {
    /// The input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&Path> {
        self.input.as_deref().filter(|p| *p != Path::new("-"))
    }

    /// Whether the output is pretty-printed.
    pub fn is_pretty(&self) -> bool {
        !self.compact
    }

    /// Builds the parser configuration from the flags.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] when the delimiter or quote is not
    /// a single character, or the two collide.
    pub fn parser_config(&self) -> Result<ParserConfig, CsvError> {
        Ok(ParserConfig::new(&self.delimiter, &self.quote)?
            .with_classify_numbers(!self.no_parse_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["csvrows"]).unwrap();
        assert!(args.input_path().is_none());
        assert!(args.is_pretty());
        assert!(!args.verbose);
        assert_eq!(args.parser_config().unwrap(), ParserConfig::default());
    }

    #[test]
    fn test_stdin_dash() {
        let args = Args::try_parse_from(["csvrows", "-"]).unwrap();
        assert!(args.input_path().is_none());

        let args = Args::try_parse_from(["csvrows", "data.csv"]).unwrap();
        assert_eq!(args.input_path(), Some(Path::new("data.csv")));
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "csvrows",
            "-d",
            ";",
            "--quote",
            "'",
            "--compact",
            "--no-parse-number",
            "-v",
            "-o",
            "out.json",
        ])
        .unwrap();

        let config = args.parser_config().unwrap();
        assert_eq!(config.delimiter(), ';');
        assert_eq!(config.quote(), '\'');
        assert!(!config.classify_numbers());
        assert!(!args.is_pretty());
        assert!(args.verbose);
        assert_eq!(args.output.as_deref(), Some(Path::new("out.json")));
    }

    #[test]
    fn test_pretty_conflicts_with_compact() {
        assert!(Args::try_parse_from(["csvrows", "--pretty", "--compact"]).is_err());
    }

    #[test]
    fn test_invalid_delimiter() {
        let args = Args::try_parse_from(["csvrows", "-d", "ab"]).unwrap();
        assert!(matches!(
            args.parser_config(),
            Err(CsvError::InvalidConfig { .. })
        ));
    }
}
