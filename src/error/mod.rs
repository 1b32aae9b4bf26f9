//! Error types for csvrows.

use thiserror::Error;

/// Errors that can occur while configuring or running a parse.
///
/// Every variant is fatal: once a parser has returned an error it yields no
/// partial result and refuses further input.
#[derive(Debug, Error)]
pub enum CsvError {
    /// A data record did not have as many fields as the header row.
    #[error("malformed row {row}: expected {expected} fields, found {actual}")]
    MalformedRow {
        /// 1-based index of the data row (the header row is not counted).
        row: u64,
        /// Number of columns in the header row.
        expected: usize,
        /// Number of fields in the offending record.
        actual: usize,
    },

    /// The input ended inside a quoted field.
    #[error("unclosed quote: input ended inside a quoted field")]
    UnclosedQuote,

    /// The input produced no header row at all.
    #[error("empty input: no header row found")]
    EmptyInput,

    /// The header row names the same column twice and duplicates are rejected.
    #[error("duplicate header {name:?} in column {column}")]
    DuplicateHeader {
        /// The repeated header name.
        name: String,
        /// 1-based column of the second occurrence.
        column: usize,
    },

    /// Invalid configuration parameter.
    #[error("invalid config: {message}")]
    InvalidConfig {
        /// Description of what was invalid.
        message: &'static str,
    },

    /// Input was pushed into a parser that already finished or failed.
    #[error("parser already finished")]
    AlreadyFinished,

    /// An I/O error occurred while reading input data.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvError {
    /// Returns `true` when the error was caused by the input itself
    /// (or by the options chosen for it) rather than by the environment.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, CsvError::Io(_) | CsvError::AlreadyFinished)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: CsvError = io_err.into();
        assert!(matches!(err, CsvError::Io(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_malformed_row_display() {
        let err = CsvError::MalformedRow {
            row: 1,
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            err.to_string(),
            "malformed row 1: expected 2 fields, found 1"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn test_display() {
        assert!(CsvError::UnclosedQuote.to_string().contains("unclosed quote"));
        assert!(CsvError::EmptyInput.to_string().contains("no header row"));
        let err = CsvError::InvalidConfig {
            message: "delimiter must be exactly one character",
        };
        assert!(err.to_string().starts_with("invalid config"));
    }
}
