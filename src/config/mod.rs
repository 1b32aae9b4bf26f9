//! Configuration for parsing behavior.
//!
//! - [`ParserConfig`] - Delimiter, quote character and value classification
//! - [`DuplicateHeaders`] - What to do when the header row repeats a name
//!
//! # Example
//!
//! ```
//! use csvrows::{DuplicateHeaders, ParserConfig};
//!
//! // Semicolon separated, single-quoted
//! let config = ParserConfig::new(";", "'")?;
//!
//! // Builder pattern
//! let config = ParserConfig::default()
//!     .with_delimiter('\t')
//!     .with_classify_numbers(false)
//!     .with_duplicate_headers(DuplicateHeaders::Reject);
//! config.validate()?;
//!
//! # Ok::<(), csvrows::CsvError>(())
//! ```

use crate::error::CsvError;

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Default quote character.
pub const DEFAULT_QUOTE: char = '"';

/// Policy for header rows that name the same column more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DuplicateHeaders {
    /// Keep parsing. In each row the later column's value replaces the
    /// earlier one under the shared key.
    #[default]
    Overwrite,
    /// Fail with [`CsvError::DuplicateHeader`] as soon as the header row is read.
    Reject,
}

/// Configuration for a single parse.
///
/// A config is `Copy` and is fixed for the lifetime of the parser it builds.
///
/// # Constraints
///
/// - `delimiter` and `quote` are single characters
/// - `delimiter != quote`
/// - neither is CR or LF
///
/// # Example
///
/// ```
/// use csvrows::ParserConfig;
///
/// let config = ParserConfig::default();
/// assert_eq!(config.delimiter(), ',');
/// assert_eq!(config.quote(), '"');
/// assert!(config.classify_numbers());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserConfig {
    /// Field separator.
    delimiter: char,

    /// Opens and closes quoted spans.
    quote: char,

    /// Convert fields matching the numeric grammar into numbers.
    classify_numbers: bool,

    /// Duplicate header policy.
    duplicate_headers: DuplicateHeaders,
}

impl ParserConfig {
    /// Creates a configuration from delimiter and quote strings.
    ///
    /// This is the entry point for options that arrive as text (command-line
    /// flags, query parameters). Number classification stays enabled.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] if either string is not exactly one
    /// character, or the resulting pair violates the constraints above.
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::ParserConfig;
    ///
    /// let config = ParserConfig::new(";", "\"")?;
    /// assert_eq!(config.delimiter(), ';');
    ///
    /// assert!(ParserConfig::new(";;", "\"").is_err());
    /// assert!(ParserConfig::new("", "\"").is_err());
    /// # Ok::<(), csvrows::CsvError>(())
    /// ```
    pub fn new(delimiter: &str, quote: &str) -> Result<Self, CsvError> {
        let delimiter = single_char(delimiter).ok_or(CsvError::InvalidConfig {
            message: "delimiter must be exactly one character",
        })?;
        let quote = single_char(quote).ok_or(CsvError::InvalidConfig {
            message: "quote must be exactly one character",
        })?;

        let config = Self {
            delimiter,
            quote,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Sets the field delimiter.
    ///
    /// Note: This does not validate the configuration. Use
    /// [`ParserConfig::validate`] to check if the configuration is valid.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    ///
    /// Note: This does not validate the configuration.
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Enables or disables numeric classification of field values.
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::ParserConfig;
    ///
    /// let config = ParserConfig::default().with_classify_numbers(false);
    /// assert!(!config.classify_numbers());
    /// ```
    pub fn with_classify_numbers(mut self, classify: bool) -> Self {
        self.classify_numbers = classify;
        self
    }

    /// Sets the duplicate header policy.
    pub fn with_duplicate_headers(mut self, policy: DuplicateHeaders) -> Self {
        self.duplicate_headers = policy;
        self
    }

    /// Returns the field delimiter.
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the quote character.
    pub fn quote(&self) -> char {
        self.quote
    }

    /// Returns whether numeric fields are converted to numbers.
    pub fn classify_numbers(&self) -> bool {
        self.classify_numbers
    }

    /// Returns the duplicate header policy.
    pub fn duplicate_headers(&self) -> DuplicateHeaders {
        self.duplicate_headers
    }

    /// Validates the current configuration.
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::ParserConfig;
    ///
    /// let config = ParserConfig::default().with_quote(',');
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), CsvError> {
        if self.delimiter == self.quote {
            return Err(CsvError::InvalidConfig {
                message: "delimiter and quote must differ",
            });
        }

        if is_line_break(self.delimiter) {
            return Err(CsvError::InvalidConfig {
                message: "delimiter cannot be a line break",
            });
        }

        if is_line_break(self.quote) {
            return Err(CsvError::InvalidConfig {
                message: "quote cannot be a line break",
            });
        }

        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            quote: DEFAULT_QUOTE,
            classify_numbers: true,
            duplicate_headers: DuplicateHeaders::Overwrite,
        }
    }
}

pub(crate) fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.delimiter(), DEFAULT_DELIMITER);
        assert_eq!(config.quote(), DEFAULT_QUOTE);
        assert!(config.classify_numbers());
        assert_eq!(config.duplicate_headers(), DuplicateHeaders::Overwrite);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = ParserConfig::default()
            .with_delimiter('|')
            .with_quote('\'')
            .with_classify_numbers(false)
            .with_duplicate_headers(DuplicateHeaders::Reject);

        assert_eq!(config.delimiter(), '|');
        assert_eq!(config.quote(), '\'');
        assert!(!config.classify_numbers());
        assert_eq!(config.duplicate_headers(), DuplicateHeaders::Reject);
    }

    #[test]
    fn test_multibyte_single_char_accepted() {
        let config = ParserConfig::new("§", "\"").unwrap();
        assert_eq!(config.delimiter(), '§');
    }

    #[test]
    fn test_invalid_config_empty() {
        assert!(matches!(
            ParserConfig::new("", "\""),
            Err(CsvError::InvalidConfig { .. })
        ));
        assert!(ParserConfig::new(",", "").is_err());
    }

    #[test]
    fn test_invalid_config_multi_char() {
        assert!(ParserConfig::new(",,", "\"").is_err());
        assert!(ParserConfig::new(",", "''").is_err());
    }

    #[test]
    fn test_invalid_config_same_char() {
        assert!(ParserConfig::new("\"", "\"").is_err());
    }

    #[test]
    fn test_invalid_config_line_break() {
        assert!(ParserConfig::new("\n", "\"").is_err());
        assert!(ParserConfig::new(",", "\r").is_err());
    }
}
