//! In-memory input, parsed as a single chunk.

use crate::config::ParserConfig;
use crate::error::CsvError;
use crate::parser::{CsvParser, ParseResult};

/// Parses a complete string.
///
/// # Example
///
/// ```
/// use csvrows::{parse_str, ParserConfig, Value};
///
/// let config = ParserConfig::new(";", "\"")?;
/// let result = parse_str("name;age\n\"Doe;John\";30\n", config)?;
///
/// assert_eq!(result.rows[0].get("name").and_then(Value::as_str), Some("Doe;John"));
/// assert_eq!(result.rows[0].get("age"), Some(&Value::Number(30.0)));
/// # Ok::<(), csvrows::CsvError>(())
/// ```
pub fn parse_str(input: &str, config: ParserConfig) -> Result<ParseResult, CsvError> {
    parse_bytes(input, config)
}

/// Parses a complete byte buffer.
pub fn parse_bytes(input: impl AsRef<[u8]>, config: ParserConfig) -> Result<ParseResult, CsvError> {
    let mut parser = CsvParser::new(config)?;
    parser.feed_chunk(input)?;
    parser.finalize()
}
