//! Collecting parser - push chunks, then finalize into one result.

use serde::Serialize;

use crate::config::ParserConfig;
use crate::error::CsvError;
use crate::observer::ParseObserver;
use crate::row::Row;

use super::RowParser;

/// Everything a finished parse produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParseResult {
    /// Data rows in input order.
    pub rows: Vec<Row>,
    /// The header row, verbatim.
    pub headers: Vec<String>,
    /// Number of data rows.
    pub count: usize,
}

/// Incremental parser that buffers every row until [`CsvParser::finalize`].
///
/// This is a convenience wrapper over [`RowParser`] for callers that want the
/// whole result at once. `finalize` consumes the parser, so it cannot be fed
/// again afterwards.
///
/// # Example
///
/// ```
/// use csvrows::{CsvParser, ParserConfig, Value};
///
/// let mut parser = CsvParser::new(ParserConfig::default())?;
/// parser.feed_chunk("a,b,c\n1,2,3\n")?;
/// parser.feed_chunk("4,5,6\n")?;
///
/// let result = parser.finalize()?;
/// assert_eq!(result.headers, ["a", "b", "c"]);
/// assert_eq!(result.count, 2);
/// assert_eq!(result.rows[1].get("c"), Some(&Value::Number(6.0)));
/// # Ok::<(), csvrows::CsvError>(())
/// ```
#[derive(Debug)]
pub struct CsvParser {
    inner: RowParser,
    rows: Vec<Row>,
}

impl CsvParser {
    /// Creates a new parser.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: ParserConfig) -> Result<Self, CsvError> {
        Ok(Self {
            inner: RowParser::new(config)?,
            rows: Vec::new(),
        })
    }

    /// Attaches a diagnostic observer.
    pub fn with_observer(mut self, observer: impl ParseObserver + 'static) -> Self {
        self.inner = self.inner.with_observer(observer);
        self
    }

    /// Feeds the next chunk of raw bytes.
    pub fn feed_chunk(&mut self, chunk: impl AsRef<[u8]>) -> Result<(), CsvError> {
        let rows = &mut self.rows;
        self.inner.push_with(chunk.as_ref(), |row| rows.push(row))
    }

    /// Returns the header row once it has been read.
    pub fn headers(&self) -> Option<&[String]> {
        self.inner.headers()
    }

    /// Returns the number of rows collected so far.
    pub fn count(&self) -> usize {
        self.rows.len()
    }

    /// Ends the input and returns the collected result.
    ///
    /// # Errors
    ///
    /// Any error [`RowParser::finish`] can return. No partial result is
    /// returned on error.
    pub fn finalize(mut self) -> Result<ParseResult, CsvError> {
        if let Some(row) = self.inner.finish()? {
            self.rows.push(row);
        }

        let headers = self.inner.into_headers().unwrap_or_default();
        let count = self.rows.len();
        Ok(ParseResult {
            rows: self.rows,
            headers,
            count,
        })
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            inner: RowParser::default(),
            rows: Vec::new(),
        }
    }
}
