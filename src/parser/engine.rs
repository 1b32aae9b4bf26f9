//! Core parsing engine - RowParser with streaming API.
//!
//! This module implements the push-based parser. It provides a pure
//! streaming interface:
//!
//! - [`RowParser`] - Stateful engine that turns byte chunks into rows
//! - `push()` - Feed data in any size (1 byte, 8KB, 1MB, etc.)
//! - `finish()` - Flush the decoder and the last unterminated record
//!
//! # Example
//!
//! ```
//! use csvrows::{ParserConfig, RowParser};
//!
//! let mut parser = RowParser::new(ParserConfig::default())?;
//!
//! // Feed data in any size
//! let rows1 = parser.push(b"id,name\n1,Al")?;
//! let rows2 = parser.push(b"ice\n2,Bob")?;
//!
//! // When the stream ends, get the final row
//! let last = parser.finish()?;
//!
//! assert!(rows1.is_empty());
//! assert_eq!(rows2.len(), 1);
//! assert!(last.is_some());
//! # Ok::<(), csvrows::CsvError>(())
//! ```

use std::fmt;
use std::time::Instant;

use crate::config::ParserConfig;
use crate::decode::Utf8Decoder;
use crate::error::CsvError;
use crate::observer::{ParseObserver, ParseSummary};
use crate::row::{Assembled, RecordAssembler, Row};
use crate::tokenizer::Tokenizer;

/// A parser that turns a streaming byte source into rows.
///
/// `RowParser` accepts bytes via `push()` and yields each row as soon as its
/// record is terminated. It keeps decoder and tokenizer state across calls,
/// so the rows produced never depend on how the input was split.
///
/// # Streaming API
///
/// - Call `push()` (or `push_with()`) with data in any size
/// - Rows completed by that data come back immediately
/// - Call `finish()` when the stream ends to get the final row, if the input
///   did not end with a line terminator
///
/// # Determinism
///
/// Identical byte streams produce identical rows, regardless of:
/// - How many bytes are pushed at once (1 byte vs 1MB)
/// - Where chunk boundaries fall, including inside a multi-byte character,
///   a CRLF pair or a doubled quote
///
/// # Single use
///
/// After `finish()` returns, or after any call returns an error, the parser
/// rejects further input with [`CsvError::AlreadyFinished`].
///
/// # Memory Considerations
///
/// Only the record being assembled and the header row are held internally.
/// Rows are handed to the caller; keeping them is the caller's choice.
pub struct RowParser {
    config: ParserConfig,
    decoder: Utf8Decoder,
    tokenizer: Tokenizer,
    assembler: RecordAssembler,
    observer: Option<Box<dyn ParseObserver>>,
    text: String,
    bytes: u64,
    started: Instant,
    finished: bool,
}

impl RowParser {
    /// Creates a new parser with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] if the configuration is invalid.
    /// This happens before any input is read.
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::{ParserConfig, RowParser};
    ///
    /// let parser = RowParser::new(ParserConfig::default())?;
    /// assert!(RowParser::new(ParserConfig::default().with_quote(',')).is_err());
    /// # Ok::<(), csvrows::CsvError>(())
    /// ```
    pub fn new(config: ParserConfig) -> Result<Self, CsvError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ParserConfig) -> Self {
        Self {
            config,
            decoder: Utf8Decoder::new(),
            tokenizer: Tokenizer::new(config.delimiter(), config.quote()),
            assembler: RecordAssembler::new(&config),
            observer: None,
            text: String::new(),
            bytes: 0,
            started: Instant::now(),
            finished: false,
        }
    }

    /// Attaches a diagnostic observer.
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::{ParserConfig, RowParser, TracingObserver};
    ///
    /// let parser = RowParser::new(ParserConfig::default())?
    ///     .with_observer(TracingObserver);
    /// # Ok::<(), csvrows::CsvError>(())
    /// ```
    pub fn with_observer(mut self, observer: impl ParseObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Pushes data into the parser and returns the rows it completes.
    ///
    /// # Errors
    ///
    /// - [`CsvError::MalformedRow`] if a record has the wrong number of fields
    /// - [`CsvError::DuplicateHeader`] if duplicates are rejected and found
    /// - [`CsvError::AlreadyFinished`] if the parser is finished or failed
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::{ParserConfig, RowParser};
    ///
    /// let mut parser = RowParser::new(ParserConfig::default())?;
    /// assert!(parser.push(b"a,b\n")?.is_empty());
    /// assert_eq!(parser.push(b"1,2\n3,4\n")?.len(), 2);
    /// # Ok::<(), csvrows::CsvError>(())
    /// ```
    pub fn push(&mut self, data: &[u8]) -> Result<Vec<Row>, CsvError> {
        let mut rows = Vec::new();
        self.push_with(data, |row| rows.push(row))?;
        Ok(rows)
    }

    /// Pushes data into the parser, handing each completed row to `sink`.
    ///
    /// Same as [`RowParser::push`] without collecting rows into a vector.
    /// Rows delivered before an error stay delivered; the error still ends
    /// the parse.
    pub fn push_with<F>(&mut self, data: &[u8], mut sink: F) -> Result<(), CsvError>
    where
        F: FnMut(Row),
    {
        if self.finished {
            return Err(CsvError::AlreadyFinished);
        }
        self.bytes += data.len() as u64;

        let mut text = std::mem::take(&mut self.text);
        text.clear();
        self.decoder.decode(data, &mut text);
        let result = self.run(&text, &mut sink);
        self.text = text;

        if result.is_err() {
            self.finished = true;
        }
        result
    }

    /// Finalizes the parse and returns the last row, if any.
    ///
    /// Call this method when the input stream ends. It flushes the decoder,
    /// checks that no quoted field is left open, and turns a pending
    /// unterminated record into a row.
    ///
    /// # Errors
    ///
    /// - [`CsvError::UnclosedQuote`] if the input ended inside quotes
    /// - [`CsvError::MalformedRow`] if the last record has the wrong shape
    /// - [`CsvError::EmptyInput`] if no header row was ever seen
    /// - [`CsvError::AlreadyFinished`] on a second call
    ///
    /// # Example
    ///
    /// ```
    /// use csvrows::{CsvError, ParserConfig, RowParser};
    ///
    /// let mut parser = RowParser::new(ParserConfig::default())?;
    /// assert!(matches!(parser.finish(), Err(CsvError::EmptyInput)));
    /// # Ok::<(), csvrows::CsvError>(())
    /// ```
    pub fn finish(&mut self) -> Result<Option<Row>, CsvError> {
        if self.finished {
            return Err(CsvError::AlreadyFinished);
        }
        self.finished = true;

        let mut text = std::mem::take(&mut self.text);
        text.clear();
        self.decoder.flush(&mut text);

        let mut last = None;
        self.run(&text, &mut |row| last = Some(row))?;

        if let Some(record) = self.tokenizer.finish()? {
            deliver(
                &mut self.assembler,
                &mut self.observer,
                record,
                &mut |row| last = Some(row),
            )?;
        }

        if self.assembler.headers().is_none() {
            return Err(CsvError::EmptyInput);
        }

        let summary = self.summary();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_finish(&summary);
        }

        Ok(last)
    }

    /// Returns the header row once it has been read.
    pub fn headers(&self) -> Option<&[String]> {
        self.assembler.headers()
    }

    /// Returns the number of data rows produced so far.
    pub fn rows_emitted(&self) -> u64 {
        self.assembler.rows_emitted()
    }

    /// Returns the number of raw bytes pushed so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes
    }

    /// Returns the number of bytes held back as an incomplete character.
    pub fn pending_len(&self) -> usize {
        self.decoder.pending_len()
    }

    /// Returns `true` once the parser has finished or failed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the configuration used by this parser.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Returns progress figures for the parse so far.
    pub fn summary(&self) -> ParseSummary {
        ParseSummary {
            rows: self.assembler.rows_emitted(),
            bytes: self.bytes,
            elapsed: self.started.elapsed(),
        }
    }

    /// Consumes the parser, returning the header row.
    pub(crate) fn into_headers(self) -> Option<Vec<String>> {
        self.assembler.into_headers()
    }

    fn run(&mut self, text: &str, sink: &mut impl FnMut(Row)) -> Result<(), CsvError> {
        let assembler = &mut self.assembler;
        let observer = &mut self.observer;
        self.tokenizer
            .feed(text, |record| deliver(assembler, observer, record, &mut *sink))
    }
}

/// Routes one record: headers go to the observer, rows go to the sink.
fn deliver(
    assembler: &mut RecordAssembler,
    observer: &mut Option<Box<dyn ParseObserver>>,
    record: Vec<String>,
    sink: &mut impl FnMut(Row),
) -> Result<(), CsvError> {
    match assembler.assemble(record)? {
        Assembled::Headers(headers) => {
            if let Some(observer) = observer.as_mut() {
                observer.on_headers(headers);
            }
        }
        Assembled::Row(row) => sink(row),
    }
    Ok(())
}

impl Default for RowParser {
    fn default() -> Self {
        Self::build(ParserConfig::default())
    }
}

impl fmt::Debug for RowParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowParser")
            .field("config", &self.config)
            .field("tokenizer", &self.tokenizer)
            .field("headers", &self.assembler.headers())
            .field("rows_emitted", &self.assembler.rows_emitted())
            .field("bytes", &self.bytes)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
