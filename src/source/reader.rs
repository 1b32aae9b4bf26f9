//! Blocking reader adapter - RowIter and parse_reader.
//!
//! # Example
//!
//! ```no_run
//! use csvrows::{ParserConfig, RowIter};
//! use std::fs::File;
//!
//! let file = File::open("data.csv")?;
//! let mut rows = RowIter::new(file, ParserConfig::default())?;
//!
//! while let Some(row) = rows.next() {
//!     let row = row?;
//!     println!("{:?}", row);
//! }
//! # Ok::<(), csvrows::CsvError>(())
//! ```

use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use tracing::trace;

use crate::buffer::ReadBuffer;
use crate::config::ParserConfig;
use crate::error::CsvError;
use crate::observer::ParseObserver;
use crate::parser::{CsvParser, ParseResult, RowParser};
use crate::row::Row;

/// An iterator that yields rows from a reader.
///
/// `RowIter` reads from a [`std::io::Read`] source 8 KiB at a time and yields
/// rows as their records complete. It holds only the rows completed by the
/// latest read, so memory stays flat for arbitrarily large inputs.
///
/// After an error is yielded the iterator is fused. Rows that precede the
/// failing record are always yielded first, however the input was split.
pub struct RowIter<R> {
    reader: R,
    parser: RowParser,
    buffer: ReadBuffer,
    pending: VecDeque<Row>,
    error: Option<CsvError>,
    finished: bool,
}

impl<R: Read> RowIter<R> {
    /// Creates a new row iterator.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::InvalidConfig`] if the configuration is invalid.
    pub fn new(reader: R, config: ParserConfig) -> Result<Self, CsvError> {
        Ok(Self::from_parser(reader, RowParser::new(config)?))
    }

    /// Creates a row iterator driving an already configured parser.
    pub fn from_parser(reader: R, parser: RowParser) -> Self {
        Self {
            reader,
            parser,
            buffer: ReadBuffer::take(),
            pending: VecDeque::new(),
            error: None,
            finished: false,
        }
    }

    /// Attaches a diagnostic observer.
    pub fn with_observer(mut self, observer: impl ParseObserver + 'static) -> Self {
        self.parser = self.parser.with_observer(observer);
        self
    }

    /// Returns the header row once it has been read.
    pub fn headers(&self) -> Option<&[String]> {
        self.parser.headers()
    }

    /// Returns the number of rows produced so far.
    pub fn rows_emitted(&self) -> u64 {
        self.parser.rows_emitted()
    }

    /// Reads once from the source and feeds the parser.
    fn fill(&mut self) {
        match self.reader.read(self.buffer.as_mut_slice()) {
            Ok(0) => {
                trace!(bytes = self.parser.bytes_consumed(), "end of input");
                self.finished = true;
                match self.parser.finish() {
                    Ok(last) => self.pending.extend(last),
                    Err(e) => self.error = Some(e),
                }
            }
            Ok(n) => {
                trace!(bytes = n, "read chunk");
                let pending = &mut self.pending;
                if let Err(e) = self
                    .parser
                    .push_with(self.buffer.filled(n), |row| pending.push_back(row))
                {
                    self.finished = true;
                    self.error = Some(e);
                }
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                self.finished = true;
                self.error = Some(e.into());
            }
        }
    }
}

impl<R: Read> Iterator for RowIter<R> {
    type Item = Result<Row, CsvError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(row) = self.pending.pop_front() {
                return Some(Ok(row));
            }
            if let Some(e) = self.error.take() {
                return Some(Err(e));
            }
            if self.finished {
                return None;
            }
            self.fill();
        }
    }
}

impl CsvParser {
    /// Feeds everything `reader` yields, until end of input.
    ///
    /// The parser is not finalized; call [`CsvParser::finalize`] afterwards.
    ///
    /// # Errors
    ///
    /// I/O errors other than [`ErrorKind::Interrupted`] abort with
    /// [`CsvError::Io`]; parse errors are returned as they occur.
    pub fn feed_reader<R: Read>(&mut self, mut reader: R) -> Result<(), CsvError> {
        let mut buffer = ReadBuffer::take();
        loop {
            match reader.read(buffer.as_mut_slice()) {
                Ok(0) => return Ok(()),
                Ok(n) => {
                    trace!(bytes = n, "read chunk");
                    self.feed_chunk(buffer.filled(n))?;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Parses everything from a reader into one [`ParseResult`].
///
/// # Example
///
/// ```
/// use csvrows::{parse_reader, ParserConfig};
/// use std::io::Cursor;
///
/// let result = parse_reader(Cursor::new("a,b\n1,2\n"), ParserConfig::default())?;
/// assert_eq!(result.count, 1);
/// # Ok::<(), csvrows::CsvError>(())
/// ```
pub fn parse_reader<R: Read>(reader: R, config: ParserConfig) -> Result<ParseResult, CsvError> {
    let mut parser = CsvParser::new(config)?;
    parser.feed_reader(reader)?;
    parser.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;
    use std::io::{self, Cursor};

    /// Yields one byte per read and an `Interrupted` error before every byte.
    struct Trickle<'a> {
        data: &'a [u8],
        interrupt: bool,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::new(ErrorKind::Interrupted, "again"));
            }
            match self.data.split_first() {
                Some((&b, rest)) => {
                    buf[0] = b;
                    self.data = rest;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::BrokenPipe, "gone"))
        }
    }

    #[test]
    fn test_row_iter() {
        let rows: Vec<_> = RowIter::new(Cursor::new("a,b\n1,2\n3,4"), ParserConfig::default())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("b"), Some(&Value::Number(4.0)));
    }

    #[test]
    fn test_row_iter_headers_available() {
        let mut iter = RowIter::new(Cursor::new("h1,h2\nx,y\n"), ParserConfig::default()).unwrap();
        assert!(iter.headers().is_none());
        iter.next().unwrap().unwrap();
        assert_eq!(iter.headers().unwrap(), ["h1", "h2"]);
        assert!(iter.next().is_none());
        assert_eq!(iter.rows_emitted(), 1);
    }

    #[test]
    fn test_interrupted_reads_are_retried() {
        let data = "é,ü\r\n\"x\"\"y\",2\r\n";
        let reader = Trickle {
            data: data.as_bytes(),
            interrupt: false,
        };
        let result = {
            let mut parser = CsvParser::default();
            parser.feed_reader(reader).unwrap();
            parser.finalize().unwrap()
        };
        assert_eq!(result.headers, ["é", "ü"]);
        assert_eq!(result.rows[0].get("é"), Some(&Value::from("x\"y")));
    }

    #[test]
    fn test_rows_before_error_are_yielded_first() {
        let mut iter = RowIter::new(Cursor::new("a\n1\n2\n\"open"), ParserConfig::default()).unwrap();
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_ok());
        assert!(matches!(iter.next(), Some(Err(CsvError::UnclosedQuote))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_io_error_aborts() {
        let mut iter = RowIter::new(Failing, ParserConfig::default()).unwrap();
        assert!(matches!(iter.next(), Some(Err(CsvError::Io(_)))));
        assert!(iter.next().is_none());

        assert!(matches!(
            parse_reader(Failing, ParserConfig::default()),
            Err(CsvError::Io(_))
        ));
    }
}
