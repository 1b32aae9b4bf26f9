//! Async stream adapter for parsing.
//!
//! This module provides asynchronous parsing using the `futures-io::AsyncRead`
//! trait, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! # Example
//!
//! ```ignore
//! use futures_util::StreamExt;
//! use csvrows::{parse_async, ParserConfig};
//! use futures_io::AsyncRead;
//!
//! async fn demo<R: AsyncRead + Unpin>(reader: R) -> Result<(), csvrows::CsvError> {
//!     let mut rows = parse_async(reader, ParserConfig::default())?;
//!
//!     while let Some(row) = rows.next().await {
//!         let row = row?;
//!         println!("{:?}", row);
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::VecDeque;
use std::io::ErrorKind;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_io::AsyncRead;
use pin_project_lite::pin_project;
use tracing::trace;

use crate::buffer::ReadBuffer;
use crate::config::ParserConfig;
use crate::error::CsvError;
use crate::observer::ParseObserver;
use crate::parser::{CsvParser, ParseResult, RowParser};
use crate::row::Row;

pin_project! {
    /// A stream that yields rows from an async reader.
    ///
    /// This uses `futures_io::AsyncRead` which is runtime-agnostic.
    /// Works with tokio, async-std, smol, or any futures-compatible runtime.
    ///
    /// Exactly one read is in flight at a time and the parser is only touched
    /// from `poll_next`, so no locking is involved. Dropping the stream
    /// cancels the parse.
    pub struct RowStream<R> {
        #[pin]
        reader: R,
        parser: RowParser,
        buffer: ReadBuffer,
        pending: VecDeque<Row>,
        error: Option<CsvError>,
        finished: bool,
    }
}

impl<R> RowStream<R> {
    /// Creates a row stream driving an already configured parser.
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
}

impl<R: AsyncRead> Stream for RowStream<R> {
    type Item = Result<Row, CsvError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(row) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(row)));
            }
            if let Some(e) = this.error.take() {
                return Poll::Ready(Some(Err(e)));
            }
            if *this.finished {
                return Poll::Ready(None);
            }

            // Read more data using AsyncRead into buffer
            match this.reader.as_mut().poll_read(cx, this.buffer.as_mut_slice()) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(Err(e)) if e.kind() == ErrorKind::Interrupted => {}
                Poll::Ready(Err(e)) => {
                    *this.finished = true;
                    *this.error = Some(CsvError::Io(e));
                }
                Poll::Ready(Ok(0)) => {
                    trace!(bytes = this.parser.bytes_consumed(), "end of input");
                    *this.finished = true;
                    match this.parser.finish() {
                        Ok(last) => this.pending.extend(last),
                        Err(e) => *this.error = Some(e),
                    }
                }
                Poll::Ready(Ok(n)) => {
                    trace!(bytes = n, "read chunk");
                    let pending = &mut *this.pending;
                    if let Err(e) = this
                        .parser
                        .push_with(this.buffer.filled(n), |row| pending.push_back(row))
                    {
                        *this.finished = true;
                        *this.error = Some(e);
                    }
                }
            }
        }
    }
}

/// Creates a row stream from an async reader.
///
/// Uses `futures_io::AsyncRead` for runtime-agnostic async I/O.
///
/// # Runtime Compatibility
///
/// For tokio users, you can use `tokio_util::compat` to convert
/// `tokio::io::AsyncRead` to `futures_io::AsyncRead`:
///
/// ```ignore
/// use tokio_util::compat::TokioAsyncReadCompatExt;
/// use csvrows::{parse_async, ParserConfig};
///
/// let file = tokio::fs::File::open("data.csv").await?;
/// let rows = parse_async(file.compat(), ParserConfig::default())?;
/// ```
///
/// # Errors
///
/// Returns [`CsvError::InvalidConfig`] if the configuration is invalid.
pub fn parse_async<R: AsyncRead>(
    reader: R,
    config: ParserConfig,
) -> Result<RowStream<R>, CsvError> {
    Ok(RowStream::from_parser(reader, RowParser::new(config)?))
}

/// Parses everything from an async reader into one [`ParseResult`].
pub async fn collect_async<R: AsyncRead + Unpin>(
    mut reader: R,
    config: ParserConfig,
) -> Result<ParseResult, CsvError> {
    let mut parser = CsvParser::new(config)?;
    let mut buffer = ReadBuffer::take();

    loop {
        let read =
            std::future::poll_fn(|cx| Pin::new(&mut reader).poll_read(cx, buffer.as_mut_slice()));
        match read.await {
            Ok(0) => break,
            Ok(n) => parser.feed_chunk(buffer.filled(n))?,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    parser.finalize()
}
