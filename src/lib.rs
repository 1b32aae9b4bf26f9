//! csvrows
//!
//! Incremental CSV-to-rows parsing for Rust.
//!
//! `csvrows` turns a CSV byte stream, delivered in chunks of any size, into
//! rows keyed by the header row, with numeric fields classified as numbers.
//! It is meant for inputs that arrive piecemeal:
//!
//! - uploaded request bodies
//! - files too large to decode up front
//! - pasted text
//!
//! The crate intentionally:
//! - does NOT infer column types beyond number vs. string
//! - does NOT skip or trim anything the input contains
//! - does NOT buffer the whole document (unless asked to collect)
//!
//! Chunk boundaries never change the result: a multi-byte character, a
//! `\r\n` pair, or a doubled quote may be split across pushes.
//!
//! # Push chunks, then finalize
//!
//! ```
//! use csvrows::{CsvParser, ParserConfig, Value};
//!
//! let mut parser = CsvParser::new(ParserConfig::default())?;
//! parser.feed_chunk("name,age\nAda,3")?;
//! parser.feed_chunk("6\n")?;
//!
//! let result = parser.finalize()?;
//! assert_eq!(result.headers, ["name", "age"]);
//! assert_eq!(result.rows[0].get("age"), Some(&Value::Number(36.0)));
//! # Ok::<(), csvrows::CsvError>(())
//! ```
//!
//! # Sync
//!
//! ```no_run
//! use std::fs::File;
//! use csvrows::{CsvError, ParserConfig, RowIter};
//!
//! fn main() -> Result<(), CsvError> {
//!     let file = File::open("data.csv")?;
//!
//!     for row in RowIter::new(file, ParserConfig::default())? {
//!         let row = row?;
//!         println!("{} fields", row.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Async (feature = "async-io")
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
//!         println!("{} fields", row.len());
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod observer;
mod parser;
mod row;
mod source;
mod value;

mod buffer; // internal (thread-local reuse)
mod decode; // internal streaming UTF-8
mod tokenizer; // internal quote state machine

#[cfg(feature = "async-io")]
mod async_stream;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "cli")]
pub mod cli;

//
// Public surface
//

pub use config::{DEFAULT_DELIMITER, DEFAULT_QUOTE, DuplicateHeaders, ParserConfig};
pub use error::CsvError;
pub use observer::{ParseObserver, ParseSummary, TracingObserver};
pub use parser::{CsvParser, ParseResult, RowParser};
pub use row::Row;
pub use source::{RowIter, parse_bytes, parse_reader, parse_str};
pub use value::{Value, is_numeric};

#[cfg(feature = "async-io")]
pub use async_stream::{RowStream, collect_async, parse_async};
