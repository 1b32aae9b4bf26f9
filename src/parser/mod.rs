//! Parsing engine for processing byte streams.
//!
//! - [`RowParser`] - Stateful engine with `push()`/`finish()` API
//! - [`CsvParser`] - Collecting wrapper with `feed_chunk()`/`finalize()` API

mod collect;
mod engine;

pub use collect::{CsvParser, ParseResult};
pub use engine::RowParser;
