//! Chunk sources that drive a parser.
//!
//! - [`RowIter`] / [`parse_reader`] - Blocking [`std::io::Read`] sources
//! - [`parse_str`] / [`parse_bytes`] - Input already in memory

mod memory;
mod reader;

pub use memory::{parse_bytes, parse_str};
pub use reader::{RowIter, parse_reader};
