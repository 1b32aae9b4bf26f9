//! Command-line interface for the `csvrows` binary.
//!
//! Reads CSV from a file or stdin and writes the rows as a JSON array.

pub mod args;
mod commands;

pub use args::Args;
pub use commands::{convert, run};
