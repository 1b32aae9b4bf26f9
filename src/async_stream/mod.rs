//! Async streaming support for parsing.
//!
//! This module provides asynchronous parsing using the `futures-io::AsyncRead`
//! trait, making it runtime-agnostic and compatible with tokio, async-std,
//! smol, and other async runtimes.
//!
//! - [`parse_async`] - Creates an async stream of rows from an async reader
//! - [`collect_async`] - Reads everything into one result
//!
//! This module requires the `async-io` feature to be enabled.

mod stream;

pub use stream::{RowStream, collect_async, parse_async};
