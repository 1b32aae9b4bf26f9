//! Buffer management for reading sources.

mod pool;

pub use pool::ReadBuffer;
