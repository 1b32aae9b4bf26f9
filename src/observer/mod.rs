//! Diagnostic hooks.
//!
//! A parser never logs on its own. Callers that want to see what happens
//! attach a [`ParseObserver`]; [`TracingObserver`] forwards everything to
//! `tracing`.

use std::time::Duration;

use tracing::debug;

/// Figures reported once a parse finishes successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseSummary {
    /// Data rows produced (the header row is not counted).
    pub rows: u64,
    /// Raw bytes pushed into the parser.
    pub bytes: u64,
    /// Time between parser construction and finish.
    pub elapsed: Duration,
}

/// Observes a parse without influencing it.
///
/// Both methods have empty default implementations.
pub trait ParseObserver: Send {
    /// Called once, right after the header row is recognised.
    fn on_headers(&mut self, headers: &[String]) {
        let _ = headers;
    }

    /// Called once, when the parse finishes without error.
    fn on_finish(&mut self, summary: &ParseSummary) {
        let _ = summary;
    }
}

/// Logs headers and the final summary at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ParseObserver for TracingObserver {
    fn on_headers(&mut self, headers: &[String]) {
        debug!(columns = headers.len(), ?headers, "header row");
    }

    fn on_finish(&mut self, summary: &ParseSummary) {
        debug!(
            rows = summary.rows,
            bytes = summary.bytes,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "parse finished"
        );
    }
}
