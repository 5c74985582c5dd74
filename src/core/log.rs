//! Human-readable trace sink.
//!
//! The scheduler may hand the ledger a sink to collect lines such as
//! "Ward expired" for a combat log. Lines are diagnostics only; nothing in
//! the core reads them back.

/// Append-only receiver of trace lines.
pub trait LogSink {
    /// Record one line.
    fn push(&mut self, line: String);
}

impl LogSink for Vec<String> {
    fn push(&mut self, line: String) {
        Vec::push(self, line);
    }
}

/// Sink that drops every line.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl LogSink for NullSink {
    fn push(&mut self, _line: String) {}
}
