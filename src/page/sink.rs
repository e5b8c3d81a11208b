//! Diagnostic sinks: where the page script writes its lines.

use std::sync::Mutex;

/// Append-only, developer-facing line output.
pub trait DiagnosticSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Forwards lines to `tracing` at INFO under the `gslase::page` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "gslase::page", "{line}");
    }
}

/// Collects lines in memory so callers can inspect what was written.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line written so far, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(line.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_starts_empty() {
        assert!(MemorySink::new().lines().is_empty());
    }

    #[test]
    fn memory_sink_keeps_write_order() {
        let sink = MemorySink::new();
        sink.write_line("first");
        sink.write_line("second");
        assert_eq!(sink.lines(), vec!["first".to_owned(), "second".to_owned()]);
    }

    #[test]
    fn tracing_sink_is_callable_without_subscriber() {
        TracingSink.write_line("no subscriber installed");
    }
}
