//! Simulated page host for the GSLASE page script.
//!
//! DESIGN
//! ======
//! Browsers own the real event loop, so this module models just enough of
//! one to drive the page script deterministically: a parsed `Document` of
//! selection controls, a `PageHost` that dispatches document-ready and
//! change events, and a `DiagnosticSink` standing in for the console.
//!
//! Dispatch is synchronous. Each listener runs to completion before the
//! next event is delivered, mirroring a browser's single-threaded loop.

pub mod document;
pub mod host;
pub mod script;
pub mod sink;

pub use document::{ControlId, Document, SelectControl, SelectOption};
pub use host::{ChangeEvent, PageHost, ReadyContext};
pub use sink::{DiagnosticSink, MemorySink, TracingSink};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PageError {
    #[error("no selection control at index {0}")]
    NoSuchControl(usize),
    #[error("selection control has no option with value {0:?}")]
    UnknownOption(String),
}
