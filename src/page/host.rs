//! Event host: document-ready and change dispatch.
//!
//! DESIGN
//! ======
//! Ready listeners run against a `ReadyContext` that can query the document
//! and queue change-listener registrations. Registrations are applied after
//! every ready listener has run, so a listener never observes a half-built
//! listener table.
//!
//! Change listeners are appended, never de-duplicated. A script that
//! registers a fresh closure on every document-ready ends up with one
//! listener per run, as it would in a browser.

use std::sync::Arc;

use super::document::{ControlId, Document, SelectControl};
use super::sink::DiagnosticSink;
use super::PageError;

type ReadyListener = Box<dyn FnMut(&mut ReadyContext<'_>) + Send>;
type ChangeListener = Box<dyn FnMut(&ChangeEvent<'_>, &dyn DiagnosticSink) + Send>;

struct Registration {
    control: ControlId,
    listener: ChangeListener,
}

// =============================================================================
// EVENT CONTEXTS
// =============================================================================

/// Handed to ready listeners while document-ready is being dispatched.
pub struct ReadyContext<'a> {
    document: &'a Document,
    sink: &'a dyn DiagnosticSink,
    registrations: &'a mut Vec<Registration>,
}

impl ReadyContext<'_> {
    #[must_use]
    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn log(&self, line: &str) {
        self.sink.write_line(line);
    }

    #[must_use]
    pub fn query_first_select(&self) -> Option<ControlId> {
        self.document.first_select()
    }

    /// Subscribe to value changes on `control`.
    pub fn add_change_listener<F>(&mut self, control: ControlId, listener: F)
    where
        F: FnMut(&ChangeEvent<'_>, &dyn DiagnosticSink) + Send + 'static,
    {
        self.registrations
            .push(Registration { control, listener: Box::new(listener) });
    }
}

/// A value change on one selection control. Reads go to the live control,
/// so `value()` is always the selection at dispatch time.
pub struct ChangeEvent<'a> {
    target: ControlId,
    control: &'a SelectControl,
}

impl ChangeEvent<'_> {
    #[must_use]
    pub fn target(&self) -> ControlId {
        self.target
    }

    #[must_use]
    pub fn value(&self) -> &str {
        self.control.value()
    }
}

// =============================================================================
// PAGE HOST
// =============================================================================

pub struct PageHost {
    document: Document,
    sink: Arc<dyn DiagnosticSink>,
    ready_listeners: Vec<ReadyListener>,
    change_listeners: Vec<Registration>,
}

impl PageHost {
    #[must_use]
    pub fn new(document: Document, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { document, sink, ready_listeners: Vec::new(), change_listeners: Vec::new() }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn on_ready<F>(&mut self, listener: F)
    where
        F: FnMut(&mut ReadyContext<'_>) + Send + 'static,
    {
        self.ready_listeners.push(Box::new(listener));
    }

    /// Dispatch document-ready to every ready listener, in registration order.
    pub fn fire_ready(&mut self) {
        let mut pending = Vec::new();
        for listener in &mut self.ready_listeners {
            let mut ctx = ReadyContext {
                document: &self.document,
                sink: self.sink.as_ref(),
                registrations: &mut pending,
            };
            listener(&mut ctx);
        }

        self.change_listeners.extend(pending);
    }

    /// Change a control's selection the way a user would, then dispatch a
    /// change event if the selection actually moved. Returns whether it fired.
    ///
    /// # Errors
    ///
    /// Returns `PageError` if the control or option does not exist.
    pub fn select(&mut self, control: ControlId, value: &str) -> Result<bool, PageError> {
        let Self { document, sink, change_listeners, .. } = self;

        let changed = document
            .control_mut(control)
            .ok_or(PageError::NoSuchControl(control.index()))?
            .select_value(value)?;
        if !changed {
            return Ok(false);
        }

        let target = document
            .control(control)
            .ok_or(PageError::NoSuchControl(control.index()))?;
        for registration in change_listeners.iter_mut().filter(|r| r.control == control) {
            let event = ChangeEvent { target: control, control: target };
            (registration.listener)(&event, &**sink);
        }
        Ok(true)
    }

    /// Number of change listeners attached to `control`.
    #[must_use]
    pub fn listener_count(&self, control: ControlId) -> usize {
        self.change_listeners
            .iter()
            .filter(|r| r.control == control)
            .count()
    }
}

#[cfg(test)]
#[path = "host_test.rs"]
mod tests;
