//! The GSLASE page script: load announcer and theme-select observer.
//!
//! Browsers run the same behavior from `static/js/script.js`.

use std::sync::Arc;

use super::document::Document;
use super::host::{PageHost, ReadyContext};
use super::sink::DiagnosticSink;

pub const LOAD_MESSAGE: &str = "GSLASE messenger loaded";

#[must_use]
pub fn theme_changed_line(value: &str) -> String {
    format!("Theme changed to: {value}")
}

/// Attach the page script to `host`. Nothing runs until document-ready.
pub fn install(host: &mut PageHost) {
    host.on_ready(on_document_ready);
}

/// Parse `html`, attach the script, and deliver document-ready.
#[must_use]
pub fn load(html: &str, sink: Arc<dyn DiagnosticSink>) -> PageHost {
    let mut host = PageHost::new(Document::parse(html), sink);
    install(&mut host);
    host.fire_ready();
    host
}

fn on_document_ready(ctx: &mut ReadyContext<'_>) {
    ctx.log(LOAD_MESSAGE);

    // No selection control on this page: nothing to observe.
    let Some(theme_select) = ctx.query_first_select() else {
        return;
    };
    ctx.add_change_listener(theme_select, |event, sink| {
        sink.write_line(&theme_changed_line(event.value()));
    });
}

#[cfg(test)]
#[path = "script_test.rs"]
mod tests;
