//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request parsing, auth plumbing, and
//! response shaping.

pub mod account;
pub mod admin;
pub mod bootstrap;
pub mod chat;
pub mod invitation;
pub mod message;
pub mod password;
pub mod session;
pub mod sweeper;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Render a timestamp as RFC 3339, the format API clients receive.
#[must_use]
pub fn iso8601(ts: OffsetDateTime) -> String {
    ts.format(&Rfc3339).unwrap_or_default()
}
