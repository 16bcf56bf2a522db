//! Zone templates and the concrete zones they expand into.

pub mod domain;
pub mod placeholder;
pub mod record;
pub mod template;

pub use domain::Domain;
pub use record::{Record, RecordData, RecordKind, Soa, SoaTimers};
pub use template::{RecordTemplate, ZoneTemplate};

/// Opaque owner reference (a row id in `users`).
pub type UserId = i64;
