//! Domain entities and invariants for the audit engine.

#![forbid(unsafe_code)]

mod application;
mod event;
mod event_type;
mod security;

pub use application::{ApplicationId, AuditApplication};
pub use event::{AuditEvent, AuditEventBuilder, AuditEventId, EventData, EventDataKind, EventDataValue};
pub use event_type::{AuditEventType, EventTypeId};
pub use security::PermissionAction;
