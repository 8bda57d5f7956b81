//! Application services and ports for the audit engine.

#![forbid(unsafe_code)]

mod application_directory;
mod application_registry;
mod audit_ports;
mod authorization_service;
mod embedded_service;
mod event_type_registry;
mod logging_service;
mod validate;

#[cfg(test)]
pub(crate) mod test_support;

pub use application_directory::ApplicationDirectory;
pub use application_registry::ApplicationRegistry;
pub use audit_ports::{
    ApplicationCache, AuditStore, AuthorizationRepository, EventTypeCache, EventTypeCacheKey,
    KeyValueCache,
};
pub use authorization_service::AuditAuthorizationService;
pub use embedded_service::EmbeddedAuditService;
pub use event_type_registry::EventTypeRegistry;
pub use logging_service::LoggingService;
