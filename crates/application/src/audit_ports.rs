//! Ports consumed by the audit services.

mod authorization;
mod cache;
mod store;

pub use authorization::AuthorizationRepository;
pub use cache::{ApplicationCache, EventTypeCache, EventTypeCacheKey, KeyValueCache};
pub use store::AuditStore;
