//! Infrastructure adapters for the audit engine's application ports.

#![forbid(unsafe_code)]

mod in_memory_audit_store;
mod in_memory_authorization_repository;
mod in_memory_key_value_cache;
mod postgres_audit_store;
mod postgres_authorization_repository;

pub use in_memory_audit_store::{InMemoryAuditStore, StoredEvent};
pub use in_memory_authorization_repository::InMemoryAuthorizationRepository;
pub use in_memory_key_value_cache::InMemoryKeyValueCache;
pub use postgres_audit_store::PostgresAuditStore;
pub use postgres_authorization_repository::PostgresAuthorizationRepository;
