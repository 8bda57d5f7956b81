//! Shared primitives for all Rust crates in Veritrail.

#![forbid(unsafe_code)]

/// Actor propagation primitives shared across services.
pub mod actor;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub use actor::ActorContext;

/// Result type used across Veritrail crates.
pub type AuditResult<T> = Result<T, AuditError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AuditResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AuditError::InvalidArgument(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Opaque authorization resource identifier.
///
/// Applications and the application-type target carry one; permission checks
/// are evaluated against these values. Allocation of fresh resource ids is
/// the authorization backend's concern, not this engine's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Creates a random resource identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a resource identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ResourceId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ResourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Error categories surfaced by every engine operation.
///
/// All four kinds propagate synchronously to the caller; none are swallowed
/// or retried inside the engine. An idempotent "already exists" outcome is a
/// successful return, not an error.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Absent or blank required input, detected before any store or
    /// permission interaction.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A read-only application resolution named an application that does not
    /// exist. Distinct from [`AuditError::InvalidArgument`] so callers can
    /// prompt explicit application creation.
    #[error("unknown audit application '{application_name}'")]
    UnknownApplication {
        /// The application name that failed to resolve.
        application_name: String,
    },

    /// Permission denied, carrying the exact action attempted and the
    /// authorization scope the actor was evaluated against.
    #[error("action '{action}' denied for authorization scope {scope:?}")]
    Unauthorized {
        /// Stable storage value of the denied action.
        action: String,
        /// Resource ids the actor was evaluated against.
        scope: Vec<ResourceId>,
    },

    /// The persistent unit of work failed. Surfaced unmodified and never
    /// treated as a partial success.
    #[error("audit store failure: {0}")]
    Store(String),
}

#[cfg(test)]
mod tests {
    use super::{AuditError, NonEmptyString, ResourceId};

    #[test]
    fn non_empty_string_rejects_whitespace() {
        let result = NonEmptyString::new("   ");
        assert!(matches!(result, Err(AuditError::InvalidArgument(_))));
    }

    #[test]
    fn non_empty_string_keeps_value() {
        let value = NonEmptyString::new("orders");
        assert_eq!(value.map(|v| v.as_str().to_owned()).ok().as_deref(), Some("orders"));
    }

    #[test]
    fn resource_id_formats_as_uuid() {
        let resource_id = ResourceId::new();
        assert_eq!(resource_id.to_string().len(), 36);
    }
}
