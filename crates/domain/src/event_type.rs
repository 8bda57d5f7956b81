use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veritrail_core::{AuditResult, NonEmptyString};

use crate::ApplicationId;

/// Stable identifier of an event type within an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventTypeId(Uuid);

impl EventTypeId {
    /// Creates a random event type identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event type identifier from an existing UUID value.
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

impl Default for EventTypeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for EventTypeId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A registered event type, unique per `(application, name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEventType {
    event_type_id: EventTypeId,
    application_id: ApplicationId,
    event_type_name: NonEmptyString,
}

impl AuditEventType {
    /// Creates an event type record from persisted values.
    pub fn new(
        event_type_id: EventTypeId,
        application_id: ApplicationId,
        event_type_name: impl Into<String>,
    ) -> AuditResult<Self> {
        Ok(Self {
            event_type_id,
            application_id,
            event_type_name: NonEmptyString::new(event_type_name)?,
        })
    }

    /// Returns the event type identifier.
    #[must_use]
    pub fn event_type_id(&self) -> EventTypeId {
        self.event_type_id
    }

    /// Returns the owning application identifier.
    #[must_use]
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the event type name.
    #[must_use]
    pub fn event_type_name(&self) -> &NonEmptyString {
        &self.event_type_name
    }
}
