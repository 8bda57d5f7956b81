use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veritrail_core::{AuditResult, NonEmptyString, ResourceId};

/// Stable identifier of a registered audit application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(Uuid);

impl ApplicationId {
    /// Creates a random application identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an application identifier from an existing UUID value.
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

impl Default for ApplicationId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ApplicationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A registered audit application.
///
/// Created once per distinct name and immutable afterwards. The backing
/// resource id doubles as the authorization target for "log to application"
/// permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditApplication {
    application_id: ApplicationId,
    application_name: NonEmptyString,
    resource_id: ResourceId,
}

impl AuditApplication {
    /// Creates an application record from persisted values.
    pub fn new(
        application_id: ApplicationId,
        application_name: impl Into<String>,
        resource_id: ResourceId,
    ) -> AuditResult<Self> {
        Ok(Self {
            application_id,
            application_name: NonEmptyString::new(application_name)?,
            resource_id,
        })
    }

    /// Returns the application identifier.
    #[must_use]
    pub fn application_id(&self) -> ApplicationId {
        self.application_id
    }

    /// Returns the unique application name.
    #[must_use]
    pub fn application_name(&self) -> &NonEmptyString {
        &self.application_name
    }

    /// Returns the authorization resource backing this application.
    #[must_use]
    pub fn resource_id(&self) -> ResourceId {
        self.resource_id
    }
}
