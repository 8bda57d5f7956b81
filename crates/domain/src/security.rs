use std::str::FromStr;

use serde::{Deserialize, Serialize};

use veritrail_core::AuditError;

/// Permissions enforced before any audit mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionAction {
    /// Allows registering new audit applications.
    InitAuditApplication,
    /// Allows creating event types under an application and logging events
    /// to it.
    LogToAuditApplication,
}

impl PermissionAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InitAuditApplication => "audit.application.init",
            Self::LogToAuditApplication => "audit.application.log",
        }
    }

    /// Returns all known actions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionAction] = &[
            PermissionAction::InitAuditApplication,
            PermissionAction::LogToAuditApplication,
        ];

        ALL
    }
}

impl FromStr for PermissionAction {
    type Err = AuditError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "audit.application.init" => Ok(Self::InitAuditApplication),
            "audit.application.log" => Ok(Self::LogToAuditApplication),
            _ => Err(AuditError::InvalidArgument(format!(
                "unknown permission action '{value}'"
            ))),
        }
    }
}
