use serde::{Deserialize, Serialize};

use crate::ResourceId;

/// The identity a call runs as.
///
/// Threaded explicitly through every permission-gated operation instead of
/// living in ambient thread-local state, so "run as" is just constructing a
/// new context value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    resource_id: ResourceId,
}

impl ActorContext {
    /// Creates a context running as the given actor resource.
    #[must_use]
    pub fn run_as(resource_id: ResourceId) -> Self {
        Self { resource_id }
    }

    /// Returns the actor's own resource id.
    #[must_use]
    pub fn resource_id(&self) -> ResourceId {
        self.resource_id
    }
}
