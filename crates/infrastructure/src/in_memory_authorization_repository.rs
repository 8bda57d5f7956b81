use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use veritrail_application::AuthorizationRepository;
use veritrail_core::{AuditResult, ResourceId};
use veritrail_domain::PermissionAction;

/// In-memory permission store keyed on `(actor, action, target)`.
///
/// Like the PostgreSQL backend it models no resource hierarchy, so an
/// actor's authorization scope is its own resource id.
#[derive(Default)]
pub struct InMemoryAuthorizationRepository {
    grants: RwLock<HashSet<(ResourceId, PermissionAction, ResourceId)>>,
}

impl InMemoryAuthorizationRepository {
    /// Creates an empty permission store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryAuthorizationRepository {
    async fn grant(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()> {
        self.grants
            .write()
            .await
            .insert((actor_resource_id, action, target_resource_id));
        Ok(())
    }

    async fn revoke(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()> {
        self.grants
            .write()
            .await
            .remove(&(actor_resource_id, action, target_resource_id));
        Ok(())
    }

    async fn has_permission(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<bool> {
        Ok(self
            .grants
            .read()
            .await
            .contains(&(actor_resource_id, action, target_resource_id)))
    }

    async fn authorization_scope(
        &self,
        actor_resource_id: ResourceId,
    ) -> AuditResult<Vec<ResourceId>> {
        Ok(vec![actor_resource_id])
    }
}
