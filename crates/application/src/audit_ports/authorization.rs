use async_trait::async_trait;
use veritrail_core::{AuditResult, ResourceId};
use veritrail_domain::PermissionAction;

/// Port for the external permission backend.
///
/// The engine consults it before every mutation; it never re-checks after.
/// Grant inheritance, if any, is the backend's concern; the engine only
/// sees the resolved outcome and the evaluated scope.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Grants an action on a target resource to an actor. Idempotent.
    async fn grant(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()>;

    /// Revokes a previously granted action. Revoking an absent grant is a
    /// no-op.
    async fn revoke(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()>;

    /// Returns whether the actor holds the action on the target resource.
    async fn has_permission(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<bool>;

    /// Returns the set of resource ids the actor is evaluated against.
    /// Reported back verbatim inside permission-denied errors.
    async fn authorization_scope(
        &self,
        actor_resource_id: ResourceId,
    ) -> AuditResult<Vec<ResourceId>>;
}
