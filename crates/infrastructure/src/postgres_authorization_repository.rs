use async_trait::async_trait;
use sqlx::PgPool;

use veritrail_application::AuthorizationRepository;
use veritrail_core::{AuditError, AuditResult, ResourceId};
use veritrail_domain::PermissionAction;

/// PostgreSQL-backed permission store keyed on `(actor, action, target)`.
///
/// This backend models no resource hierarchy, so an actor's authorization
/// scope is its own resource id.
#[derive(Clone)]
pub struct PostgresAuthorizationRepository {
    pool: PgPool,
}

impl PostgresAuthorizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorizationRepository for PostgresAuthorizationRepository {
    async fn grant(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_permissions (actor_resource_id, action, target_resource_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (actor_resource_id, action, target_resource_id) DO NOTHING
            "#,
        )
        .bind(actor_resource_id.as_uuid())
        .bind(action.as_str())
        .bind(target_resource_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to grant '{}' to actor '{actor_resource_id}': {error}",
                action.as_str()
            ))
        })?;

        Ok(())
    }

    async fn revoke(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<()> {
        sqlx::query(
            r#"
            DELETE FROM audit_permissions
            WHERE actor_resource_id = $1 AND action = $2 AND target_resource_id = $3
            "#,
        )
        .bind(actor_resource_id.as_uuid())
        .bind(action.as_str())
        .bind(target_resource_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to revoke '{}' from actor '{actor_resource_id}': {error}",
                action.as_str()
            ))
        })?;

        Ok(())
    }

    async fn has_permission(
        &self,
        actor_resource_id: ResourceId,
        action: PermissionAction,
        target_resource_id: ResourceId,
    ) -> AuditResult<bool> {
        let granted: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM audit_permissions
                WHERE actor_resource_id = $1 AND action = $2 AND target_resource_id = $3
            )
            "#,
        )
        .bind(actor_resource_id.as_uuid())
        .bind(action.as_str())
        .bind(target_resource_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to check '{}' for actor '{actor_resource_id}': {error}",
                action.as_str()
            ))
        })?;

        Ok(granted)
    }

    async fn authorization_scope(
        &self,
        actor_resource_id: ResourceId,
    ) -> AuditResult<Vec<ResourceId>> {
        Ok(vec![actor_resource_id])
    }
}
