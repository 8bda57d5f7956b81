use std::sync::Arc;

use veritrail_core::{ActorContext, AuditError, AuditResult, ResourceId};
use veritrail_domain::{AuditApplication, PermissionAction};

use crate::{ApplicationDirectory, AuthorizationRepository, validate};

/// Grant management and permission checks for the audit engine.
///
/// "Init application" permissions target one configured application-type
/// resource shared by the whole deployment; "log to application" permissions
/// target the resource backing the individual application.
#[derive(Clone)]
pub struct AuditAuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
    directory: Arc<ApplicationDirectory>,
    application_type_target_resource_id: ResourceId,
}

impl AuditAuthorizationService {
    /// Creates the service from a permission backend and the shared
    /// application-type target resource.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationRepository>,
        directory: Arc<ApplicationDirectory>,
        application_type_target_resource_id: ResourceId,
    ) -> Self {
        Self {
            repository,
            directory,
            application_type_target_resource_id,
        }
    }

    /// Returns the resource id that "init application" checks target.
    #[must_use]
    pub fn audit_application_type_target_resource_id(&self) -> ResourceId {
        self.application_type_target_resource_id
    }

    /// Grants the actor the right to register new audit applications.
    pub async fn add_permission_to_init_audit_application(
        &self,
        actor_resource_id: ResourceId,
    ) -> AuditResult<()> {
        self.repository
            .grant(
                actor_resource_id,
                PermissionAction::InitAuditApplication,
                self.application_type_target_resource_id,
            )
            .await
    }

    /// Revokes the actor's right to register new audit applications.
    pub async fn remove_permission_to_init_audit_application(
        &self,
        actor_resource_id: ResourceId,
    ) -> AuditResult<()> {
        self.repository
            .revoke(
                actor_resource_id,
                PermissionAction::InitAuditApplication,
                self.application_type_target_resource_id,
            )
            .await
    }

    /// Grants the actor the right to log to one application. Fails with
    /// [`AuditError::UnknownApplication`] when the application was never
    /// initialized; this call never creates it.
    pub async fn add_permission_to_log_to_audit_application(
        &self,
        actor_resource_id: ResourceId,
        application_name: &str,
    ) -> AuditResult<()> {
        let application_name = validate::require_not_blank(application_name, "application name")?;
        let application = self.directory.expect(application_name).await?;

        self.repository
            .grant(
                actor_resource_id,
                PermissionAction::LogToAuditApplication,
                application.resource_id(),
            )
            .await
    }

    /// Revokes the actor's right to log to one application.
    pub async fn remove_permission_to_log_to_audit_application(
        &self,
        actor_resource_id: ResourceId,
        application_name: &str,
    ) -> AuditResult<()> {
        let application_name = validate::require_not_blank(application_name, "application name")?;
        let application = self.directory.expect(application_name).await?;

        self.repository
            .revoke(
                actor_resource_id,
                PermissionAction::LogToAuditApplication,
                application.resource_id(),
            )
            .await
    }

    /// Returns whether the actor may register new audit applications.
    pub async fn has_permission_to_init_audit_application(
        &self,
        actor: &ActorContext,
    ) -> AuditResult<bool> {
        self.repository
            .has_permission(
                actor.resource_id(),
                PermissionAction::InitAuditApplication,
                self.application_type_target_resource_id,
            )
            .await
    }

    /// Returns whether the actor may log to the named application. Fails
    /// with [`AuditError::UnknownApplication`] when the name does not
    /// resolve.
    pub async fn has_permission_to_log_to_audit_application(
        &self,
        actor: &ActorContext,
        application_name: &str,
    ) -> AuditResult<bool> {
        let application_name = validate::require_not_blank(application_name, "application name")?;
        let application = self.directory.expect(application_name).await?;

        self.repository
            .has_permission(
                actor.resource_id(),
                PermissionAction::LogToAuditApplication,
                application.resource_id(),
            )
            .await
    }

    /// Ensures the actor may register applications, or reports the denied
    /// action and the evaluated scope.
    pub async fn check_init_audit_application(&self, actor: &ActorContext) -> AuditResult<()> {
        let allowed = self
            .repository
            .has_permission(
                actor.resource_id(),
                PermissionAction::InitAuditApplication,
                self.application_type_target_resource_id,
            )
            .await?;

        if allowed {
            return Ok(());
        }

        Err(self
            .unauthorized(actor, PermissionAction::InitAuditApplication)
            .await?)
    }

    /// Ensures the actor may log to the resolved application, or reports the
    /// denied action and the evaluated scope.
    pub async fn check_log_to_audit_application(
        &self,
        actor: &ActorContext,
        application: &AuditApplication,
    ) -> AuditResult<()> {
        let allowed = self
            .repository
            .has_permission(
                actor.resource_id(),
                PermissionAction::LogToAuditApplication,
                application.resource_id(),
            )
            .await?;

        if allowed {
            return Ok(());
        }

        Err(self
            .unauthorized(actor, PermissionAction::LogToAuditApplication)
            .await?)
    }

    async fn unauthorized(
        &self,
        actor: &ActorContext,
        action: PermissionAction,
    ) -> AuditResult<AuditError> {
        let scope = self
            .repository
            .authorization_scope(actor.resource_id())
            .await?;

        Ok(AuditError::Unauthorized {
            action: action.as_str().to_owned(),
            scope,
        })
    }
}
