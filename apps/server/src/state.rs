use std::sync::Arc;

use veritrail_application::{
    ApplicationRegistry, AuditAuthorizationService, EmbeddedAuditService, EventTypeRegistry,
    LoggingService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub applications: Arc<ApplicationRegistry>,
    pub event_types: Arc<EventTypeRegistry>,
    pub logging: Arc<LoggingService>,
    pub authorization: Arc<AuditAuthorizationService>,
    pub embedded: Option<EmbeddedAuditService>,
}
