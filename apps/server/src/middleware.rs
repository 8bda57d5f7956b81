use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use veritrail_core::{ActorContext, AuditError, ResourceId};

use crate::error::ApiResult;

/// Header carrying the actor resource id for permission-gated routes.
pub const ACTOR_HEADER: &str = "x-actor-resource-id";

/// Resolves the caller's actor context from the request headers.
///
/// Identity propagation stays at the HTTP edge; everything below it receives
/// an explicit [`ActorContext`].
pub async fn require_actor(mut request: Request, next: Next) -> ApiResult<Response> {
    let header = request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AuditError::InvalidArgument("X-Actor-Resource-Id header is required".to_owned())
        })?;

    let resource_id = uuid::Uuid::parse_str(header).map_err(|error| {
        AuditError::InvalidArgument(format!("invalid X-Actor-Resource-Id header: {error}"))
    })?;

    request
        .extensions_mut()
        .insert(ActorContext::run_as(ResourceId::from_uuid(resource_id)));
    Ok(next.run(request).await)
}
