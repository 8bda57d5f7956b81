use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use veritrail_core::ResourceId;

use crate::dto::{InitPermissionRequest, LogPermissionRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn grant_init_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<InitPermissionRequest>,
) -> ApiResult<StatusCode> {
    state
        .authorization
        .add_permission_to_init_audit_application(ResourceId::from_uuid(payload.actor_resource_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_init_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<InitPermissionRequest>,
) -> ApiResult<StatusCode> {
    state
        .authorization
        .remove_permission_to_init_audit_application(ResourceId::from_uuid(
            payload.actor_resource_id,
        ))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn grant_log_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<LogPermissionRequest>,
) -> ApiResult<StatusCode> {
    state
        .authorization
        .add_permission_to_log_to_audit_application(
            ResourceId::from_uuid(payload.actor_resource_id),
            payload.application_name.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_log_permission_handler(
    State(state): State<AppState>,
    Json(payload): Json<LogPermissionRequest>,
) -> ApiResult<StatusCode> {
    state
        .authorization
        .remove_permission_to_log_to_audit_application(
            ResourceId::from_uuid(payload.actor_resource_id),
            payload.application_name.as_str(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
