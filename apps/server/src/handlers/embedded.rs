use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use veritrail_application::EmbeddedAuditService;
use veritrail_core::AuditError;

use crate::dto::{InitEventTypesRequest, LogEventRequest, LoggedEventResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

fn embedded_service(state: &AppState) -> Result<&EmbeddedAuditService, ApiError> {
    state.embedded.as_ref().ok_or_else(|| {
        ApiError(AuditError::InvalidArgument(
            "no embedded audit application is configured".to_owned(),
        ))
    })
}

pub async fn init_event_types_handler(
    State(state): State<AppState>,
    Json(payload): Json<InitEventTypesRequest>,
) -> ApiResult<StatusCode> {
    embedded_service(&state)?
        .init_audit_event_types(&payload.event_type_names)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn log_event_handler(
    State(state): State<AppState>,
    Json(payload): Json<LogEventRequest>,
) -> ApiResult<(StatusCode, Json<LoggedEventResponse>)> {
    let event = payload.into_event()?;
    let event_id = embedded_service(&state)?.log_event(&event).await?;

    Ok((
        StatusCode::CREATED,
        Json(LoggedEventResponse {
            event_id: event_id.as_uuid(),
        }),
    ))
}
