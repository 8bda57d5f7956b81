use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;

use veritrail_core::ActorContext;

use crate::dto::{
    ApplicationResponse, InitEventTypesRequest, LogEventRequest, LoggedEventResponse,
    RegisterApplicationRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn register_application_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Json(payload): Json<RegisterApplicationRequest>,
) -> ApiResult<Json<ApplicationResponse>> {
    let application = state
        .applications
        .init_audit_application(&actor, payload.application_name.as_str())
        .await?;

    Ok(Json(ApplicationResponse::from(application)))
}

pub async fn init_event_types_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(application_name): Path<String>,
    Json(payload): Json<InitEventTypesRequest>,
) -> ApiResult<StatusCode> {
    state
        .event_types
        .init_audit_event_types(&actor, application_name.as_str(), &payload.event_type_names)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn log_event_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorContext>,
    Path(application_name): Path<String>,
    Json(payload): Json<LogEventRequest>,
) -> ApiResult<(StatusCode, Json<LoggedEventResponse>)> {
    let event = payload.into_event()?;
    let event_id = state
        .logging
        .log_event(&actor, application_name.as_str(), &event)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LoggedEventResponse {
            event_id: event_id.as_uuid(),
        }),
    ))
}
