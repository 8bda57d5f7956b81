use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use veritrail_core::AuditResult;
use veritrail_domain::{AuditApplication, AuditEvent, AuditEventType, EventData, EventDataValue};

#[derive(Debug, Deserialize)]
pub struct RegisterApplicationRequest {
    pub application_name: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationResponse {
    pub application_id: Uuid,
    pub application_name: String,
    pub resource_id: Uuid,
}

impl From<AuditApplication> for ApplicationResponse {
    fn from(application: AuditApplication) -> Self {
        Self {
            application_id: application.application_id().as_uuid(),
            application_name: application.application_name().as_str().to_owned(),
            resource_id: application.resource_id().as_uuid(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InitEventTypesRequest {
    pub event_type_names: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct EventTypeResponse {
    pub event_type_id: Uuid,
    pub application_id: Uuid,
    pub event_type_name: String,
}

impl From<AuditEventType> for EventTypeResponse {
    fn from(event_type: AuditEventType) -> Self {
        Self {
            event_type_id: event_type.event_type_id().as_uuid(),
            application_id: event_type.application_id().as_uuid(),
            event_type_name: event_type.event_type_name().as_str().to_owned(),
        }
    }
}

/// One event datum on the wire, e.g. `{"name": "total", "kind": "number",
/// "value": 10.75}`.
#[derive(Debug, Deserialize)]
pub struct EventDatumPayload {
    pub name: String,
    #[serde(flatten)]
    pub value: EventDatumValuePayload,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EventDatumValuePayload {
    String(String),
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
}

impl From<EventDatumValuePayload> for EventDataValue {
    fn from(value: EventDatumValuePayload) -> Self {
        match value {
            EventDatumValuePayload::String(value) => Self::String(value),
            EventDatumValuePayload::Text(value) => Self::Text(value),
            EventDatumValuePayload::Number(value) => Self::Number(value),
            EventDatumValuePayload::Timestamp(value) => Self::Timestamp(value),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LogEventRequest {
    pub event_type_name: String,
    #[serde(default)]
    pub data: Vec<EventDatumPayload>,
}

impl LogEventRequest {
    /// Validates names and builds the domain event, preserving data order.
    pub fn into_event(self) -> AuditResult<AuditEvent> {
        let data = self
            .data
            .into_iter()
            .map(|datum| EventData::new(datum.name, datum.value.into()))
            .collect::<AuditResult<Vec<_>>>()?;

        AuditEvent::new(self.event_type_name, data)
    }
}

#[derive(Debug, Serialize)]
pub struct LoggedEventResponse {
    pub event_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct InitPermissionRequest {
    pub actor_resource_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct LogPermissionRequest {
    pub actor_resource_id: Uuid,
    pub application_name: String,
}
