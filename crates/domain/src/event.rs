use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use veritrail_core::{AuditError, AuditResult, NonEmptyString};

/// Stable identifier of a persisted audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEventId(Uuid);

impl AuditEventId {
    /// Creates a random event identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an event identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AuditEventId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AuditEventId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Storage tag for one event data variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDataKind {
    /// Short string value.
    String,
    /// Long text value.
    Text,
    /// Numeric value.
    Number,
    /// Point-in-time value.
    Timestamp,
}

impl EventDataKind {
    /// Returns a stable storage value for this kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "STRING",
            Self::Text => "TEXT",
            Self::Number => "NUMBER",
            Self::Timestamp => "TIMESTAMP",
        }
    }
}

impl FromStr for EventDataKind {
    type Err = AuditError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "STRING" => Ok(Self::String),
            "TEXT" => Ok(Self::Text),
            "NUMBER" => Ok(Self::Number),
            "TIMESTAMP" => Ok(Self::Timestamp),
            _ => Err(AuditError::InvalidArgument(format!(
                "unknown event data kind '{value}'"
            ))),
        }
    }
}

/// The value of one event datum. Exactly one variant per instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventDataValue {
    /// Short string value.
    String(String),
    /// Long text value.
    Text(String),
    /// Numeric value.
    Number(f64),
    /// Point-in-time value.
    Timestamp(DateTime<Utc>),
}

impl EventDataValue {
    /// Returns the storage tag of this value.
    #[must_use]
    pub fn kind(&self) -> EventDataKind {
        match self {
            Self::String(_) => EventDataKind::String,
            Self::Text(_) => EventDataKind::Text,
            Self::Number(_) => EventDataKind::Number,
            Self::Timestamp(_) => EventDataKind::Timestamp,
        }
    }
}

/// One named, typed datum attached to an event.
///
/// Two values are equal iff name, kind and value are all equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    name: NonEmptyString,
    value: EventDataValue,
}

impl EventData {
    /// Creates a datum carrying a short string value.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> AuditResult<Self> {
        Self::new(name, EventDataValue::String(value.into()))
    }

    /// Creates a datum carrying a long text value.
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> AuditResult<Self> {
        Self::new(name, EventDataValue::Text(value.into()))
    }

    /// Creates a datum carrying a numeric value.
    pub fn number(name: impl Into<String>, value: f64) -> AuditResult<Self> {
        Self::new(name, EventDataValue::Number(value))
    }

    /// Creates a datum carrying a point-in-time value.
    pub fn timestamp(name: impl Into<String>, value: DateTime<Utc>) -> AuditResult<Self> {
        Self::new(name, EventDataValue::Timestamp(value))
    }

    /// Creates a datum from a name and an already-typed value.
    pub fn new(name: impl Into<String>, value: EventDataValue) -> AuditResult<Self> {
        Ok(Self {
            name: NonEmptyString::new(name)?,
            value,
        })
    }

    /// Returns the datum name.
    #[must_use]
    pub fn name(&self) -> &NonEmptyString {
        &self.name
    }

    /// Returns the storage tag of the carried value.
    #[must_use]
    pub fn kind(&self) -> EventDataKind {
        self.value.kind()
    }

    /// Returns the carried value.
    #[must_use]
    pub fn value(&self) -> &EventDataValue {
        &self.value
    }
}

/// A typed event payload submitted to the logging engine.
///
/// Carries the event type name it should be recorded under and an ordered
/// sequence of data items. Immutable once built; the persisted timestamp is
/// assigned by the store at insert time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    event_type_name: NonEmptyString,
    data: Vec<EventData>,
}

impl AuditEvent {
    /// Starts building an event for the given event type name.
    #[must_use]
    pub fn builder(event_type_name: impl Into<String>) -> AuditEventBuilder {
        AuditEventBuilder {
            event_type_name: event_type_name.into(),
            data: Vec::new(),
        }
    }

    /// Creates an event from an event type name and ordered data items.
    pub fn new(event_type_name: impl Into<String>, data: Vec<EventData>) -> AuditResult<Self> {
        Ok(Self {
            event_type_name: NonEmptyString::new(event_type_name)?,
            data,
        })
    }

    /// Returns the event type name the event is recorded under.
    #[must_use]
    pub fn event_type_name(&self) -> &NonEmptyString {
        &self.event_type_name
    }

    /// Returns the ordered data items.
    #[must_use]
    pub fn data(&self) -> &[EventData] {
        &self.data
    }
}

/// Order-preserving builder for [`AuditEvent`].
#[derive(Debug, Clone)]
pub struct AuditEventBuilder {
    event_type_name: String,
    data: Vec<(String, EventDataValue)>,
}

impl AuditEventBuilder {
    /// Appends a short string datum.
    #[must_use]
    pub fn add_string(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .push((name.into(), EventDataValue::String(value.into())));
        self
    }

    /// Appends a long text datum.
    #[must_use]
    pub fn add_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data
            .push((name.into(), EventDataValue::Text(value.into())));
        self
    }

    /// Appends a numeric datum.
    #[must_use]
    pub fn add_number(mut self, name: impl Into<String>, value: f64) -> Self {
        self.data.push((name.into(), EventDataValue::Number(value)));
        self
    }

    /// Appends a point-in-time datum.
    #[must_use]
    pub fn add_timestamp(mut self, name: impl Into<String>, value: DateTime<Utc>) -> Self {
        self.data
            .push((name.into(), EventDataValue::Timestamp(value)));
        self
    }

    /// Validates every name and builds the event.
    pub fn build(self) -> AuditResult<AuditEvent> {
        let data = self
            .data
            .into_iter()
            .map(|(name, value)| EventData::new(name, value))
            .collect::<AuditResult<Vec<_>>>()?;

        AuditEvent::new(self.event_type_name, data)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;
    use proptest::prelude::*;

    use super::{AuditEvent, EventData, EventDataKind, EventDataValue};

    #[test]
    fn builder_preserves_insertion_order_and_kinds() {
        let now = Utc::now();
        let event = AuditEvent::builder("user-login")
            .add_string("string", "string-value")
            .add_text("text", "text-value")
            .add_number("number", 10.75)
            .add_timestamp("timestamp", now)
            .build();

        assert!(event.is_ok());
        let event = event.unwrap_or_else(|_| unreachable!());
        let kinds: Vec<_> = event.data().iter().map(EventData::kind).collect();
        assert_eq!(
            kinds,
            [
                EventDataKind::String,
                EventDataKind::Text,
                EventDataKind::Number,
                EventDataKind::Timestamp,
            ]
        );
        assert_eq!(event.data()[2].value(), &EventDataValue::Number(10.75));
    }

    #[test]
    fn builder_rejects_blank_data_name() {
        let event = AuditEvent::builder("user-login")
            .add_string("  ", "string-value")
            .build();
        assert!(event.is_err());
    }

    #[test]
    fn blank_event_type_name_is_rejected() {
        let event = AuditEvent::builder(" ").build();
        assert!(event.is_err());
    }

    #[test]
    fn equality_requires_same_kind() {
        let as_string = EventData::string("payload", "10");
        let as_text = EventData::text("payload", "10");
        assert_ne!(
            as_string.unwrap_or_else(|_| unreachable!()),
            as_text.unwrap_or_else(|_| unreachable!())
        );
    }

    proptest! {
        #[test]
        fn kind_storage_value_round_trips(kind in prop_oneof![
            Just(EventDataKind::String),
            Just(EventDataKind::Text),
            Just(EventDataKind::Number),
            Just(EventDataKind::Timestamp),
        ]) {
            let restored = EventDataKind::from_str(kind.as_str());
            prop_assert_eq!(restored.ok(), Some(kind));
        }
    }
}
