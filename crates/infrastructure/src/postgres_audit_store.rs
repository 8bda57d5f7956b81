use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use veritrail_application::AuditStore;
use veritrail_core::{AuditError, AuditResult, ResourceId};
use veritrail_domain::{
    ApplicationId, AuditApplication, AuditEventId, AuditEventType, EventData, EventDataValue,
    EventTypeId,
};

/// PostgreSQL-backed audit store.
///
/// Registration calls rely on `ON CONFLICT DO NOTHING` plus a re-select, so
/// concurrent callers racing on the same name all observe the single winning
/// row. Event inserts write the event row and its data rows in one
/// transaction.
#[derive(Clone)]
pub struct PostgresAuditStore {
    pool: PgPool,
}

impl PostgresAuditStore {
    /// Creates a store with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ApplicationRow {
    application_id: Uuid,
    application_name: String,
    resource_id: Uuid,
}

impl ApplicationRow {
    fn into_application(self) -> AuditResult<AuditApplication> {
        AuditApplication::new(
            ApplicationId::from_uuid(self.application_id),
            self.application_name,
            ResourceId::from_uuid(self.resource_id),
        )
    }
}

#[derive(Debug, FromRow)]
struct EventTypeRow {
    event_type_id: Uuid,
    event_type_name: String,
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn find_application(
        &self,
        application_name: &str,
    ) -> AuditResult<Option<AuditApplication>> {
        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT application_id, application_name, resource_id
            FROM audit_applications
            WHERE application_name = $1
            "#,
        )
        .bind(application_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to look up audit application '{application_name}': {error}"
            ))
        })?;

        row.map(ApplicationRow::into_application).transpose()
    }

    async fn get_or_create_application(
        &self,
        application_name: &str,
    ) -> AuditResult<AuditApplication> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AuditError::Store(format!(
                "failed to start registration transaction for audit application '{application_name}': {error}"
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO audit_applications (application_id, application_name, resource_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (application_name) DO NOTHING
            "#,
        )
        .bind(ApplicationId::new().as_uuid())
        .bind(application_name)
        .bind(ResourceId::new().as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to register audit application '{application_name}': {error}"
            ))
        })?;

        let row = sqlx::query_as::<_, ApplicationRow>(
            r#"
            SELECT application_id, application_name, resource_id
            FROM audit_applications
            WHERE application_name = $1
            "#,
        )
        .bind(application_name)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to load audit application '{application_name}' after registration: {error}"
            ))
        })?;

        transaction.commit().await.map_err(|error| {
            AuditError::Store(format!(
                "failed to commit registration of audit application '{application_name}': {error}"
            ))
        })?;

        row.into_application()
    }

    async fn get_or_create_event_types(
        &self,
        application_id: ApplicationId,
        event_type_names: &[String],
    ) -> AuditResult<Vec<AuditEventType>> {
        if event_type_names.is_empty() {
            return Ok(Vec::new());
        }

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AuditError::Store(format!(
                "failed to start event type registration transaction for application '{application_id}': {error}"
            ))
        })?;

        let candidate_ids: Vec<Uuid> = event_type_names
            .iter()
            .map(|_| EventTypeId::new().as_uuid())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO audit_event_types (event_type_id, application_id, event_type_name)
            SELECT candidate.event_type_id, $1, candidate.event_type_name
            FROM UNNEST($2::UUID[], $3::TEXT[])
                AS candidate (event_type_id, event_type_name)
            ON CONFLICT (application_id, event_type_name) DO NOTHING
            "#,
        )
        .bind(application_id.as_uuid())
        .bind(&candidate_ids)
        .bind(event_type_names)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to register event types for application '{application_id}': {error}"
            ))
        })?;

        let rows = sqlx::query_as::<_, EventTypeRow>(
            r#"
            SELECT event_type_id, event_type_name
            FROM audit_event_types
            WHERE application_id = $1 AND event_type_name = ANY($2)
            "#,
        )
        .bind(application_id.as_uuid())
        .bind(event_type_names)
        .fetch_all(&mut *transaction)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to load event types for application '{application_id}' after registration: {error}"
            ))
        })?;

        transaction.commit().await.map_err(|error| {
            AuditError::Store(format!(
                "failed to commit event type registration for application '{application_id}': {error}"
            ))
        })?;

        tracing::debug!(
            application_id = %application_id,
            requested = event_type_names.len(),
            "ensured audit event types"
        );

        let mut by_name: HashMap<String, AuditEventType> = HashMap::with_capacity(rows.len());
        for row in rows {
            let event_type = AuditEventType::new(
                EventTypeId::from_uuid(row.event_type_id),
                application_id,
                row.event_type_name.clone(),
            )?;
            by_name.insert(row.event_type_name, event_type);
        }

        event_type_names
            .iter()
            .map(|event_type_name| {
                by_name.get(event_type_name).cloned().ok_or_else(|| {
                    AuditError::Store(format!(
                        "event type '{event_type_name}' missing after registration for application '{application_id}'"
                    ))
                })
            })
            .collect()
    }

    async fn insert_event(
        &self,
        event_type_id: EventTypeId,
        data: &[EventData],
    ) -> AuditResult<AuditEventId> {
        let event_id = AuditEventId::new();

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AuditError::Store(format!(
                "failed to start insert transaction for audit event '{event_id}': {error}"
            ))
        })?;

        sqlx::query(
            r#"
            INSERT INTO audit_events (event_id, event_type_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(event_id.as_uuid())
        .bind(event_type_id.as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AuditError::Store(format!(
                "failed to insert audit event '{event_id}': {error}"
            ))
        })?;

        for datum in data {
            let (string_value, text_value, number_value, timestamp_value): (
                Option<&str>,
                Option<&str>,
                Option<f64>,
                Option<DateTime<Utc>>,
            ) = match datum.value() {
                EventDataValue::String(value) => (Some(value.as_str()), None, None, None),
                EventDataValue::Text(value) => (None, Some(value.as_str()), None, None),
                EventDataValue::Number(value) => (None, None, Some(*value), None),
                EventDataValue::Timestamp(value) => (None, None, None, Some(*value)),
            };

            sqlx::query(
                r#"
                INSERT INTO audit_event_data (
                    event_id,
                    data_name,
                    data_kind,
                    string_value,
                    text_value,
                    number_value,
                    timestamp_value
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(event_id.as_uuid())
            .bind(datum.name().as_str())
            .bind(datum.kind().as_str())
            .bind(string_value)
            .bind(text_value)
            .bind(number_value)
            .bind(timestamp_value)
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AuditError::Store(format!(
                    "failed to insert data '{}' for audit event '{event_id}': {error}",
                    datum.name()
                ))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AuditError::Store(format!(
                "failed to commit audit event '{event_id}': {error}"
            ))
        })?;

        Ok(event_id)
    }
}
