use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use tracing_subscriber::EnvFilter;
use veritrail_core::{AuditError, ResourceId};

/// Embedded audit application settings, present only when configured.
#[derive(Debug, Clone)]
pub struct EmbeddedConfig {
    pub application_name: String,
    pub service_actor_resource_id: ResourceId,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub application_type_target_resource_id: ResourceId,
    pub embedded: Option<EmbeddedConfig>,
}

impl ServerConfig {
    pub fn load() -> Result<Self, AuditError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let server_port = env::var("SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);

        let application_type_target_resource_id = resource_id_env(
            required_env("AUDIT_APPLICATION_TYPE_TARGET_RESOURCE_ID")?.as_str(),
            "AUDIT_APPLICATION_TYPE_TARGET_RESOURCE_ID",
        )?;

        let embedded_application_name = env::var("EMBEDDED_AUDIT_APPLICATION_NAME")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let embedded = embedded_application_name
            .map(|application_name| {
                let service_actor = env::var("SERVICE_ACTOR_RESOURCE_ID").map_err(|_| {
                    AuditError::InvalidArgument(
                        "SERVICE_ACTOR_RESOURCE_ID is required when EMBEDDED_AUDIT_APPLICATION_NAME is set"
                            .to_owned(),
                    )
                })?;
                Ok::<_, AuditError>(EmbeddedConfig {
                    application_name,
                    service_actor_resource_id: resource_id_env(
                        service_actor.as_str(),
                        "SERVICE_ACTOR_RESOURCE_ID",
                    )?,
                })
            })
            .transpose()?;

        Ok(Self {
            migrate_only,
            database_url,
            server_host,
            server_port,
            application_type_target_resource_id,
            embedded,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AuditError> {
        let host = IpAddr::from_str(&self.server_host).map_err(|error| {
            AuditError::InvalidArgument(format!(
                "invalid SERVER_HOST '{}': {error}",
                self.server_host
            ))
        })?;
        Ok(SocketAddr::from((host, self.server_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AuditError> {
    env::var(name).map_err(|_| AuditError::InvalidArgument(format!("{name} is required")))
}

fn resource_id_env(value: &str, name: &str) -> Result<ResourceId, AuditError> {
    uuid::Uuid::parse_str(value)
        .map(ResourceId::from_uuid)
        .map_err(|error| AuditError::InvalidArgument(format!("invalid {name}: {error}")))
}
