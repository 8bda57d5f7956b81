//! Veritrail server composition root.

#![forbid(unsafe_code)]

mod config;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn;
use axum::routing::{get, post};
use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing::info;
use veritrail_application::{
    ApplicationCache, ApplicationDirectory, ApplicationRegistry, AuditAuthorizationService,
    EmbeddedAuditService, EventTypeCache, EventTypeRegistry, LoggingService,
};
use veritrail_core::{ActorContext, AuditError};
use veritrail_infrastructure::{
    InMemoryKeyValueCache, PostgresAuditStore, PostgresAuthorizationRepository,
};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AuditError> {
    dotenvy::dotenv().ok();
    config::init_tracing();

    let config = ServerConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AuditError::Store(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AuditError::Store(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let store = Arc::new(PostgresAuditStore::new(pool.clone()));
    let authorization_repository = Arc::new(PostgresAuthorizationRepository::new(pool));
    let application_cache: ApplicationCache = Arc::new(InMemoryKeyValueCache::new());
    let event_type_cache: EventTypeCache = Arc::new(InMemoryKeyValueCache::new());

    let directory = Arc::new(ApplicationDirectory::new(store.clone(), application_cache));
    let authorization = Arc::new(AuditAuthorizationService::new(
        authorization_repository,
        directory.clone(),
        config.application_type_target_resource_id,
    ));
    let applications = Arc::new(ApplicationRegistry::new(
        store.clone(),
        directory.clone(),
        authorization.clone(),
    ));
    let event_types = Arc::new(EventTypeRegistry::new(
        store.clone(),
        directory.clone(),
        authorization.clone(),
        event_type_cache,
    ));
    let logging = Arc::new(LoggingService::new(
        store,
        directory,
        authorization.clone(),
        event_types.clone(),
    ));

    let embedded = match &config.embedded {
        Some(embedded_config) => {
            let service_actor = ActorContext::run_as(embedded_config.service_actor_resource_id);
            authorization
                .add_permission_to_init_audit_application(
                    embedded_config.service_actor_resource_id,
                )
                .await?;

            let service = EmbeddedAuditService::initialize(
                applications.clone(),
                event_types.clone(),
                logging.clone(),
                embedded_config.application_name.clone(),
                service_actor,
            )
            .await?;

            authorization
                .add_permission_to_log_to_audit_application(
                    embedded_config.service_actor_resource_id,
                    embedded_config.application_name.as_str(),
                )
                .await?;

            info!(
                application = %embedded_config.application_name,
                "embedded audit application ready"
            );
            Some(service)
        }
        None => None,
    };

    let app_state = AppState {
        applications,
        event_types,
        logging,
        authorization,
        embedded,
    };

    let actor_routes = Router::new()
        .route(
            "/api/applications",
            post(handlers::applications::register_application_handler),
        )
        .route(
            "/api/applications/{application_name}/event-types",
            post(handlers::applications::init_event_types_handler),
        )
        .route(
            "/api/applications/{application_name}/events",
            post(handlers::applications::log_event_handler),
        )
        .route_layer(from_fn(middleware::require_actor));

    let admin_routes = Router::new()
        .route(
            "/api/permissions/init-application",
            post(handlers::permissions::grant_init_permission_handler)
                .delete(handlers::permissions::revoke_init_permission_handler),
        )
        .route(
            "/api/permissions/log-to-application",
            post(handlers::permissions::grant_log_permission_handler)
                .delete(handlers::permissions::revoke_log_permission_handler),
        );

    let embedded_routes = Router::new()
        .route(
            "/api/event-types",
            post(handlers::embedded::init_event_types_handler),
        )
        .route("/api/events", post(handlers::embedded::log_event_handler));

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(actor_routes)
        .merge(admin_routes)
        .merge(embedded_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AuditError::Store(format!("failed to bind listener: {error}")))?;

    info!(%address, "veritrail-server listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AuditError::Store(format!("server error: {error}")))
}
