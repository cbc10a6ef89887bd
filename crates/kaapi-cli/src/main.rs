#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use axum_client_ip::ClientIpSource;
use kaapi_postgres::{PgClient, PgClientMigrationExt, PgConfig};
use kaapi_server::handler::routes;
use kaapi_server::middleware::{RouterCorsExt, RouterObservabilityExt, RouterRecoveryExt};
use kaapi_server::service::{PgCredentialProvider, ServiceConfig, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "kaapi_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "kaapi_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "kaapi_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    cli.telemetry
        .init_tracing()
        .context("failed to initialize tracing")?;
    cli.validate()?;
    cli.log();

    let pg_client = connect_database(&cli.postgres).await?;
    let state = create_service_state(&cli, pg_client)?;
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;

    Ok(())
}

/// Builds the connection pool and applies pending migrations.
async fn connect_database(config: &PgConfig) -> anyhow::Result<PgClient> {
    let pg_client = config
        .clone()
        .build()
        .context("failed to create database client")?;

    let migrations = pg_client
        .run_pending_migrations()
        .await
        .context("failed to apply database migrations")?;

    if migrations.is_no_op() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "database schema is up to date"
        );
    } else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            applied = ?migrations.applied_versions,
            duration_ms = migrations.duration.as_millis(),
            "database migrations applied"
        );
    }

    Ok(pg_client)
}

/// Creates the service state on top of the PostgreSQL account store.
fn create_service_state(cli: &Cli, pg_client: PgClient) -> anyhow::Result<ServiceState> {
    let config = ServiceConfig::from_args(&cli.session_keys, &cli.seed_admin)
        .context("invalid service configuration")?;

    ServiceState::new(&config, PgCredentialProvider::new(pg_client))
        .context("failed to create service state")
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. CORS
/// 4. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes(state.clone())
        .with_state(state)
        .layer(ClientIpSource::ConnectInfo.into_extension())
        .with_cors(&middleware.cors)
        .with_observability()
        .with_recovery(&middleware.recovery)
}
