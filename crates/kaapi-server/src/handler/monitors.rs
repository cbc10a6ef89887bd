//! Liveness endpoint.

use axum::Router;
use axum::extract::State;
use axum::routing::get;
use jiff::Timestamp;

use crate::extract::Json;
use crate::handler::response::{DatabaseHealth, HealthResponse};
use crate::service::{CredentialStore, ServiceState, Uptime};

const TRACING_TARGET: &str = "kaapi_server::handler::monitors";

/// Reports process uptime and whether the database answers.
///
/// Always `200 OK`; a failing database probe is reported in the body.
#[tracing::instrument(skip_all)]
async fn health(
    State(credentials): State<CredentialStore>,
    State(uptime): State<Uptime>,
) -> Json<HealthResponse> {
    let connected = credentials.is_available().await;

    tracing::debug!(
        target: TRACING_TARGET,
        database_connected = connected,
        "Health check"
    );

    Json(HealthResponse {
        status: "ok".to_owned(),
        timestamp: Timestamp::now(),
        uptime: uptime.elapsed().as_secs_f64(),
        database: DatabaseHealth { connected },
    })
}

pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health))
}
