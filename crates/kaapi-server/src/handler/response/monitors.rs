//! Health check response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness report. Always served with `200 OK`.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: Timestamp,
    /// Seconds since the service state was created.
    pub uptime: f64,
    pub database: DatabaseHealth,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseHealth {
    pub connected: bool,
}
