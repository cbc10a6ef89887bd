//! Middleware for `axum::Router`.
//!
//! - Authentication and the admin gate.
//! - Recovery from panics, layer errors and timeouts.
//! - Request ids, request tracing and header redaction.
//! - CORS.

mod authentication;
mod authorization;
mod cors;
mod observability;
mod recovery;

pub use authentication::{RouterAuthExt, require_authentication};
pub use authorization::require_admin;
pub use cors::{CorsConfig, RouterCorsExt};
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};

/// Tracing target for the admin gate.
pub const TRACING_TARGET_AUTHORIZATION: &str = "kaapi_server::middleware::authorization";
