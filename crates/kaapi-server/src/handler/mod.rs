//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! | Route                                   | Access |
//! |-----------------------------------------|--------|
//! | `POST /api/auth/register`               | public |
//! | `POST /api/auth/login`                  | public |
//! | `GET /api/auth/verifyToken`             | authenticated |
//! | `GET /api/auth/users`                   | admin |
//! | `DELETE /api/auth/users/{id}`           | admin |
//! | `POST /api/auth/update-admin`           | admin |
//! | `GET /api/admin/users`                  | admin |
//! | `GET /api/admin/stats`                  | admin |
//! | `PUT /api/admin/users/{id}/admin-status`| admin |
//! | `PUT /api/admin/users/{id}/toggle-status`| admin |
//! | `GET /api/admin/activity-log`           | admin |
//! | `PUT /api/admin/settings`               | admin |
//! | `GET /health`                           | public |
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod admin;
mod authentication;
mod error;
mod monitors;
pub mod request;
pub mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and the `404` fallback.
///
/// Guarded routes get their authentication layers here; cross-cutting
/// layers (CORS, tracing, recovery) are left to the caller.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(authentication::routes(state.clone()))
        .merge(admin::routes(state))
        .merge(monitors::routes())
        .fallback(fallback)
}
