//! Bearer token authentication extractors.
//!
//! - [`AuthHeader`] verifies the token signature and expiry only.
//! - [`AuthState`] additionally resolves the account and rejects deleted or
//!   deactivated ones. Use it in every handler behind authentication.

mod auth_header;
mod auth_state;

pub use auth_header::AuthHeader;
pub use auth_state::AuthState;

/// Tracing target for authentication decisions.
pub const TRACING_TARGET_AUTHENTICATION: &str = "kaapi_server::extract::authentication";
