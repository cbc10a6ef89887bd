//! Request extractors with error rejections in the API's JSON format.
//!
//! - [`AuthHeader`] and [`AuthState`] authenticate the bearer token.
//! - [`Json`], [`ValidateJson`] and [`Path`] replace their axum counterparts
//!   and reject with [`Error`] instead of plain text.
//! - [`ClientAddress`] resolves the caller's IP address when available.
//!
//! [`Error`]: crate::handler::Error

pub mod auth;
mod client_address;
pub mod reject;

pub use crate::extract::auth::{AuthHeader, AuthState, TRACING_TARGET_AUTHENTICATION};
pub use crate::extract::client_address::ClientAddress;
pub use crate::extract::reject::{Json, Path, ValidateJson};
