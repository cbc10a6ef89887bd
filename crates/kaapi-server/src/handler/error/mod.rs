//! [`Error`], [`ErrorKind`] and [`Result`].

mod credential_error;
mod http_error;
mod service_error;
mod validation_error;

pub use http_error::{Error, ErrorKind, Result};
