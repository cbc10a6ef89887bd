//! Request types for HTTP handlers.

mod admin;
mod authentications;
mod paths;
mod validations;

pub use admin::*;
pub use authentications::*;
pub use paths::*;
