//! Drop-in replacements for axum extractors that reject with [`Error`].
//!
//! [`Error`]: crate::handler::Error

mod json;
mod path;
mod validated_json;

pub use self::json::Json;
pub use self::path::Path;
pub use self::validated_json::ValidateJson;
