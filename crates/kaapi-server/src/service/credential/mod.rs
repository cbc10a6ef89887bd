//! Credential store: account persistence behind a pluggable provider.
//!
//! [`CredentialStore`] is the facade handlers talk to. It owns password
//! hashing and the seed admin rule, and delegates storage to a
//! [`CredentialProvider`]:
//!
//! - [`PgCredentialProvider`] persists accounts in PostgreSQL.
//! - [`MemoryCredentialProvider`] keeps them in process, for tests and
//!   local runs without a database.

mod error;
mod memory;
mod postgres;
mod provider;
mod store;

pub use error::{CredentialError, CredentialResult};
pub use memory::MemoryCredentialProvider;
pub use postgres::PgCredentialProvider;
pub use provider::CredentialProvider;
pub use store::{Authentication, CredentialStore, SeedAdminConfig};

/// Tracing target for credential store operations.
pub const TRACING_TARGET: &str = "kaapi_server::service::credential";
