//! Application state and dependency injection.

mod config;
pub mod credential;
mod security;
mod state;

pub use crate::service::config::{ServiceConfig, ServiceConfigBuilder};
pub use crate::service::credential::{
    Authentication, CredentialError, CredentialProvider, CredentialStore,
    MemoryCredentialProvider, PgCredentialProvider, SeedAdminConfig,
};
pub use crate::service::security::{
    DEFAULT_EXPIRY_DAYS, HASH_COST, MIN_SECRET_LEN, PasswordHasher, SessionKeys,
    SessionKeysConfig, TokenClaims, TokenError,
};
#[cfg(test)]
pub(crate) use crate::service::security::TEST_HASH_COST;
pub use crate::service::state::{ServiceState, Uptime};
pub use crate::{Error, Result};
