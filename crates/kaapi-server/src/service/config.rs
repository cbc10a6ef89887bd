use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::service::credential::SeedAdminConfig;
use crate::service::security::{
    HASH_COST, MIN_SECRET_LEN, PasswordHasher, SessionKeys, SessionKeysConfig,
};
use crate::{Error, Result};

/// Default values for configuration options.
mod defaults {
    pub const JWT_EXPIRY_DAYS: u32 = crate::service::security::DEFAULT_EXPIRY_DAYS;
    pub const PASSWORD_HASH_COST: u32 = crate::service::security::HASH_COST;
}

/// Lowest and highest accepted bcrypt costs.
const PASSWORD_HASH_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize, Builder)]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate", error = "Error")
)]
pub struct ServiceConfig {
    /// Secret used to sign bearer tokens.
    pub jwt_secret: String,

    /// Lifetime of issued tokens in days.
    #[builder(default = "defaults::JWT_EXPIRY_DAYS")]
    pub jwt_expiry_days: u32,

    /// Email promoted to super administrator on registration and login.
    #[builder(default)]
    pub seed_admin_email: Option<String>,

    /// bcrypt work factor for new password hashes.
    #[builder(default = "defaults::PASSWORD_HASH_COST")]
    pub password_hash_cost: u32,
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Builds a configuration from the command line argument groups.
    pub fn from_args(session_keys: &SessionKeysConfig, seed_admin: &SeedAdminConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .with_jwt_secret(session_keys.jwt_secret.clone())
            .with_jwt_expiry_days(session_keys.expiry_days);

        if let Some(email) = seed_admin.seed_admin_email.clone() {
            builder = builder.with_seed_admin_email(email);
        }

        builder.build()
    }

    pub fn session_keys_config(&self) -> SessionKeysConfig {
        SessionKeysConfig {
            jwt_secret: self.jwt_secret.clone(),
            expiry_days: self.jwt_expiry_days,
        }
    }

    pub fn seed_admin_config(&self) -> SeedAdminConfig {
        SeedAdminConfig {
            seed_admin_email: self.seed_admin_email.clone(),
        }
    }

    /// Builds and checks the token signing keys.
    pub fn load_session_keys(&self) -> Result<SessionKeys> {
        SessionKeys::from_config(&self.session_keys_config())
    }

    pub fn create_password_hasher(&self) -> Result<PasswordHasher> {
        PasswordHasher::with_cost(self.password_hash_cost)
    }
}

impl std::fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("jwt_secret", &"***")
            .field("jwt_expiry_days", &self.jwt_expiry_days)
            .field("seed_admin_email", &self.seed_admin_email.is_some())
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

impl ServiceConfigBuilder {
    fn validate(builder: &ServiceConfigBuilder) -> Result<()> {
        if let Some(secret) = &builder.jwt_secret
            && secret.len() < MIN_SECRET_LEN
        {
            return Err(Error::config(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        if builder.jwt_expiry_days == Some(0) {
            return Err(Error::config("JWT expiry must be at least one day"));
        }

        if let Some(cost) = builder.password_hash_cost
            && !PASSWORD_HASH_COST_RANGE.contains(&cost)
        {
            return Err(Error::config(format!(
                "Password hash cost must be between {} and {}, default is {HASH_COST}",
                PASSWORD_HASH_COST_RANGE.start(),
                PASSWORD_HASH_COST_RANGE.end()
            )));
        }

        Ok(())
    }
}

impl From<derive_builder::UninitializedFieldError> for Error {
    fn from(error: derive_builder::UninitializedFieldError) -> Self {
        Error::config(format!("missing service setting: {}", error.field_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    const SECRET: &str = "kaapikart-test-secret-with-enough-bytes";

    #[test]
    fn builder_defaults() -> anyhow::Result<()> {
        let config = ServiceConfig::builder().with_jwt_secret(SECRET).build()?;

        assert_eq!(config.jwt_expiry_days, 30);
        assert_eq!(config.password_hash_cost, 10);
        assert!(config.seed_admin_email.is_none());
        assert!(!format!("{config:?}").contains(SECRET));
        Ok(())
    }

    #[test]
    fn missing_secret_is_rejected() {
        let error = ServiceConfig::builder().build().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert!(error.message().contains("jwt_secret"));
    }

    #[test]
    fn validation() {
        assert!(ServiceConfig::builder().with_jwt_secret("short").build().is_err());
        assert!(
            ServiceConfig::builder()
                .with_jwt_secret(SECRET)
                .with_jwt_expiry_days(0u32)
                .build()
                .is_err()
        );
        assert!(
            ServiceConfig::builder()
                .with_jwt_secret(SECRET)
                .with_password_hash_cost(3u32)
                .build()
                .is_err()
        );
    }

    #[test]
    fn from_args_carries_seed_admin() -> anyhow::Result<()> {
        let config = ServiceConfig::from_args(
            &SessionKeysConfig::new(SECRET),
            &SeedAdminConfig::new("owner@kaapikart.test"),
        )?;

        assert_eq!(
            config.seed_admin_config().seed_admin_email.as_deref(),
            Some("owner@kaapikart.test")
        );
        assert_eq!(config.session_keys_config().expiry_days, 30);
        Ok(())
    }
}
