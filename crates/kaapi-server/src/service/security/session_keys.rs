//! Signing secret and bearer token issuance.
//!
//! Tokens are stateless HS256 JWTs carrying the account id and admin flag.
//! Nothing is stored server side: a token is valid exactly as long as its
//! signature matches and its expiry has not passed.

use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

const TRACING_TARGET: &str = "kaapi_server::service::session_keys";

/// Minimum length of the signing secret in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default token lifetime in days.
pub const DEFAULT_EXPIRY_DAYS: u32 = 30;

/// Signing secret and token lifetime.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SessionKeysConfig {
    /// Secret used to sign and verify bearer tokens.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "jwt-secret", env = "JWT_SECRET", hide_env_values = true)
    )]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in days.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "jwt-expiry-days", env = "JWT_EXPIRY_DAYS", default_value = "30")
    )]
    #[serde(default = "SessionKeysConfig::default_expiry_days")]
    pub expiry_days: u32,
}

impl SessionKeysConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            expiry_days: DEFAULT_EXPIRY_DAYS,
        }
    }

    fn default_expiry_days() -> u32 {
        DEFAULT_EXPIRY_DAYS
    }

    /// Returns the token lifetime.
    #[inline]
    pub fn lifetime(&self) -> SignedDuration {
        SignedDuration::from_hours(i64::from(self.expiry_days) * 24)
    }

    fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(Error::config("JWT_SECRET must be set"));
        }

        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(Error::config(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} bytes long"
            )));
        }

        if self.expiry_days == 0 {
            return Err(Error::config("JWT_EXPIRY_DAYS must be positive"));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("jwt_secret", &"***")
            .field("expiry_days", &self.expiry_days)
            .finish()
    }
}

/// Claims carried by every bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    /// Account identifier.
    pub id: Uuid,
    /// Admin flag at issuance time.
    pub is_admin: bool,
    /// Issued at, in seconds since the epoch.
    pub iat: i64,
    /// Expires at, in seconds since the epoch.
    pub exp: i64,
}

impl TokenClaims {
    /// Creates claims issued at `issued_at` and valid for `lifetime`.
    pub fn new(id: Uuid, is_admin: bool, issued_at: Timestamp, lifetime: SignedDuration) -> Self {
        let iat = issued_at.as_second();
        Self {
            id,
            is_admin,
            iat,
            exp: iat.saturating_add(lifetime.as_secs()),
        }
    }

    #[inline]
    pub fn is_expired(&self) -> bool {
        self.exp <= Timestamp::now().as_second()
    }
}

/// Token issuance and verification failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is invalid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Keys for signing and verifying bearer tokens.
///
/// Cheap to clone; read only after startup.
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
    lifetime: SignedDuration,
}

impl SessionKeys {
    /// Builds the keys and checks them with a sign and verify round trip.
    ///
    /// # Errors
    ///
    /// Fails if the secret is missing or too short, or the round trip fails.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        config.validate()?;

        let secret = config.jwt_secret.as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);
        validation.leeway = 0;

        let keys = Self {
            inner: Arc::new(SessionKeysInner {
                decoding_key: DecodingKey::from_secret(secret),
                encoding_key: EncodingKey::from_secret(secret),
                validation,
                lifetime: config.lifetime(),
            }),
        };

        keys.validate_keys()?;
        tracing::info!(
            target: TRACING_TARGET,
            expiry_days = config.expiry_days,
            "Session keys loaded"
        );

        Ok(keys)
    }

    /// Returns the lifetime of issued tokens.
    #[inline]
    pub fn lifetime(&self) -> SignedDuration {
        self.inner.lifetime
    }

    /// Issues a token for the account, valid for the configured lifetime.
    pub fn issue(&self, account_id: Uuid, is_admin: bool) -> Result<String, TokenError> {
        let claims = TokenClaims::new(account_id, is_admin, Timestamp::now(), self.lifetime());
        self.encode_claims(&claims)
    }

    /// Signs arbitrary claims.
    pub fn encode_claims(&self, claims: &TokenClaims) -> Result<String, TokenError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.inner.encoding_key).map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET,
                error = %err,
                account_id = %claims.id,
                "Failed to sign token"
            );
            TokenError::Signing(err)
        })
    }

    /// Verifies the signature and expiry of a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        decode::<TokenClaims>(token, &self.inner.decoding_key, &self.inner.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(err),
            })
    }

    fn validate_keys(&self) -> Result<()> {
        let token = self
            .issue(Uuid::nil(), false)
            .map_err(|e| Error::auth("session key validation failed to sign").with_source(e))?;

        self.verify(&token)
            .map_err(|e| Error::auth("session key validation failed to verify").with_source(e))?;

        Ok(())
    }
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("lifetime", &self.inner.lifetime)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::ErrorKind;

    const SECRET: &str = "kaapikart-test-secret-with-enough-bytes";

    fn keys() -> SessionKeys {
        SessionKeys::from_config(&SessionKeysConfig::new(SECRET)).expect("valid test secret")
    }

    #[test]
    fn issue_then_verify() -> anyhow::Result<()> {
        let keys = keys();
        let account_id = Uuid::new_v4();

        let token = keys.issue(account_id, true)?;
        let claims = keys.verify(&token)?;

        assert_eq!(claims.id, account_id);
        assert!(claims.is_admin);
        assert_eq!(claims.exp - claims.iat, 30 * 24 * 60 * 60);
        Ok(())
    }

    #[test]
    fn expired_token_is_rejected() -> anyhow::Result<()> {
        let keys = keys();
        let issued_at = Timestamp::now() - SignedDuration::from_hours(31 * 24);
        let claims = TokenClaims::new(Uuid::new_v4(), false, issued_at, keys.lifetime());
        assert!(claims.is_expired());

        let token = keys.encode_claims(&claims)?;
        assert!(matches!(keys.verify(&token), Err(TokenError::Expired)));
        Ok(())
    }

    #[test]
    fn foreign_signature_is_rejected() -> anyhow::Result<()> {
        let other = SessionKeys::from_config(&SessionKeysConfig::new(
            "another-secret-that-is-also-long-enough",
        ))?;
        let token = other.issue(Uuid::new_v4(), false)?;

        assert!(matches!(keys().verify(&token), Err(TokenError::Invalid(_))));
        assert!(matches!(keys().verify("not.a.jwt"), Err(TokenError::Invalid(_))));
        Ok(())
    }

    #[test]
    fn short_secret_is_a_config_error() {
        let error = SessionKeys::from_config(&SessionKeysConfig::new("short")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);

        let error = SessionKeys::from_config(&SessionKeysConfig::new("")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Config);
    }

    #[test]
    fn debug_hides_secret() {
        let config = SessionKeysConfig::new(SECRET);
        assert!(!format!("{config:?}").contains(SECRET));
    }

    #[test]
    fn parses_from_args() -> anyhow::Result<()> {
        #[derive(Parser)]
        struct Cli {
            #[command(flatten)]
            keys: SessionKeysConfig,
        }

        let cli = Cli::try_parse_from(["kaapi", "--jwt-secret", SECRET])?;
        assert_eq!(cli.keys.expiry_days, DEFAULT_EXPIRY_DAYS);

        let cli = Cli::try_parse_from(["kaapi", "--jwt-secret", SECRET, "--jwt-expiry-days", "7"])?;
        assert_eq!(cli.keys.lifetime(), SignedDuration::from_hours(7 * 24));
        Ok(())
    }
}
