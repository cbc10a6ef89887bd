//! bcrypt password hashing.
//!
//! Hashing and verification are CPU bound and run on the blocking thread pool.

use std::fmt;
use std::sync::Arc;

use tokio::task::spawn_blocking;

use crate::{Error, Result};

const TRACING_TARGET: &str = "kaapi_server::service::password_hasher";

/// Work factor used for stored hashes.
pub const HASH_COST: u32 = 10;

/// Lowest cost bcrypt accepts, for tests.
#[cfg(test)]
pub(crate) const TEST_HASH_COST: u32 = 4;

/// Plaintext hashed once at startup and verified against for unknown emails.
const DUMMY_PASSWORD: &str = "kaapikart-dummy-password";

/// Salted bcrypt hashing with a fixed cost.
#[derive(Clone)]
pub struct PasswordHasher {
    inner: Arc<PasswordHasherInner>,
}

struct PasswordHasherInner {
    cost: u32,
    dummy_hash: String,
}

impl PasswordHasher {
    /// Creates a hasher with [`HASH_COST`].
    pub fn new() -> Result<Self> {
        Self::with_cost(HASH_COST)
    }

    /// Creates a hasher with a custom cost.
    pub fn with_cost(cost: u32) -> Result<Self> {
        let dummy_hash = bcrypt::hash(DUMMY_PASSWORD, cost).map_err(|e| {
            Error::internal("bcrypt", "failed to prepare the dummy hash").with_source(e)
        })?;

        Ok(Self {
            inner: Arc::new(PasswordHasherInner { cost, dummy_hash }),
        })
    }

    #[inline]
    pub fn cost(&self) -> u32 {
        self.inner.cost
    }

    /// Hashes a password with a fresh random salt.
    pub async fn hash_password(&self, password: &str) -> Result<String> {
        let password = password.to_owned();
        let cost = self.inner.cost;

        spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| Error::internal("bcrypt", "hashing task failed").with_source(e))?
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %e,
                    "Password hashing failed"
                );
                Error::internal("bcrypt", "password hashing failed").with_source(e)
            })
    }

    /// Returns whether `password` matches `stored_hash`.
    ///
    /// A malformed stored hash is logged and treated as a mismatch.
    pub async fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();

        let outcome = spawn_blocking(move || bcrypt::verify(password, &stored_hash)).await;
        match outcome {
            Ok(Ok(matches)) => matches,
            Ok(Err(error)) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Stored password hash could not be verified"
                );
                false
            }
            Err(error) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Password verification task failed"
                );
                false
            }
        }
    }

    /// Spends one verification worth of work without a real account.
    ///
    /// Always returns `false` for anything but the internal dummy password.
    pub async fn verify_dummy_password(&self, password: &str) -> bool {
        self.verify_password(password, &self.inner.dummy_hash).await
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("cost", &self.inner.cost)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        PasswordHasher::with_cost(TEST_HASH_COST).expect("valid cost")
    }

    #[tokio::test]
    async fn hash_and_verify() -> anyhow::Result<()> {
        let hasher = hasher();
        let hash = hasher.hash_password("secret1").await?;

        assert_ne!(hash, "secret1");
        assert!(hasher.verify_password("secret1", &hash).await);
        assert!(!hasher.verify_password("wrong", &hash).await);
        Ok(())
    }

    #[tokio::test]
    async fn salts_are_unique() -> anyhow::Result<()> {
        let hasher = hasher();
        let first = hasher.hash_password("secret1").await?;
        let second = hasher.hash_password("secret1").await?;

        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn default_cost_is_ten() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new()?;
        let hash = hasher.hash_password("secret1").await?;

        assert_eq!(hasher.cost(), 10);
        assert!(hash.starts_with("$2b$10$"));
        Ok(())
    }

    #[tokio::test]
    async fn malformed_hash_is_a_mismatch() {
        let hasher = hasher();
        assert!(!hasher.verify_password("secret1", "not-a-bcrypt-hash").await);
    }

    #[tokio::test]
    async fn dummy_password_never_matches_user_input() {
        let hasher = hasher();
        assert!(!hasher.verify_dummy_password("secret1").await);
    }
}
