use std::time::{Duration, Instant};

use crate::Result;
use crate::service::credential::{CredentialProvider, CredentialStore};
use crate::service::{ServiceConfig, SessionKeys};

/// Process start marker reported by the health endpoint.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started_at: Instant,
}

impl Uptime {
    pub fn now() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub credentials: CredentialStore,
    pub session_keys: SessionKeys,
    pub uptime: Uptime,
}

impl ServiceState {
    /// Initializes application state on top of an account storage backend.
    ///
    /// # Errors
    ///
    /// Fails if the signing secret is unusable or the hasher cannot be built.
    pub fn new(config: &ServiceConfig, provider: impl CredentialProvider + 'static) -> Result<Self> {
        let password_hasher = config.create_password_hasher()?;
        let credentials =
            CredentialStore::new(provider, password_hasher, &config.seed_admin_config());

        Ok(Self {
            credentials,
            session_keys: config.load_session_keys()?,
            uptime: Uptime::now(),
        })
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(credentials: CredentialStore);
impl_di!(session_keys: SessionKeys);
impl_di!(uptime: Uptime);
