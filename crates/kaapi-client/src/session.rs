//! Client-side session state.
//!
//! [`AuthStore`] owns the [`SessionState`] and is the only thing that changes
//! it. Views read snapshots or subscribe to changes.
//!
//! ```text
//! Unknown ──restore──> Unauthenticated
//!    │
//!    └──restore──> OptimisticallyAuthenticated ──verify ok──> Verified
//!                                              └─verify err─> Rejected
//!
//! any ──login ok──> Verified
//! any ──logout────> Unauthenticated
//! ```
//!
//! Every transition that starts or ends a session bumps an epoch. A network
//! result is applied only if the epoch is unchanged since the call started,
//! so a logout issued while a login or verification is in flight wins.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::api::{AuthApi, AuthSession, User};
use crate::error::{AuthAction, AuthFailure, Error, MISSING_CREDENTIALS_MESSAGE};
use crate::storage::TokenStorage;

/// Tracing target for session transitions.
pub const TRACING_TARGET: &str = "kaapi_client::session";

/// Snapshot of the client session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    /// The persisted token has not been looked at yet.
    #[default]
    Unknown,
    Unauthenticated,
    /// A persisted token exists and is being verified in the background.
    /// The user is not known yet.
    OptimisticallyAuthenticated { token: String },
    Verified { token: String, user: User },
    /// The persisted token was refused and has been cleared.
    Rejected,
}

impl SessionState {
    /// Returns whether the client should act as signed in.
    ///
    /// Always implies [`token`](Self::token) is `Some`.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::OptimisticallyAuthenticated { token } | Self::Verified { token, .. } => {
                Some(token)
            }
            _ => None,
        }
    }

    /// Returns the signed-in user once the server has confirmed it.
    ///
    /// `None` while optimistically authenticated.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Verified { user, .. } => Some(user),
            _ => None,
        }
    }

    /// Returns whether the session has not been restored yet.
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

/// Token verification started by [`AuthStore::begin_restore`].
#[derive(Debug)]
#[must_use = "the session stays optimistic until the verification is finished"]
pub struct PendingVerification {
    token: String,
    epoch: u64,
}

struct AuthStoreInner {
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn TokenStorage>,
    state: watch::Sender<SessionState>,
    /// Guards every state publish and storage write.
    epoch: Mutex<u64>,
}

/// Session store with `restore_session`, `login`, `register` and `logout`.
///
/// Cheap to clone; clones share the same session.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<AuthStoreInner>,
}

impl AuthStore {
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn TokenStorage>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self {
            inner: Arc::new(AuthStoreInner {
                api,
                storage,
                state,
                epoch: Mutex::new(0),
            }),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Returns a receiver notified on every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Runs `f` with the epoch locked.
    fn with_epoch<R>(&self, f: impl FnOnce(&mut u64) -> R) -> R {
        let mut epoch = self
            .inner
            .epoch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut epoch)
    }

    fn publish(&self, state: SessionState) {
        tracing::debug!(
            target: TRACING_TARGET,
            authenticated = state.is_authenticated(),
            verified = state.user().is_some(),
            "Session state changed"
        );
        self.inner.state.send_replace(state);
    }

    fn clear_token(&self) {
        if let Err(error) = self.inner.storage.clear() {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Failed to clear the persisted token"
            );
        }
    }

    /// Reads the persisted token and moves out of [`SessionState::Unknown`].
    ///
    /// With a token, the session becomes optimistically authenticated and
    /// the returned verification must be passed to
    /// [`finish_restore`](Self::finish_restore). Without one, the session is
    /// unauthenticated and `None` is returned.
    pub fn begin_restore(&self) -> Option<PendingVerification> {
        self.with_epoch(|epoch| {
            *epoch += 1;

            let token = self.inner.storage.load().unwrap_or_else(|error| {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Failed to read the persisted token"
                );
                None
            });

            match token {
                Some(token) => {
                    self.publish(SessionState::OptimisticallyAuthenticated {
                        token: token.clone(),
                    });
                    Some(PendingVerification {
                        token,
                        epoch: *epoch,
                    })
                }
                None => {
                    self.publish(SessionState::Unauthenticated);
                    None
                }
            }
        })
    }

    /// Verifies the token read by [`begin_restore`](Self::begin_restore).
    ///
    /// On success the session is verified; on any failure the token is
    /// cleared and the session is rejected. The result is dropped if the
    /// session changed in the meantime.
    pub async fn finish_restore(&self, pending: PendingVerification) -> SessionState {
        let outcome = self.inner.api.verify_token(&pending.token).await;

        self.with_epoch(|epoch| {
            if *epoch != pending.epoch {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "Session changed during verification, result discarded"
                );
                return;
            }

            match outcome {
                Ok(user) => self.publish(SessionState::Verified {
                    token: pending.token,
                    user,
                }),
                Err(error) => {
                    tracing::info!(
                        target: TRACING_TARGET,
                        error = %error,
                        "Persisted token was rejected"
                    );
                    self.clear_token();
                    self.publish(SessionState::Rejected);
                }
            }
        });

        self.state()
    }

    /// Restores the session from the persisted token.
    ///
    /// Views that must not wait for the network should call
    /// [`begin_restore`](Self::begin_restore) and spawn
    /// [`finish_restore`](Self::finish_restore) instead.
    pub async fn restore_session(&self) -> SessionState {
        match self.begin_restore() {
            Some(pending) => self.finish_restore(pending).await,
            None => self.state(),
        }
    }

    /// Signs in and persists the token.
    ///
    /// Blank fields are rejected without a request. Nothing is persisted
    /// unless the server answered with both a token and a user.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthFailure> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AuthFailure::new(
                AuthAction::Login,
                Error::Validation(MISSING_CREDENTIALS_MESSAGE),
            ));
        }

        let started_at = self.with_epoch(|epoch| *epoch);
        let outcome = self.inner.api.login(email, password).await;
        let AuthSession { token, user } =
            outcome.map_err(|cause| AuthFailure::new(AuthAction::Login, cause))?;

        self.with_epoch(|epoch| {
            if *epoch != started_at {
                tracing::debug!(
                    target: TRACING_TARGET,
                    "Session changed during login, result discarded"
                );
                return Err(AuthFailure::new(AuthAction::Login, Error::Superseded));
            }

            self.inner
                .storage
                .store(&token)
                .map_err(|cause| AuthFailure::new(AuthAction::Login, cause))?;

            *epoch += 1;
            tracing::info!(
                target: TRACING_TARGET,
                user_id = %user.id,
                "Signed in"
            );
            self.publish(SessionState::Verified {
                token,
                user: user.clone(),
            });
            Ok(user)
        })
    }

    /// Creates an account without signing in.
    ///
    /// Callers are expected to send the user to the login view next.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthFailure> {
        let session = self
            .inner
            .api
            .register(name, email, password)
            .await
            .map_err(|cause| AuthFailure::new(AuthAction::Register, cause))?;

        tracing::info!(
            target: TRACING_TARGET,
            user_id = %session.user.id,
            "Account registered"
        );
        Ok(session.user)
    }

    /// Clears the persisted token and signs out.
    ///
    /// Any login or verification still in flight is discarded when it
    /// completes.
    pub fn logout(&self) {
        self.with_epoch(|epoch| {
            *epoch += 1;
            self.clear_token();
            self.publish(SessionState::Unauthenticated);
        });
    }
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}
