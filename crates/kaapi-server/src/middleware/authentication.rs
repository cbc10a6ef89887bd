use axum::Router;
use axum::extract::Request;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::Response;

use crate::extract::AuthState;
use crate::service::ServiceState;

/// Extension trait for `axum::`[`Router`] to require authentication.
///
/// Applied as route layers: only matched routes are guarded, unmatched
/// paths still fall through to the `404` fallback.
pub trait RouterAuthExt<S> {
    /// Requires a valid bearer token of an active account on every route.
    fn with_authentication(self, state: ServiceState) -> Self;

    /// Requires an authenticated administrator on every route.
    ///
    /// Non-admin accounts receive `403 Forbidden`.
    fn with_admin_authentication(self, state: ServiceState) -> Self;
}

impl<S> RouterAuthExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state, require_authentication))
    }

    fn with_admin_authentication(self, state: ServiceState) -> Self {
        self.route_layer(from_fn_with_state(state.clone(), super::require_admin))
            .route_layer(from_fn_with_state(state, require_authentication))
    }
}

/// Resolves the [`AuthState`] and leaves it in the request extensions.
///
/// Handlers behind this middleware extract [`AuthState`] again without
/// repeating token verification or the account lookup.
pub async fn require_authentication(_: AuthState, request: Request, next: Next) -> Response {
    next.run(request).await
}
