use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::TRACING_TARGET_AUTHORIZATION;
use crate::extract::AuthState;
use crate::handler::ErrorKind;

/// Requires the authenticated account to be an administrator.
///
/// The flag is read from the account as currently stored, so an account
/// demoted after its token was issued is refused.
pub async fn require_admin(auth_state: AuthState, request: Request, next: Next) -> Response {
    if !auth_state.is_admin() {
        tracing::warn!(
            target: TRACING_TARGET_AUTHORIZATION,
            account_id = %auth_state.account_id(),
            path = %request.uri().path(),
            "Admin route refused"
        );

        return ErrorKind::Forbidden
            .with_resource("authorization")
            .into_response();
    }

    next.run(request).await
}
