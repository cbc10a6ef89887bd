use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use axum_extra::typed_header::TypedHeaderRejectionReason;

use super::TRACING_TARGET_AUTHENTICATION;
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{SessionKeys, TokenClaims};

/// Verified claims of the request's bearer token.
///
/// A missing header, or one that does not use the `Bearer` scheme, is
/// rejected with [`ErrorKind::MissingAuthToken`]. A token with a bad
/// signature, a malformed payload or a past expiry is rejected with
/// [`ErrorKind::MalformedAuthToken`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthHeader {
    claims: TokenClaims,
}

impl AuthHeader {
    #[inline]
    pub const fn new(claims: TokenClaims) -> Self {
        Self { claims }
    }

    #[inline]
    pub const fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    #[inline]
    pub fn into_claims(self) -> TokenClaims {
        self.claims
    }

    /// Verifies a raw bearer token.
    pub fn from_token(token: &str, session_keys: &SessionKeys) -> Result<Self> {
        let claims = session_keys.verify(token)?;
        Ok(Self::new(claims))
    }
}

impl<S> FromRequestParts<S> for AuthHeader
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_header) = parts.extensions.get::<Self>() {
            return Ok(*auth_header);
        }

        type BearerHeader = TypedHeader<Authorization<Bearer>>;
        let bearer = match BearerHeader::from_request_parts(parts, state).await {
            Ok(TypedHeader(Authorization(bearer))) => bearer,
            Err(rejection) => {
                let context = match rejection.reason() {
                    TypedHeaderRejectionReason::Missing => "missing authorization header",
                    _ => "authorization header is not a bearer token",
                };

                tracing::debug!(
                    target: TRACING_TARGET_AUTHENTICATION,
                    reason = context,
                    "Request without bearer token"
                );
                return Err(ErrorKind::MissingAuthToken
                    .with_context(context)
                    .with_resource("authentication"));
            }
        };

        let session_keys = SessionKeys::from_ref(state);
        let auth_header = Self::from_token(bearer.token(), &session_keys)?;
        parts.extensions.insert(auth_header);
        Ok(auth_header)
    }
}
