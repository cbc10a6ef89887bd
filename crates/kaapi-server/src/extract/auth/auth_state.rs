use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use kaapi_postgres::model::Account;
use uuid::Uuid;

use super::{AuthHeader, TRACING_TARGET_AUTHENTICATION};
use crate::handler::{Error, ErrorKind, Result};
use crate::service::{CredentialStore, SessionKeys, TokenClaims};

/// Authenticated request context.
///
/// Holds the account the bearer token refers to, reloaded from the
/// credential store on every request. The admin flag is read from that
/// account, not from the token, so demotions take effect immediately.
/// Resolution happens once per request and is cached in the request
/// extensions.
#[must_use]
#[derive(Debug, Clone)]
pub struct AuthState {
    account: Account,
    claims: TokenClaims,
}

impl AuthState {
    /// Resolves the account behind verified claims.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Unauthorized`] if the account was deleted or is
    ///   deactivated.
    /// - [`ErrorKind::InternalServerError`] if the store is unavailable.
    pub async fn resolve(claims: TokenClaims, credentials: &CredentialStore) -> Result<Self> {
        let account = credentials.find_by_id(claims.id).await?.ok_or_else(|| {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %claims.id,
                "Token refers to a missing account"
            );
            ErrorKind::Unauthorized
                .with_message("Not authorized, user not found")
                .with_resource("authentication")
        })?;

        if !account.can_login() {
            tracing::warn!(
                target: TRACING_TARGET_AUTHENTICATION,
                account_id = %account.id,
                "Token refers to a deactivated account"
            );
            return Err(ErrorKind::Unauthorized
                .with_message("Not authorized, account is deactivated")
                .with_resource("authentication"));
        }

        tracing::trace!(
            target: TRACING_TARGET_AUTHENTICATION,
            account_id = %account.id,
            is_admin = account.is_admin,
            "Request authenticated"
        );

        Ok(Self { account, claims })
    }

    #[inline]
    pub fn account(&self) -> &Account {
        &self.account
    }

    #[inline]
    pub fn account_id(&self) -> Uuid {
        self.account.id
    }

    /// Returns the current admin flag of the account.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.account.can_admin()
    }

    /// Returns the claims of the presented token.
    #[inline]
    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    #[inline]
    pub fn into_account(self) -> Account {
        self.account
    }
}

impl<S> FromRequestParts<S> for AuthState
where
    S: Sync + Send,
    SessionKeys: FromRef<S>,
    CredentialStore: FromRef<S>,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(auth_state) = parts.extensions.get::<Self>() {
            return Ok(auth_state.clone());
        }

        let auth_header = AuthHeader::from_request_parts(parts, state).await?;
        let credentials = CredentialStore::from_ref(state);
        let auth_state = Self::resolve(auth_header.into_claims(), &credentials).await?;

        parts.extensions.insert(auth_state.clone());
        Ok(auth_state)
    }
}
