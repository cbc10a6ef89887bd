//! Authentication response types.

use serde::{Deserialize, Serialize};

use super::{AccountResponse, AccountSummary};

/// Response returned after registration or login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Signed bearer token.
    pub token: String,
    pub user: AccountSummary,
}

/// Response returned by token verification.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyTokenResponse {
    pub user: AccountResponse,
}
