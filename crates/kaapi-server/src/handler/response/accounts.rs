//! Account response types.

use jiff::Timestamp;
use kaapi_postgres::model::Account;
use kaapi_postgres::types::{AdminPermissions, AdminRole, AdminSettings};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity returned alongside a freshly issued token.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
}

impl From<Account> for AccountSummary {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.display_name,
            email: account.email_address,
            is_admin: account.is_admin,
        }
    }
}

/// Full account profile. Never carries the password hash.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub admin_role: AdminRole,
    pub admin_permissions: AdminPermissions,
    pub admin_settings: AdminSettings,
    pub is_active: bool,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            admin_permissions: account.permissions(),
            admin_settings: account.settings(),
            id: account.id,
            name: account.display_name,
            email: account.email_address,
            is_admin: account.is_admin,
            admin_role: account.admin_role,
            is_active: account.is_active,
            last_login: account.last_login_at.map(Timestamp::from),
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }
}
