//! Account administration response types.

use std::borrow::Cow;

use jiff::Timestamp;
use kaapi_postgres::model::{Account, AccountLogin};
use kaapi_postgres::query::AccountStatistics;
use kaapi_postgres::types::AdminSettings;
use serde::{Deserialize, Serialize};

use super::{AccountResponse, DatabaseHealth};

/// Bare confirmation message.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: Cow<'static, str>,
}

impl MessageResponse {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Confirmation message together with the updated account.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountMessageResponse {
    pub message: Cow<'static, str>,
    pub user: AccountResponse,
}

impl AccountMessageResponse {
    pub fn new(message: impl Into<Cow<'static, str>>, user: impl Into<AccountResponse>) -> Self {
        Self {
            message: message.into(),
            user: user.into(),
        }
    }
}

/// Account counts shown on the admin dashboard.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub total_users: i64,
    pub active_users: i64,
    pub admin_users: i64,
    pub last_updated: Timestamp,
}

impl From<AccountStatistics> for AdminStatsResponse {
    fn from(stats: AccountStatistics) -> Self {
        Self {
            total_users: stats.total_accounts,
            active_users: stats.active_accounts,
            admin_users: stats.admin_accounts,
            last_updated: Timestamp::now(),
        }
    }
}

/// Account metrics and process status for the admin dashboard.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealthResponse {
    pub metrics: SystemMetrics,
    pub system_status: SystemStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetrics {
    pub total_users: i64,
    pub active_users: i64,
    pub admin_users: i64,
    /// Accounts that logged in during the last 24 hours.
    pub recent_logins: i64,
}

impl From<AccountStatistics> for SystemMetrics {
    fn from(stats: AccountStatistics) -> Self {
        Self {
            total_users: stats.total_accounts,
            active_users: stats.active_accounts,
            admin_users: stats.admin_accounts,
            recent_logins: stats.recent_logins,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    /// Seconds since the service state was created.
    pub uptime: f64,
    pub timestamp: Timestamp,
    pub database: DatabaseHealth,
}

/// One entry of the login history.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginEntry {
    pub timestamp: Timestamp,
    /// Client address, if it could be determined.
    pub ip: Option<String>,
}

impl From<AccountLogin> for LoginEntry {
    fn from(login: AccountLogin) -> Self {
        Self {
            timestamp: login.logged_in_at.into(),
            ip: login.ip_address.map(|net| net.addr().to_string()),
        }
    }
}

/// Recent activity of the calling administrator.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogResponse {
    /// Most recent first.
    pub login_history: Vec<LoginEntry>,
    pub last_login: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ActivityLogResponse {
    pub fn new(account: &Account, logins: Vec<AccountLogin>) -> Self {
        Self {
            login_history: logins.into_iter().map(LoginEntry::from).collect(),
            last_login: account.last_login_at.map(Timestamp::from),
            created_at: account.created_at.into(),
            updated_at: account.updated_at.into(),
        }
    }
}

/// Confirmation message together with the stored settings.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsMessageResponse {
    pub message: Cow<'static, str>,
    pub settings: AdminSettings,
}

impl SettingsMessageResponse {
    pub fn new(message: impl Into<Cow<'static, str>>, settings: AdminSettings) -> Self {
        Self {
            message: message.into(),
            settings,
        }
    }
}
