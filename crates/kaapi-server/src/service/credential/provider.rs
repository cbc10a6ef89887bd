use async_trait::async_trait;
use ipnet::IpNet;
use kaapi_postgres::model::{Account, AccountLogin, NewAccount, UpdateAccount};
use kaapi_postgres::query::AccountStatistics;
use uuid::Uuid;

use super::CredentialResult;

/// Storage backend for accounts and their login history.
///
/// Emails are stored trimmed and lowercased and compared case-insensitively.
/// Creating an account whose email is taken fails with
/// [`CredentialError::DuplicateEmail`], also when a concurrent registration
/// won the race.
///
/// [`CredentialError::DuplicateEmail`]: super::CredentialError::DuplicateEmail
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Persists a new account. `password_hash` must already be hashed.
    async fn create_account(&self, new_account: NewAccount) -> CredentialResult<Account>;

    async fn find_account_by_id(&self, account_id: Uuid) -> CredentialResult<Option<Account>>;

    async fn find_account_by_email(&self, email: &str) -> CredentialResult<Option<Account>>;

    /// Lists all accounts, newest first.
    async fn list_accounts(&self) -> CredentialResult<Vec<Account>>;

    /// Applies a partial update, returning `None` for an unknown account.
    async fn update_account(
        &self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> CredentialResult<Option<Account>>;

    /// Deletes an account, returning whether it existed.
    async fn delete_account(&self, account_id: Uuid) -> CredentialResult<bool>;

    /// Appends a login entry, keeps the newest ten and stamps the last login.
    async fn record_login(
        &self,
        account_id: Uuid,
        ip_address: Option<IpNet>,
    ) -> CredentialResult<AccountLogin>;

    /// Returns the login history, newest first.
    async fn list_logins(&self, account_id: Uuid) -> CredentialResult<Vec<AccountLogin>>;

    async fn account_statistics(&self) -> CredentialResult<AccountStatistics>;

    /// Checks that the backend is reachable.
    async fn health_check(&self) -> CredentialResult<()>;
}
