use async_trait::async_trait;
use ipnet::IpNet;
use kaapi_postgres::model::{Account, AccountLogin, NewAccount, UpdateAccount};
use kaapi_postgres::query::{AccountLoginRepository, AccountRepository, AccountStatistics};
use kaapi_postgres::{PgClient, PgConn};
use uuid::Uuid;

use super::{CredentialProvider, CredentialResult};

/// PostgreSQL backed [`CredentialProvider`].
///
/// Uniqueness of emails is enforced by the `accounts_email_address_unique_idx`
/// index; violations surface as [`CredentialError::DuplicateEmail`].
///
/// [`CredentialError::DuplicateEmail`]: super::CredentialError::DuplicateEmail
#[derive(Debug, Clone)]
pub struct PgCredentialProvider {
    pg_client: PgClient,
}

impl PgCredentialProvider {
    pub fn new(pg_client: PgClient) -> Self {
        Self { pg_client }
    }

    async fn connection(&self) -> CredentialResult<PgConn> {
        Ok(self.pg_client.get_connection().await?)
    }
}

#[async_trait]
impl CredentialProvider for PgCredentialProvider {
    async fn create_account(&self, new_account: NewAccount) -> CredentialResult<Account> {
        let mut conn = self.connection().await?;
        Ok(conn.create_account(new_account).await?)
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> CredentialResult<Option<Account>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_account_by_id(account_id).await?)
    }

    async fn find_account_by_email(&self, email: &str) -> CredentialResult<Option<Account>> {
        let mut conn = self.connection().await?;
        Ok(conn.find_account_by_email(email).await?)
    }

    async fn list_accounts(&self) -> CredentialResult<Vec<Account>> {
        let mut conn = self.connection().await?;
        Ok(conn.list_accounts().await?)
    }

    async fn update_account(
        &self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> CredentialResult<Option<Account>> {
        let mut conn = self.connection().await?;
        Ok(conn.update_account(account_id, updates).await?)
    }

    async fn delete_account(&self, account_id: Uuid) -> CredentialResult<bool> {
        let mut conn = self.connection().await?;
        Ok(conn.delete_account(account_id).await?)
    }

    async fn record_login(
        &self,
        account_id: Uuid,
        ip_address: Option<IpNet>,
    ) -> CredentialResult<AccountLogin> {
        let mut conn = self.connection().await?;
        Ok(conn.record_account_login(account_id, ip_address).await?)
    }

    async fn list_logins(&self, account_id: Uuid) -> CredentialResult<Vec<AccountLogin>> {
        let mut conn = self.connection().await?;
        Ok(conn.list_account_logins(account_id).await?)
    }

    async fn account_statistics(&self) -> CredentialResult<AccountStatistics> {
        let mut conn = self.connection().await?;
        Ok(conn.account_statistics().await?)
    }

    async fn health_check(&self) -> CredentialResult<()> {
        Ok(self.pg_client.ping().await?)
    }
}
