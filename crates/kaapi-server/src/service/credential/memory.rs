use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ipnet::IpNet;
use jiff::Timestamp;
use kaapi_postgres::model::{Account, AccountLogin, NewAccount, UpdateAccount};
use kaapi_postgres::query::{AccountStatistics, LOGIN_HISTORY_LIMIT};
use kaapi_postgres::types::{AdminPermissions, AdminSettings};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{CredentialError, CredentialProvider, CredentialResult};

/// In-process [`CredentialProvider`].
///
/// Mirrors the normalization and uniqueness rules of the PostgreSQL provider.
/// Contents are lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialProvider {
    inner: Arc<RwLock<MemoryAccounts>>,
}

#[derive(Debug, Default)]
struct MemoryAccounts {
    /// Accounts in insertion order.
    accounts: Vec<Account>,
    /// Login history per account, oldest first.
    logins: HashMap<Uuid, Vec<AccountLogin>>,
}

impl MemoryAccounts {
    fn position(&self, account_id: Uuid) -> Option<usize> {
        self.accounts.iter().position(|a| a.id == account_id)
    }
}

impl MemoryCredentialProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialProvider for MemoryCredentialProvider {
    async fn create_account(&self, new_account: NewAccount) -> CredentialResult<Account> {
        let email_address = new_account.email_address.trim().to_lowercase();
        let mut guard = self.inner.write().await;

        if guard.accounts.iter().any(|a| a.email_address == email_address) {
            return Err(CredentialError::DuplicateEmail);
        }

        let now = Timestamp::now();
        let account = Account {
            id: Uuid::new_v4(),
            display_name: new_account.display_name.trim().to_owned(),
            email_address,
            password_hash: new_account.password_hash,
            is_admin: new_account.is_admin,
            admin_role: new_account.admin_role,
            admin_permissions: AdminPermissions::default().to_json(),
            admin_settings: serde_json::to_value(AdminSettings::default()).unwrap_or_default(),
            is_active: true,
            last_login_at: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        guard.accounts.push(account.clone());
        Ok(account)
    }

    async fn find_account_by_id(&self, account_id: Uuid) -> CredentialResult<Option<Account>> {
        let guard = self.inner.read().await;
        Ok(guard.accounts.iter().find(|a| a.id == account_id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> CredentialResult<Option<Account>> {
        let email = email.trim().to_lowercase();
        let guard = self.inner.read().await;
        Ok(guard
            .accounts
            .iter()
            .find(|a| a.email_address == email)
            .cloned())
    }

    async fn list_accounts(&self) -> CredentialResult<Vec<Account>> {
        let guard = self.inner.read().await;
        Ok(guard.accounts.iter().rev().cloned().collect())
    }

    async fn update_account(
        &self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> CredentialResult<Option<Account>> {
        let mut guard = self.inner.write().await;
        let Some(index) = guard.position(account_id) else {
            return Ok(None);
        };

        let account = &mut guard.accounts[index];
        if let Some(display_name) = updates.display_name {
            account.display_name = display_name.trim().to_owned();
        }
        if let Some(is_admin) = updates.is_admin {
            account.is_admin = is_admin;
        }
        if let Some(admin_role) = updates.admin_role {
            account.admin_role = admin_role;
        }
        if let Some(admin_permissions) = updates.admin_permissions {
            account.admin_permissions = admin_permissions;
        }
        if let Some(admin_settings) = updates.admin_settings {
            account.admin_settings = admin_settings;
        }
        if let Some(is_active) = updates.is_active {
            account.is_active = is_active;
        }
        account.updated_at = Timestamp::now().into();

        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, account_id: Uuid) -> CredentialResult<bool> {
        let mut guard = self.inner.write().await;
        let Some(index) = guard.position(account_id) else {
            return Ok(false);
        };

        guard.accounts.remove(index);
        guard.logins.remove(&account_id);
        Ok(true)
    }

    async fn record_login(
        &self,
        account_id: Uuid,
        ip_address: Option<IpNet>,
    ) -> CredentialResult<AccountLogin> {
        let mut guard = self.inner.write().await;
        let Some(index) = guard.position(account_id) else {
            return Err(CredentialError::backend(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "account does not exist",
            )));
        };

        let now = Timestamp::now();
        guard.accounts[index].last_login_at = Some(now.into());

        let login = AccountLogin {
            id: Uuid::new_v4(),
            account_id,
            ip_address,
            logged_in_at: now.into(),
        };

        let history = guard.logins.entry(account_id).or_default();
        history.push(login.clone());
        let limit = usize::try_from(LOGIN_HISTORY_LIMIT).unwrap_or(usize::MAX);
        if history.len() > limit {
            let excess = history.len() - limit;
            history.drain(..excess);
        }

        Ok(login)
    }

    async fn list_logins(&self, account_id: Uuid) -> CredentialResult<Vec<AccountLogin>> {
        let guard = self.inner.read().await;
        Ok(guard
            .logins
            .get(&account_id)
            .map(|history| history.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn account_statistics(&self) -> CredentialResult<AccountStatistics> {
        let guard = self.inner.read().await;
        let cutoff = AccountStatistics::recent_login_cutoff(Timestamp::now());
        let count = |f: &dyn Fn(&Account) -> bool| {
            i64::try_from(guard.accounts.iter().filter(|a| f(a)).count()).unwrap_or(i64::MAX)
        };

        Ok(AccountStatistics {
            total_accounts: count(&|_| true),
            active_accounts: count(&|a| a.is_active),
            admin_accounts: count(&|a| a.is_admin),
            recent_logins: count(&|a| {
                a.last_login_at.is_some_and(|at| Timestamp::from(at) >= cutoff)
            }),
        })
    }

    async fn health_check(&self) -> CredentialResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    fn new_account(email: &str) -> NewAccount {
        NewAccount::new(" Jane ", email, "$2b$04$hash")
    }

    #[tokio::test]
    async fn emails_are_unique_case_insensitively() -> anyhow::Result<()> {
        let provider = MemoryCredentialProvider::new();
        let account = provider.create_account(new_account("Jane@X.com ")).await?;

        assert_eq!(account.email_address, "jane@x.com");
        assert_eq!(account.display_name, "Jane");

        let duplicate = provider.create_account(new_account("JANE@x.COM")).await;
        assert!(matches!(duplicate, Err(CredentialError::DuplicateEmail)));

        let found = provider.find_account_by_email("JANE@X.COM").await?;
        assert_eq!(found.map(|a| a.id), Some(account.id));
        Ok(())
    }

    #[tokio::test]
    async fn login_history_is_bounded() -> anyhow::Result<()> {
        let provider = MemoryCredentialProvider::new();
        let account = provider.create_account(new_account("jane@x.com")).await?;

        for _ in 0..12 {
            provider.record_login(account.id, None).await?;
        }

        let history = provider.list_logins(account.id).await?;
        assert_eq!(history.len(), 10);

        let account = provider.find_account_by_id(account.id).await?;
        assert!(account.and_then(|a| a.last_login_at).is_some());
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete() -> anyhow::Result<()> {
        let provider = MemoryCredentialProvider::new();
        let account = provider.create_account(new_account("jane@x.com")).await?;

        let updates = UpdateAccount {
            is_active: Some(false),
            ..Default::default()
        };
        let updated = provider.update_account(account.id, updates).await?;
        assert_eq!(updated.map(|a| a.is_active), Some(false));

        assert!(provider.delete_account(account.id).await?);
        assert!(!provider.delete_account(account.id).await?);
        assert!(provider.find_account_by_id(account.id).await?.is_none());
        assert!(
            provider
                .update_account(account.id, UpdateAccount::default())
                .await?
                .is_none()
        );
        Ok(())
    }

    #[tokio::test]
    async fn statistics_count_flags() -> anyhow::Result<()> {
        let provider = MemoryCredentialProvider::new();
        provider.create_account(new_account("a@x.com")).await?;
        provider
            .create_account(new_account("b@x.com").with_super_admin())
            .await?;

        let stats = provider.account_statistics().await?;
        assert_eq!(stats.total_accounts, 2);
        assert_eq!(stats.active_accounts, 2);
        assert_eq!(stats.admin_accounts, 1);
        assert_eq!(stats.recent_logins, 0);
        Ok(())
    }

    #[tokio::test]
    async fn statistics_count_logins_within_a_day() -> anyhow::Result<()> {
        let provider = MemoryCredentialProvider::new();
        let recent = provider.create_account(new_account("a@x.com")).await?;
        let stale = provider.create_account(new_account("b@x.com")).await?;
        provider.create_account(new_account("c@x.com")).await?;

        provider.record_login(recent.id, None).await?;
        provider.record_login(stale.id, None).await?;

        {
            let mut guard = provider.inner.write().await;
            let index = guard.position(stale.id).expect("account exists");
            let two_days_ago = Timestamp::now() - SignedDuration::from_hours(48);
            guard.accounts[index].last_login_at = Some(two_days_ago.into());
        }

        let stats = provider.account_statistics().await?;
        assert_eq!(stats.total_accounts, 3);
        assert_eq!(stats.recent_logins, 1);
        Ok(())
    }
}
