use std::fmt;
use std::sync::Arc;

#[cfg(any(test, feature = "config"))]
use clap::Args;
use ipnet::IpNet;
use kaapi_postgres::model::{Account, AccountLogin, NewAccount, UpdateAccount};
use kaapi_postgres::query::AccountStatistics;
use kaapi_postgres::types::AdminRole;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{CredentialError, CredentialProvider, CredentialResult, TRACING_TARGET};
use crate::service::security::PasswordHasher;

/// Email that is promoted to super administrator on registration and login.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[cfg_attr(any(test, feature = "config"), derive(Args))]
pub struct SeedAdminConfig {
    /// Email of the account granted admin access on registration or login.
    #[cfg_attr(
        any(test, feature = "config"),
        arg(long = "seed-admin-email", env = "SEED_ADMIN_EMAIL")
    )]
    pub seed_admin_email: Option<String>,
}

impl SeedAdminConfig {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            seed_admin_email: Some(email.into()),
        }
    }

    /// Returns the normalized seed email, ignoring blank values.
    fn normalized(&self) -> Option<String> {
        self.seed_admin_email
            .as_deref()
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
    }
}

/// Outcome of checking an email and password pair.
#[derive(Debug, Clone)]
pub enum Authentication {
    Accepted(Account),
    UnknownEmail,
    WrongPassword,
    Deactivated,
}

impl Authentication {
    /// Returns the reason as a short identifier for logs.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Accepted(_) => "accepted",
            Self::UnknownEmail => "unknown_email",
            Self::WrongPassword => "wrong_password",
            Self::Deactivated => "deactivated",
        }
    }
}

/// Account operations used by handlers and the authentication extractor.
#[derive(Clone)]
pub struct CredentialStore {
    provider: Arc<dyn CredentialProvider>,
    hasher: PasswordHasher,
    seed_admin_email: Option<String>,
}

impl CredentialStore {
    pub fn new(
        provider: impl CredentialProvider + 'static,
        hasher: PasswordHasher,
        seed_admin: &SeedAdminConfig,
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            hasher,
            seed_admin_email: seed_admin.normalized(),
        }
    }

    /// Returns whether `email` is the configured seed admin.
    pub fn is_seed_admin(&self, email: &str) -> bool {
        self.seed_admin_email
            .as_deref()
            .is_some_and(|seed| seed == email.trim().to_lowercase())
    }

    /// Hashes the password and persists a new account.
    ///
    /// # Errors
    ///
    /// [`CredentialError::DuplicateEmail`] if the email is taken, whether
    /// noticed up front or reported by the backend after a lost race.
    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> CredentialResult<Account> {
        if self.provider.find_account_by_email(email).await?.is_some() {
            tracing::debug!(target: TRACING_TARGET, "Registration email already taken");
            return Err(CredentialError::DuplicateEmail);
        }

        let password_hash = self
            .hasher
            .hash_password(password)
            .await
            .map_err(|e| CredentialError::Hashing(Box::new(e)))?;

        let mut new_account = NewAccount::new(name, email, password_hash);
        if self.is_seed_admin(email) {
            new_account = new_account.with_super_admin();
        }

        let account = self.provider.create_account(new_account).await?;
        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            is_admin = account.is_admin,
            "Account created"
        );

        Ok(account)
    }

    pub async fn find_by_id(&self, account_id: Uuid) -> CredentialResult<Option<Account>> {
        self.provider.find_account_by_id(account_id).await
    }

    pub async fn find_by_email(&self, email: &str) -> CredentialResult<Option<Account>> {
        self.provider.find_account_by_email(email).await
    }

    /// Compares a candidate password with the stored hash.
    pub async fn verify_password(&self, account: &Account, candidate: &str) -> bool {
        self.hasher
            .verify_password(candidate, &account.password_hash)
            .await
    }

    /// Checks an email and password pair.
    ///
    /// Unknown emails still pay for one hash verification so the hashing step
    /// takes the same time on every failure path.
    pub async fn authenticate(&self, email: &str, password: &str) -> CredentialResult<Authentication> {
        let Some(account) = self.find_by_email(email).await? else {
            self.hasher.verify_dummy_password(password).await;
            return Ok(Authentication::UnknownEmail);
        };

        if !self.verify_password(&account, password).await {
            return Ok(Authentication::WrongPassword);
        }

        if !account.can_login() {
            return Ok(Authentication::Deactivated);
        }

        Ok(Authentication::Accepted(account))
    }

    /// Grants super administrator access if `account` is the seed admin and
    /// does not have it yet.
    pub async fn promote_seed_admin(&self, account: Account) -> CredentialResult<Account> {
        if account.is_admin || !self.is_seed_admin(&account.email_address) {
            return Ok(account);
        }

        let updates = UpdateAccount::admin_role(AdminRole::SuperAdmin);
        let promoted = self.provider.update_account(account.id, updates).await?;
        tracing::info!(
            target: TRACING_TARGET,
            account_id = %account.id,
            "Seed admin promoted"
        );

        Ok(promoted.unwrap_or(account))
    }

    /// Records a successful login.
    pub async fn record_login(
        &self,
        account_id: Uuid,
        ip_address: Option<IpNet>,
    ) -> CredentialResult<AccountLogin> {
        self.provider.record_login(account_id, ip_address).await
    }

    pub async fn login_history(&self, account_id: Uuid) -> CredentialResult<Vec<AccountLogin>> {
        self.provider.list_logins(account_id).await
    }

    pub async fn list(&self) -> CredentialResult<Vec<Account>> {
        self.provider.list_accounts().await
    }

    pub async fn update(
        &self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> CredentialResult<Option<Account>> {
        self.provider.update_account(account_id, updates).await
    }

    pub async fn delete(&self, account_id: Uuid) -> CredentialResult<bool> {
        self.provider.delete_account(account_id).await
    }

    pub async fn statistics(&self) -> CredentialResult<AccountStatistics> {
        self.provider.account_statistics().await
    }

    /// Returns whether the backend answered a probe.
    pub async fn is_available(&self) -> bool {
        match self.provider.health_check().await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Credential backend health check failed"
                );
                false
            }
        }
    }
}

impl fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialStore")
            .field("hasher", &self.hasher)
            .field("seed_admin", &self.seed_admin_email.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::credential::MemoryCredentialProvider;
    use crate::service::security::TEST_HASH_COST;

    fn store(seed_admin: SeedAdminConfig) -> CredentialStore {
        let hasher = PasswordHasher::with_cost(TEST_HASH_COST).expect("valid cost");
        CredentialStore::new(MemoryCredentialProvider::new(), hasher, &seed_admin)
    }

    #[tokio::test]
    async fn create_hashes_password() -> anyhow::Result<()> {
        let store = store(SeedAdminConfig::default());
        let account = store.create("Jane", "jane@x.com", "secret1").await?;

        assert_ne!(account.password_hash, "secret1");
        assert!(store.verify_password(&account, "secret1").await);
        assert!(!store.verify_password(&account, "wrong").await);
        assert!(!account.is_admin);
        Ok(())
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() -> anyhow::Result<()> {
        let store = store(SeedAdminConfig::default());
        store.create("Jane", "jane@x.com", "secret1").await?;

        let duplicate = store.create("Jane", "JANE@X.COM", "secret2").await;
        assert!(matches!(duplicate, Err(CredentialError::DuplicateEmail)));
        Ok(())
    }

    #[tokio::test]
    async fn authenticate_distinguishes_reasons() -> anyhow::Result<()> {
        let store = store(SeedAdminConfig::default());
        let account = store.create("Jane", "jane@x.com", "secret1").await?;

        let outcome = store.authenticate("nobody@x.com", "secret1").await?;
        assert!(matches!(outcome, Authentication::UnknownEmail));

        let outcome = store.authenticate("jane@x.com", "wrong").await?;
        assert!(matches!(outcome, Authentication::WrongPassword));

        let outcome = store.authenticate("Jane@X.com", "secret1").await?;
        assert!(matches!(outcome, Authentication::Accepted(ref a) if a.id == account.id));

        let updates = UpdateAccount {
            is_active: Some(false),
            ..Default::default()
        };
        store.update(account.id, updates).await?;
        let outcome = store.authenticate("jane@x.com", "secret1").await?;
        assert_eq!(outcome.reason(), "deactivated");
        Ok(())
    }

    #[tokio::test]
    async fn seed_admin_is_promoted() -> anyhow::Result<()> {
        let store = store(SeedAdminConfig::new("Owner@KaapiKart.test"));

        let owner = store.create("Owner", "owner@kaapikart.test", "secret1").await?;
        assert!(owner.is_admin);
        assert_eq!(owner.admin_role, AdminRole::SuperAdmin);

        let customer = store.create("Jane", "jane@x.com", "secret1").await?;
        let customer = store.promote_seed_admin(customer).await?;
        assert!(!customer.is_admin);
        Ok(())
    }

    #[tokio::test]
    async fn blank_seed_admin_is_ignored() {
        let store = store(SeedAdminConfig::new("  "));
        assert!(!store.is_seed_admin(""));
        assert!(!store.is_seed_admin("  "));
    }
}
