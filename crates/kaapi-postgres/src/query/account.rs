//! Account repository backing the credential store.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Account, NewAccount, UpdateAccount};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Window in which a login counts as recent.
pub const RECENT_LOGIN_WINDOW: SignedDuration = SignedDuration::from_hours(24);

/// Aggregate account counts for the admin dashboard.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatistics {
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub admin_accounts: i64,
    /// Accounts that logged in within [`RECENT_LOGIN_WINDOW`].
    pub recent_logins: i64,
}

impl AccountStatistics {
    /// Returns the earliest login time that still counts as recent.
    pub fn recent_login_cutoff(now: Timestamp) -> Timestamp {
        now.checked_sub(RECENT_LOGIN_WINDOW).unwrap_or(Timestamp::MIN)
    }
}

/// Repository for account database operations.
pub trait AccountRepository {
    /// Inserts a new account.
    ///
    /// The display name is trimmed and the email trimmed and lowercased. A
    /// duplicate email fails on `accounts_email_address_unique_idx`, see
    /// [`PgError::constraint_violation`].
    fn create_account(
        &mut self,
        new_account: NewAccount,
    ) -> impl Future<Output = PgResult<Account>> + Send;

    fn find_account_by_id(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Finds an account by email, case-insensitively.
    fn find_account_by_email(
        &mut self,
        email: &str,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Lists all accounts, newest first.
    fn list_accounts(&mut self) -> impl Future<Output = PgResult<Vec<Account>>> + Send;

    /// Applies a partial update. Returns `None` if the account does not exist.
    fn update_account(
        &mut self,
        account_id: Uuid,
        updates: UpdateAccount,
    ) -> impl Future<Output = PgResult<Option<Account>>> + Send;

    /// Permanently removes an account and its login history.
    ///
    /// Returns whether a row was deleted.
    fn delete_account(&mut self, account_id: Uuid) -> impl Future<Output = PgResult<bool>> + Send;

    fn account_statistics(&mut self) -> impl Future<Output = PgResult<AccountStatistics>> + Send;
}

impl AccountRepository for PgConnection {
    async fn create_account(&mut self, mut new_account: NewAccount) -> PgResult<Account> {
        use schema::accounts;

        new_account.display_name = new_account.display_name.trim().to_owned();
        new_account.email_address = new_account.email_address.trim().to_lowercase();

        let account = diesel::insert_into(accounts::table)
            .values(&new_account)
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .map_err(PgError::from)?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = %account.id,
            "Account created"
        );

        Ok(account)
    }

    async fn find_account_by_id(&mut self, account_id: Uuid) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::id.eq(account_id))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn find_account_by_email(&mut self, email: &str) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .filter(dsl::email_address.eq(email.trim().to_lowercase()))
            .select(Account::as_select())
            .first(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn list_accounts(&mut self) -> PgResult<Vec<Account>> {
        use schema::accounts::{self, dsl};

        accounts::table
            .order((dsl::created_at.desc(), dsl::id.desc()))
            .select(Account::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }

    async fn update_account(
        &mut self,
        account_id: Uuid,
        mut updates: UpdateAccount,
    ) -> PgResult<Option<Account>> {
        use schema::accounts::{self, dsl};

        if let Some(name) = updates.display_name.as_mut() {
            *name = name.trim().to_owned();
        }

        diesel::update(accounts::table.filter(dsl::id.eq(account_id)))
            .set((&updates, dsl::updated_at.eq(diesel::dsl::now)))
            .returning(Account::as_returning())
            .get_result(self)
            .await
            .optional()
            .map_err(PgError::from)
    }

    async fn delete_account(&mut self, account_id: Uuid) -> PgResult<bool> {
        use schema::accounts::{self, dsl};

        let deleted = diesel::delete(accounts::table.filter(dsl::id.eq(account_id)))
            .execute(self)
            .await
            .map_err(PgError::from)?;

        if deleted > 0 {
            tracing::info!(
                target: TRACING_TARGET_QUERY,
                account_id = %account_id,
                "Account deleted"
            );
        }

        Ok(deleted > 0)
    }

    async fn account_statistics(&mut self) -> PgResult<AccountStatistics> {
        use schema::accounts::{self, dsl};

        let total_accounts = accounts::table
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let active_accounts = accounts::table
            .filter(dsl::is_active.eq(true))
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let admin_accounts = accounts::table
            .filter(dsl::is_admin.eq(true))
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        let cutoff = AccountStatistics::recent_login_cutoff(Timestamp::now());
        let recent_logins = accounts::table
            .filter(dsl::last_login_at.ge(jiff_diesel::Timestamp::from(cutoff)))
            .count()
            .get_result::<i64>(self)
            .await
            .map_err(PgError::from)?;

        Ok(AccountStatistics {
            total_accounts,
            active_accounts,
            admin_accounts,
            recent_logins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_login_cutoff_is_a_day_back() {
        let now = Timestamp::from_second(1_750_000_000).expect("valid timestamp");
        let cutoff = AccountStatistics::recent_login_cutoff(now);
        assert_eq!(now.duration_since(cutoff), SignedDuration::from_hours(24));

        assert_eq!(
            AccountStatistics::recent_login_cutoff(Timestamp::MIN),
            Timestamp::MIN
        );
    }
}
