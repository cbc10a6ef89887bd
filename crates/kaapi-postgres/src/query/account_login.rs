//! Bounded login history.

use std::future::Future;

use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use ipnet::IpNet;
use uuid::Uuid;

use crate::model::{AccountLogin, NewAccountLogin};
use crate::{PgConnection, PgError, PgResult, TRACING_TARGET_QUERY, schema};

/// Number of history entries kept per account.
pub const LOGIN_HISTORY_LIMIT: i64 = 10;

/// Repository for login history.
pub trait AccountLoginRepository {
    /// Records a successful login.
    ///
    /// Inserts the entry, prunes the history down to the newest
    /// [`LOGIN_HISTORY_LIMIT`] rows and stamps `accounts.last_login_at`, all in
    /// one transaction.
    fn record_account_login(
        &mut self,
        account_id: Uuid,
        ip_address: Option<IpNet>,
    ) -> impl Future<Output = PgResult<AccountLogin>> + Send;

    /// Returns the login history, newest first.
    fn list_account_logins(
        &mut self,
        account_id: Uuid,
    ) -> impl Future<Output = PgResult<Vec<AccountLogin>>> + Send;
}

impl AccountLoginRepository for PgConnection {
    async fn record_account_login(
        &mut self,
        account_id: Uuid,
        ip_address: Option<IpNet>,
    ) -> PgResult<AccountLogin> {
        use schema::account_logins::{self, dsl};
        use schema::accounts;

        let new_login = NewAccountLogin {
            account_id,
            ip_address,
        };

        let (login, pruned) = self
            .transaction(|conn| {
                async move {
                    let login = diesel::insert_into(account_logins::table)
                        .values(&new_login)
                        .returning(AccountLogin::as_returning())
                        .get_result(conn)
                        .await?;

                    let keep: Vec<Uuid> = account_logins::table
                        .filter(dsl::account_id.eq(account_id))
                        .order((dsl::logged_in_at.desc(), dsl::id.desc()))
                        .select(dsl::id)
                        .limit(LOGIN_HISTORY_LIMIT)
                        .load(conn)
                        .await?;

                    let pruned = diesel::delete(
                        account_logins::table
                            .filter(dsl::account_id.eq(account_id))
                            .filter(dsl::id.ne_all(keep)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::update(accounts::table.filter(accounts::dsl::id.eq(account_id)))
                        .set(accounts::dsl::last_login_at.eq(diesel::dsl::now))
                        .execute(conn)
                        .await?;

                    Ok::<_, PgError>((login, pruned))
                }
                .scope_boxed()
            })
            .await?;

        tracing::debug!(
            target: TRACING_TARGET_QUERY,
            account_id = %account_id,
            pruned,
            "Login recorded"
        );

        Ok(login)
    }

    async fn list_account_logins(&mut self, account_id: Uuid) -> PgResult<Vec<AccountLogin>> {
        use schema::account_logins::{self, dsl};

        account_logins::table
            .filter(dsl::account_id.eq(account_id))
            .order((dsl::logged_in_at.desc(), dsl::id.desc()))
            .limit(LOGIN_HISTORY_LIMIT)
            .select(AccountLogin::as_select())
            .load(self)
            .await
            .map_err(PgError::from)
    }
}
