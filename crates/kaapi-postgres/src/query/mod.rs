//! Repository traits implemented on [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

pub mod account;
pub mod account_login;

pub use account::{AccountRepository, AccountStatistics, RECENT_LOGIN_WINDOW};
pub use account_login::{AccountLoginRepository, LOGIN_HISTORY_LIMIT};
