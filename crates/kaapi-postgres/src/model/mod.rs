//! Diesel models for querying, inserting and updating records.

mod account;
mod account_login;

pub use account::{Account, NewAccount, UpdateAccount};
pub use account_login::{AccountLogin, NewAccountLogin};
