//! Login history entries.

use diesel::prelude::*;
use ipnet::IpNet;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::account_logins;

/// One successful login.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = account_logins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AccountLogin {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Client address the login originated from, when known.
    pub ip_address: Option<IpNet>,
    pub logged_in_at: Timestamp,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = account_logins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccountLogin {
    pub account_id: Uuid,
    pub ip_address: Option<IpNet>,
}
