//! Administrative role enumeration.

use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Administrative role held by an account.
///
/// Corresponds to the `ADMIN_ROLE` PostgreSQL enum. [`AdminRole::Customer`]
/// (stored as `none`) marks a regular customer account.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash)]
#[derive(Serialize, Deserialize, DbEnum, Display, EnumIter, EnumString)]
#[ExistingTypePath = "crate::schema::sql_types::AdminRole"]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AdminRole {
    #[db_rename = "none"]
    #[serde(rename = "none")]
    #[strum(serialize = "none")]
    #[default]
    Customer,

    /// Unrestricted administrator.
    #[db_rename = "super_admin"]
    SuperAdmin,

    /// Manages catalog content.
    #[db_rename = "content_admin"]
    ContentAdmin,

    /// Manages orders and fulfilment.
    #[db_rename = "order_admin"]
    OrderAdmin,

    /// Handles customer support.
    #[db_rename = "support_admin"]
    SupportAdmin,
}

impl AdminRole {
    /// Returns whether the role grants administrative access.
    #[inline]
    pub fn is_admin(self) -> bool {
        !matches!(self, AdminRole::Customer)
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_customer_is_not_admin() {
        let admins: Vec<_> = AdminRole::iter().filter(|r| r.is_admin()).collect();
        assert_eq!(admins.len(), 4);
        assert!(!AdminRole::Customer.is_admin());
        assert_eq!(AdminRole::Customer.to_string(), "none");
    }

    #[test]
    fn string_forms_match_column_values() {
        assert_eq!(AdminRole::SuperAdmin.to_string(), "super_admin");
        assert_eq!("order_admin".parse::<AdminRole>().ok(), Some(AdminRole::OrderAdmin));
        assert_eq!(
            serde_json::to_string(&AdminRole::SupportAdmin).ok().as_deref(),
            Some("\"support_admin\"")
        );
    }
}
