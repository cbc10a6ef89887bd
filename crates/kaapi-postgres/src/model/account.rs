//! Account model backing the credential store.
//!
//! - [`Account`] is a full row, including the password hash.
//! - [`NewAccount`] is inserted on registration.
//! - [`UpdateAccount`] carries partial updates; `None` fields are left as is.

use diesel::prelude::*;
use jiff_diesel::Timestamp;
use uuid::Uuid;

use crate::schema::accounts;
use crate::types::{AdminPermissions, AdminRole, AdminSettings};

/// Persisted user account.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Unique account identifier.
    pub id: Uuid,
    /// Trimmed display name.
    pub display_name: String,
    /// Trimmed, lowercased email address.
    pub email_address: String,
    /// bcrypt hash of the password. Never the plaintext.
    pub password_hash: String,
    /// Whether the account may call admin-gated routes.
    pub is_admin: bool,
    /// Administrative role, `none` for customers.
    pub admin_role: AdminRole,
    /// Encoded [`AdminPermissions`].
    pub admin_permissions: serde_json::Value,
    /// Encoded [`AdminSettings`].
    pub admin_settings: serde_json::Value,
    /// Deactivated accounts cannot log in and their tokens are rejected.
    pub is_active: bool,
    /// Timestamp of the most recent successful login.
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Data for creating a new account.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    pub display_name: String,
    pub email_address: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub admin_role: AdminRole,
}

/// Data for updating an account.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UpdateAccount {
    pub display_name: Option<String>,
    pub is_admin: Option<bool>,
    pub admin_role: Option<AdminRole>,
    pub admin_permissions: Option<serde_json::Value>,
    pub admin_settings: Option<serde_json::Value>,
    pub is_active: Option<bool>,
}

impl Account {
    /// Returns the decoded permission flags.
    pub fn permissions(&self) -> AdminPermissions {
        AdminPermissions::from_json(&self.admin_permissions)
    }

    /// Returns the decoded dashboard settings.
    pub fn settings(&self) -> AdminSettings {
        AdminSettings::from_json(&self.admin_settings)
    }

    /// Returns whether the account can authenticate at all.
    #[inline]
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Returns whether the account may call admin-gated routes.
    #[inline]
    pub fn can_admin(&self) -> bool {
        self.is_active && self.is_admin
    }
}

impl NewAccount {
    /// Creates a regular customer account.
    pub fn new(
        display_name: impl Into<String>,
        email_address: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email_address: email_address.into(),
            password_hash: password_hash.into(),
            is_admin: false,
            admin_role: AdminRole::Customer,
        }
    }

    /// Marks the account as a super administrator.
    pub fn with_super_admin(mut self) -> Self {
        self.is_admin = true;
        self.admin_role = AdminRole::SuperAdmin;
        self
    }
}

impl UpdateAccount {
    /// Grants or revokes admin access without touching the role.
    pub fn admin_flag(is_admin: bool) -> Self {
        Self {
            is_admin: Some(is_admin),
            ..Default::default()
        }
    }

    /// Sets the role and derives the admin flag from it.
    pub fn admin_role(role: AdminRole) -> Self {
        Self {
            is_admin: Some(role.is_admin()),
            admin_role: Some(role),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_is_a_customer() {
        let account = NewAccount::new("Jane", "jane@x.com", "$2b$10$hash");
        assert!(!account.is_admin);
        assert_eq!(account.admin_role, AdminRole::Customer);

        let admin = account.with_super_admin();
        assert!(admin.is_admin);
        assert_eq!(admin.admin_role, AdminRole::SuperAdmin);
    }

    #[test]
    fn admin_flag_leaves_role_alone() {
        let update = UpdateAccount::admin_flag(true);
        assert_eq!(update.is_admin, Some(true));
        assert_eq!(update.admin_role, None);

        let update = UpdateAccount::admin_flag(false);
        assert_eq!(update.is_admin, Some(false));
        assert_eq!(update.admin_role, None);
    }

    #[test]
    fn admin_role_derives_flag() {
        assert_eq!(
            UpdateAccount::admin_role(AdminRole::Customer).is_admin,
            Some(false)
        );
        assert_eq!(
            UpdateAccount::admin_role(AdminRole::ContentAdmin).is_admin,
            Some(true)
        );
    }
}
