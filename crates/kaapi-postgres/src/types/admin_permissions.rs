//! Fine-grained administrator permissions stored in `accounts.admin_permissions`.

use serde::{Deserialize, Serialize};

/// Permission flags of an administrator. All flags default to `false`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminPermissions {
    pub can_manage_users: bool,
    pub can_manage_products: bool,
    pub can_manage_orders: bool,
    pub can_view_analytics: bool,
    pub can_manage_discounts: bool,
    pub can_manage_inventory: bool,
    pub can_manage_support: bool,
    pub can_manage_settings: bool,
}

/// Partial permission update; absent flags keep their current value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminPermissionsPatch {
    pub can_manage_users: Option<bool>,
    pub can_manage_products: Option<bool>,
    pub can_manage_orders: Option<bool>,
    pub can_view_analytics: Option<bool>,
    pub can_manage_discounts: Option<bool>,
    pub can_manage_inventory: Option<bool>,
    pub can_manage_support: Option<bool>,
    pub can_manage_settings: Option<bool>,
}

impl AdminPermissions {
    /// Decodes the JSON column, falling back to defaults for missing keys.
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    /// Encodes the permissions for the JSON column.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Returns a copy with every flag present in `patch` applied.
    #[must_use]
    pub fn merge(mut self, patch: &AdminPermissionsPatch) -> Self {
        let apply = |current: &mut bool, update: Option<bool>| {
            if let Some(update) = update {
                *current = update;
            }
        };

        apply(&mut self.can_manage_users, patch.can_manage_users);
        apply(&mut self.can_manage_products, patch.can_manage_products);
        apply(&mut self.can_manage_orders, patch.can_manage_orders);
        apply(&mut self.can_view_analytics, patch.can_view_analytics);
        apply(&mut self.can_manage_discounts, patch.can_manage_discounts);
        apply(&mut self.can_manage_inventory, patch.can_manage_inventory);
        apply(&mut self.can_manage_support, patch.can_manage_support);
        apply(&mut self.can_manage_settings, patch.can_manage_settings);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_only_touches_present_flags() {
        let current = AdminPermissions {
            can_manage_users: true,
            can_view_analytics: true,
            ..Default::default()
        };
        let patch = AdminPermissionsPatch {
            can_manage_users: Some(false),
            can_manage_orders: Some(true),
            ..Default::default()
        };

        let merged = current.merge(&patch);
        assert!(!merged.can_manage_users);
        assert!(merged.can_manage_orders);
        assert!(merged.can_view_analytics);
        assert!(!merged.can_manage_settings);
    }

    #[test]
    fn json_uses_camel_case_keys() {
        let json = AdminPermissions {
            can_manage_inventory: true,
            ..Default::default()
        }
        .to_json();

        assert_eq!(json["canManageInventory"], serde_json::Value::Bool(true));
        assert_eq!(json["canManageUsers"], serde_json::Value::Bool(false));
    }

    #[test]
    fn partial_json_decodes_with_defaults() {
        let value = serde_json::json!({ "canManageSupport": true });
        let permissions = AdminPermissions::from_json(&value);
        assert!(permissions.can_manage_support);
        assert!(!permissions.can_manage_products);

        assert_eq!(
            AdminPermissions::from_json(&serde_json::Value::Null),
            AdminPermissions::default()
        );
    }
}
