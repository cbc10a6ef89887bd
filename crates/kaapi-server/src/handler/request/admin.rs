//! Account administration request types.

use kaapi_postgres::types::{AdminPermissions, AdminPermissionsPatch, AdminRole, AdminSettings};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validations::{present, validation_error};

const MAX_LAYOUT_LEN: usize = 64;
const MAX_THEME_LEN: usize = 32;

/// Request payload for changing an account's role and permissions.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateAdminStatus {
    /// New role. Also sets the admin flag: any role but `none` grants it.
    pub admin_role: Option<AdminRole>,
    /// Permission flags to change. Absent flags keep their value.
    pub admin_permissions: Option<AdminPermissionsPatch>,
}

impl UpdateAdminStatus {
    /// Applies the patch to the current permissions.
    pub fn merge_permissions(&self, current: AdminPermissions) -> Option<AdminPermissions> {
        self.admin_permissions
            .as_ref()
            .map(|patch| current.merge(patch))
    }
}

/// Partial notification preferences.
#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferencesPatch {
    pub email: Option<bool>,
    pub push: Option<bool>,
}

/// Request payload for changing the caller's dashboard settings.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
#[validate(schema(function = "validate_update_settings"))]
pub struct UpdateAdminSettings {
    pub dashboard_layout: Option<String>,
    pub notification_preferences: Option<NotificationPreferencesPatch>,
    pub theme: Option<String>,
}

impl UpdateAdminSettings {
    /// Returns a copy of `current` with every present field applied.
    pub fn merge(&self, mut current: AdminSettings) -> AdminSettings {
        if let Some(layout) = &self.dashboard_layout {
            current.dashboard_layout = layout.trim().to_owned();
        }

        if let Some(theme) = &self.theme {
            current.theme = theme.trim().to_owned();
        }

        if let Some(preferences) = self.notification_preferences {
            let current = &mut current.notification_preferences;
            current.email = preferences.email.unwrap_or(current.email);
            current.push = preferences.push.unwrap_or(current.push);
        }

        current
    }
}

/// Checks a provided text setting after trimming.
fn check_setting(value: Option<&str>, max_len: usize) -> Result<(), ValidationError> {
    let Some(value) = value else {
        return Ok(());
    };

    match present(Some(value)) {
        None => Err(validation_error("required", "Settings values cannot be empty")),
        Some(value) if value.chars().count() > max_len => {
            Err(validation_error("length", "Settings value is too long"))
        }
        Some(_) => Ok(()),
    }
}

fn validate_update_settings(request: &UpdateAdminSettings) -> Result<(), ValidationError> {
    check_setting(request.dashboard_layout.as_deref(), MAX_LAYOUT_LEN)?;
    check_setting(request.theme.as_deref(), MAX_THEME_LEN)
}
