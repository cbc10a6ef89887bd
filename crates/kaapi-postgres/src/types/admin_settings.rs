//! Dashboard preferences stored in `accounts.admin_settings`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminSettings {
    pub dashboard_layout: String,
    pub notification_preferences: NotificationPreferences,
    pub theme: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub push: bool,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            dashboard_layout: "default".to_owned(),
            notification_preferences: NotificationPreferences::default(),
            theme: "light".to_owned(),
        }
    }
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
        }
    }
}

impl AdminSettings {
    /// Decodes the JSON column, falling back to defaults for missing keys.
    pub fn from_json(value: &serde_json::Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_column_default() {
        let settings = AdminSettings::from_json(&serde_json::json!({}));
        assert_eq!(settings.dashboard_layout, "default");
        assert_eq!(settings.theme, "light");
        assert!(settings.notification_preferences.email);
        assert!(settings.notification_preferences.push);
    }

    #[test]
    fn stored_values_win() {
        let value = serde_json::json!({
            "theme": "dark",
            "notificationPreferences": { "push": false }
        });
        let settings = AdminSettings::from_json(&value);
        assert_eq!(settings.theme, "dark");
        assert!(!settings.notification_preferences.push);
        assert!(settings.notification_preferences.email);
    }
}
