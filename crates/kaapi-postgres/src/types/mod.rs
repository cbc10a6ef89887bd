//! Enumerations, JSON column payloads and constraint names.

mod admin_permissions;
mod admin_role;
mod admin_settings;
mod constraints;

pub use admin_permissions::{AdminPermissions, AdminPermissionsPatch};
pub use admin_role::AdminRole;
pub use admin_settings::{AdminSettings, NotificationPreferences};
pub use constraints::{AccountConstraints, ConstraintViolation};
