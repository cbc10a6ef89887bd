//! Authentication request types.
//!
//! Fields are optional at the serde level so that missing fields reach the
//! validators and produce the documented messages instead of a generic
//! deserialization error.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::validations::{MIN_PASSWORD_LEN, is_valid_email, present, validation_error};

/// Request payload for registration.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_register"))]
pub struct Register {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Register {
    /// Trimmed display name. Empty before validation has passed.
    pub fn name(&self) -> &str {
        present(self.name.as_deref()).unwrap_or_default()
    }

    /// Trimmed email. Empty before validation has passed.
    pub fn email(&self) -> &str {
        present(self.email.as_deref()).unwrap_or_default()
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

fn validate_register(request: &Register) -> Result<(), ValidationError> {
    let name = present(request.name.as_deref());
    let email = present(request.email.as_deref());
    let password = request.password.as_deref().filter(|p| !p.is_empty());

    let (Some(_), Some(email), Some(password)) = (name, email, password) else {
        return Err(validation_error("required", "All fields are required"));
    };

    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(validation_error(
            "password_length",
            "Password must be at least 6 characters long",
        ));
    }

    if !is_valid_email(email) {
        return Err(validation_error("email", "Please enter a valid email"));
    }

    Ok(())
}

/// Request payload for login.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_login"))]
pub struct Login {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl Login {
    pub fn email(&self) -> &str {
        present(self.email.as_deref()).unwrap_or_default()
    }

    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}

fn validate_login(request: &Login) -> Result<(), ValidationError> {
    let email = present(request.email.as_deref());
    let password = request.password.as_deref().filter(|p| !p.is_empty());

    if email.is_none() || password.is_none() {
        return Err(validation_error(
            "required",
            "Email and password are required",
        ));
    }

    Ok(())
}

/// Request payload for granting admin access by email.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_update_admin"))]
pub struct UpdateAdmin {
    pub email: Option<String>,
}

impl UpdateAdmin {
    pub fn email(&self) -> &str {
        present(self.email.as_deref()).unwrap_or_default()
    }
}

fn validate_update_admin(request: &UpdateAdmin) -> Result<(), ValidationError> {
    match present(request.email.as_deref()) {
        Some(_) => Ok(()),
        None => Err(validation_error("required", "Email is required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> Register {
        Register {
            name: Some(name.to_owned()),
            email: Some(email.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    fn message(result: Result<(), validator::ValidationErrors>) -> Option<String> {
        let errors = result.err()?;
        let field_errors = errors.field_errors();
        let error = field_errors.values().next()?.first()?;
        error.message.as_ref().map(|m| m.to_string())
    }

    #[test]
    fn register_checks_in_order() {
        let missing = Register {
            name: Some("Jane".into()),
            ..Default::default()
        };
        assert_eq!(
            message(missing.validate()).as_deref(),
            Some("All fields are required")
        );

        let blank = register("  ", "jane@x.com", "secret1");
        assert_eq!(
            message(blank.validate()).as_deref(),
            Some("All fields are required")
        );

        let short = register("Jane", "not-an-email", "12345");
        assert_eq!(
            message(short.validate()).as_deref(),
            Some("Password must be at least 6 characters long")
        );

        let bad_email = register("Jane", "not-an-email", "secret1");
        assert_eq!(
            message(bad_email.validate()).as_deref(),
            Some("Please enter a valid email")
        );

        assert!(register("Jane", "jane@x.com", "secret1").validate().is_ok());
    }

    #[test]
    fn register_accessors_trim() {
        let request = register(" Jane ", " jane@x.com ", " secret1 ");
        assert_eq!(request.name(), "Jane");
        assert_eq!(request.email(), "jane@x.com");
        assert_eq!(request.password(), " secret1 ");
    }

    #[test]
    fn login_requires_both_fields() {
        let request: Login = serde_json::from_str(r#"{"email":"jane@x.com"}"#).unwrap_or_default();
        assert_eq!(
            message(request.validate()).as_deref(),
            Some("Email and password are required")
        );

        let request: Login =
            serde_json::from_str(r#"{"email":"jane@x.com","password":"wrong"}"#).unwrap_or_default();
        assert!(request.validate().is_ok());
    }
}
