//! Named database constraints.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Constraints declared on the `accounts` table.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[derive(Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(into = "String", try_from = "String")]
pub enum AccountConstraints {
    #[strum(serialize = "accounts_display_name_not_empty")]
    DisplayNameNotEmpty,
    #[strum(serialize = "accounts_email_format")]
    EmailFormat,
    #[strum(serialize = "accounts_email_lowercase")]
    EmailLowercase,
    #[strum(serialize = "accounts_password_hash_not_empty")]
    PasswordHashNotEmpty,
    #[strum(serialize = "accounts_updated_after_created")]
    UpdatedAfterCreated,
    #[strum(serialize = "accounts_email_address_unique_idx")]
    EmailAddressUnique,
}

impl AccountConstraints {
    /// Parses a constraint name reported by Postgres.
    pub fn new(constraint: &str) -> Option<Self> {
        constraint.parse().ok()
    }

    /// Returns whether the constraint enforces uniqueness.
    #[inline]
    pub fn is_uniqueness(self) -> bool {
        matches!(self, AccountConstraints::EmailAddressUnique)
    }
}

impl From<AccountConstraints> for String {
    #[inline]
    fn from(val: AccountConstraints) -> Self {
        val.to_string()
    }
}

impl TryFrom<String> for AccountConstraints {
    type Error = strum::ParseError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Any constraint this crate knows by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    Account(AccountConstraints),
}

impl ConstraintViolation {
    /// Parses a constraint name reported by Postgres.
    pub fn new(constraint: &str) -> Option<Self> {
        AccountConstraints::new(constraint).map(ConstraintViolation::Account)
    }

    /// Returns whether the violation is a duplicate email address.
    #[inline]
    pub fn is_duplicate_email(self) -> bool {
        matches!(
            self,
            ConstraintViolation::Account(AccountConstraints::EmailAddressUnique)
        )
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_constraint_parses_from_its_name() {
        for constraint in AccountConstraints::iter() {
            assert_eq!(AccountConstraints::new(&constraint.to_string()), Some(constraint));
        }
    }

    #[test]
    fn duplicate_email() {
        let violation = ConstraintViolation::new("accounts_email_address_unique_idx");
        assert!(violation.is_some_and(ConstraintViolation::is_duplicate_email));
        assert!(AccountConstraints::EmailAddressUnique.is_uniqueness());
        assert!(!AccountConstraints::EmailFormat.is_uniqueness());
        assert!(ConstraintViolation::new("orders_pkey").is_none());
    }
}
