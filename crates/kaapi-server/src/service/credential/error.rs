use kaapi_postgres::PgError;

use crate::BoxedError;

/// Result type for credential store operations.
pub type CredentialResult<T, E = CredentialError> = std::result::Result<T, E>;

/// Credential store failures.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// An account with the same email, compared case-insensitively, exists.
    #[error("an account with this email already exists")]
    DuplicateEmail,

    /// The password could not be hashed.
    #[error("password hashing failed: {0}")]
    Hashing(#[source] BoxedError),

    /// The storage backend failed.
    #[error("credential backend failure: {0}")]
    Backend(#[source] BoxedError),
}

impl CredentialError {
    /// Wraps any error as a backend failure.
    pub fn backend(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(error))
    }
}

impl From<PgError> for CredentialError {
    fn from(error: PgError) -> Self {
        let duplicate_email = error
            .constraint_violation()
            .is_some_and(|violation| violation.is_duplicate_email());

        if duplicate_email {
            Self::DuplicateEmail
        } else {
            Self::backend(error)
        }
    }
}
