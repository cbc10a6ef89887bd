//! Conversions from credential store errors.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::service::CredentialError;

const TRACING_TARGET: &str = "kaapi_server::handler::credential";

impl From<CredentialError> for HttpError<'static> {
    fn from(error: CredentialError) -> Self {
        match error {
            CredentialError::DuplicateEmail => ErrorKind::BadRequest
                .with_message("User already exists")
                .with_resource("users"),
            CredentialError::Hashing(_) | CredentialError::Backend(_) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Credential store failed"
                );

                ErrorKind::InternalServerError.with_context(error.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_is_a_bad_request() {
        let error = HttpError::from(CredentialError::DuplicateEmail);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.user_message(), "User already exists");
    }

    #[test]
    fn backend_failures_hide_details() {
        let source = std::io::Error::other("connection refused");
        let error = HttpError::from(CredentialError::backend(source));

        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(error.user_message(), "Internal server error");
        assert!(error.context().is_some_and(|c| c.contains("connection refused")));
    }
}
