//! Conversions from service layer errors.

use super::http_error::{Error as HttpError, ErrorKind};
use crate::service::TokenError;

const TRACING_TARGET: &str = "kaapi_server::handler::service";

impl From<crate::Error> for HttpError<'static> {
    fn from(error: crate::Error) -> Self {
        tracing::error!(
            target: TRACING_TARGET,
            error = %error,
            kind = %error.kind(),
            "Service operation failed"
        );

        ErrorKind::InternalServerError.with_context(error.to_string())
    }
}

impl From<TokenError> for HttpError<'static> {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::Expired | TokenError::Invalid(_) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Bearer token rejected"
                );

                ErrorKind::MalformedAuthToken
                    .with_context(error.to_string())
                    .with_resource("authentication")
            }
            TokenError::Signing(_) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %error,
                    "Token signing failed"
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
    fn expired_tokens_are_malformed() {
        let error = HttpError::from(TokenError::Expired);
        assert_eq!(error.kind(), ErrorKind::MalformedAuthToken);
        assert_eq!(error.user_message(), "Not authorized, token failed");
    }

    #[test]
    fn service_errors_are_internal() {
        let error = HttpError::from(crate::Error::config("JWT_SECRET must be set"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert!(error.message().is_none());
        assert!(error.context().is_some_and(|c| c.contains("JWT_SECRET")));
    }
}
