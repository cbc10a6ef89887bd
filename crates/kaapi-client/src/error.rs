//! Error types for kaapi-client.

use std::borrow::Cow;
use std::io;

use thiserror::Error;

/// Result type alias for kaapi-client operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Message shown when a success response lacks the expected fields.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// Message shown when login is attempted with a blank field.
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Email and password are required";

/// Failure of an auth API call or a session transition.
#[derive(Debug, Error)]
pub enum Error {
    /// The server answered with a non-success status.
    #[error("server responded with {status}")]
    Server {
        status: u16,
        /// The `message` field of the error body, if there was one.
        message: Option<String>,
    },

    /// The request went out but no response came back.
    #[error("no response from server: {0}")]
    NoResponse(#[source] reqwest::Error),

    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A success response did not carry the expected body.
    #[error("invalid response from server")]
    InvalidResponse,

    /// Rejected locally before any request was made.
    #[error("{0}")]
    Validation(&'static str),

    /// Reading or writing the persisted token failed.
    #[error("token storage error: {0}")]
    Storage(#[from] io::Error),

    /// A logout or newer session change happened while the call was in flight.
    #[error("session changed while the request was in flight")]
    Superseded,
}

impl Error {
    /// Classifies a transport error.
    ///
    /// Anything that got as far as the network counts as a missing response.
    /// Failures before the request left the process are generic.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_builder() {
            Self::Request(Box::new(error))
        } else if error.is_connect() || error.is_timeout() || error.is_request() {
            Self::NoResponse(error)
        } else {
            Self::Request(Box::new(error))
        }
    }

    /// Returns the HTTP status for server errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns whether the server rejected the credentials or token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401))
    }
}

/// Auth action a failure happened in.
///
/// Login and registration show different fallback messages for the same
/// kind of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    Login,
    Register,
}

impl AuthAction {
    fn server_fallback(self) -> &'static str {
        match self {
            Self::Login => "Login failed",
            Self::Register => "Registration failed",
        }
    }

    fn no_response(self) -> &'static str {
        match self {
            Self::Login => "No response from server. Please check your connection.",
            Self::Register => "No response from server. Please try again.",
        }
    }

    fn generic(self) -> &'static str {
        match self {
            Self::Login => "An error occurred during login",
            Self::Register => "An error occurred during registration.",
        }
    }

    /// Picks the message shown to the user for `error`.
    ///
    /// In order: the server's own message, the no-response message, the
    /// generic message.
    pub fn user_message(self, error: &Error) -> Cow<'static, str> {
        match error {
            Error::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Cow::Owned(message.clone()),
            Error::Server { .. } => Cow::Borrowed(self.server_fallback()),
            Error::NoResponse(_) => Cow::Borrowed(self.no_response()),
            Error::InvalidResponse => Cow::Borrowed(INVALID_RESPONSE_MESSAGE),
            Error::Validation(message) => Cow::Borrowed(*message),
            Error::Request(_) | Error::Storage(_) | Error::Superseded => {
                Cow::Borrowed(self.generic())
            }
        }
    }
}

/// A failed login or registration, carrying the message to display.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub action: AuthAction,
    pub message: Cow<'static, str>,
    #[source]
    pub cause: Error,
}

impl AuthFailure {
    pub fn new(action: AuthAction, cause: Error) -> Self {
        Self {
            action,
            message: action.user_message(&cause),
            cause,
        }
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(message: Option<&str>) -> Error {
        Error::Server {
            status: 400,
            message: message.map(str::to_owned),
        }
    }

    #[test]
    fn server_message_wins() {
        let failure = AuthFailure::new(AuthAction::Login, server(Some("Invalid credentials")));
        assert_eq!(failure.message(), "Invalid credentials");
        assert_eq!(failure.to_string(), "Invalid credentials");
    }

    #[test]
    fn server_without_message_uses_fallback() {
        assert_eq!(
            AuthAction::Login.user_message(&server(None)),
            "Login failed"
        );
        assert_eq!(
            AuthAction::Register.user_message(&server(Some("  "))),
            "Registration failed"
        );
    }

    #[test]
    fn local_failures_are_generic() {
        let cause = Error::Request("bad url".into());
        assert_eq!(
            AuthAction::Login.user_message(&cause),
            "An error occurred during login"
        );
        assert_eq!(
            AuthAction::Register.user_message(&cause),
            "An error occurred during registration."
        );
    }

    #[test]
    fn validation_and_invalid_response_are_verbatim() {
        assert_eq!(
            AuthAction::Login.user_message(&Error::Validation(MISSING_CREDENTIALS_MESSAGE)),
            MISSING_CREDENTIALS_MESSAGE
        );
        assert_eq!(
            AuthAction::Login.user_message(&Error::InvalidResponse),
            INVALID_RESPONSE_MESSAGE
        );
    }

    #[test]
    fn unauthorized_is_detected() {
        let error = Error::Server {
            status: 401,
            message: None,
        };
        assert!(error.is_unauthorized());
        assert!(!server(None).is_unauthorized());
        assert!(!Error::InvalidResponse.is_unauthorized());
    }
}
