//! Conversion from request validation failures.
//!
//! Validators that attach a message decide the exact text returned to the
//! client. Anything else becomes a generic bad request with the failing
//! fields listed in the context.

use validator::{ValidationErrors, ValidationErrorsKind};

use super::http_error::{Error as HttpError, ErrorKind};

impl From<ValidationErrors> for HttpError<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<&str> = errors.errors().keys().map(|k| k.as_ref()).collect();
        fields.sort_unstable();

        let context = format!("validation failed for: {}", fields.join(", "));
        let message = fields.iter().find_map(|field| {
            match errors.errors().get(*field) {
                Some(ValidationErrorsKind::Field(field_errors)) => field_errors
                    .iter()
                    .find_map(|e| e.message.as_ref().map(|m| m.to_string())),
                _ => None,
            }
        });

        let error = ErrorKind::BadRequest.with_context(context);
        match message {
            Some(message) => error.with_message(message),
            None => error,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use validator::ValidationError;

    use super::*;

    #[test]
    fn custom_message_is_used_verbatim() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "__all__",
            ValidationError::new("required")
                .with_message(Cow::Borrowed("All fields are required")),
        );

        let error = HttpError::from(errors);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.user_message(), "All fields are required");
    }

    #[test]
    fn errors_without_message_are_generic() {
        let mut errors = ValidationErrors::new();
        errors.add("email", ValidationError::new("email"));

        let error = HttpError::from(errors);
        assert_eq!(error.user_message(), "Invalid request");
        assert_eq!(error.context(), Some("validation failed for: email"));
    }
}
