use crate::api::ApiError;
use crate::error::AppError;

/// Turn an error into the message shown to the user.
///
/// Server-side field violations and client-side validation failures are listed
/// one per line under the headline message.
pub fn describe_error(error: &AppError) -> String {
    match error {
        AppError::Api(ApiError::Unauthorized(details)) => {
            format!("{} Use `login` to sign in again.", details.message)
        }
        AppError::Api(api_error) => match api_error.details() {
            Some(details) if !details.validation_errors.is_empty() => {
                let mut message = details.message.clone();
                for violation in &details.validation_errors {
                    message.push_str(&format!("\n  • {}: {}", violation.field, violation.message));
                }
                message
            }
            Some(details) => details.message.clone(),
            None => api_error.to_string(),
        },
        AppError::Validation(errors) => {
            let mut message = String::from("Please fix the following:");
            for error in errors.errors() {
                message.push_str(&format!("\n  • {}", error));
            }
            message
        }
        AppError::NotSignedIn => "You need to sign in first. Use `login <email>`.".to_string(),
        AppError::Session(e) => format!("Could not update the stored session: {}", e),
        AppError::Io(e) => format!("Could not read from or write to the terminal: {}", e),
        AppError::Usage(message) => message.clone(),
        AppError::Cancelled => "Request cancelled.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::classify_error;
    use crate::validation::{FieldError, ValidationErrors, ValidationReason};

    #[test]
    fn test_server_violations_are_listed() {
        let body = r#"{"message":"Invalid data","validationErrors":[{"field":"value","message":"too low"}]}"#;
        let error = AppError::Api(classify_error(400, body, "/topup"));

        assert_eq!(describe_error(&error), "Invalid data\n  • value: too low");
    }

    #[test]
    fn test_unauthorized_points_to_login() {
        let error = AppError::Api(classify_error(401, "", "/topup/history"));
        assert!(describe_error(&error).ends_with("Use `login` to sign in again."));
    }

    #[test]
    fn test_rejected_envelope_shows_backend_message() {
        let error = AppError::Api(ApiError::Rejected {
            status: "error".to_string(),
            message: "Proveedor no disponible".to_string(),
        });
        assert_eq!(describe_error(&error), "Proveedor no disponible");
    }

    #[test]
    fn test_io_failure_is_not_a_usage_error() {
        let error: AppError = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed").into();
        assert!(matches!(error, AppError::Io(_)));
        assert_eq!(
            describe_error(&error),
            "Could not read from or write to the terminal: stdin closed"
        );
    }

    #[test]
    fn test_client_validation_is_listed() {
        let error = AppError::Validation(ValidationErrors(vec![FieldError {
            field: "supplierId",
            reason: ValidationReason::UnknownSupplier,
        }]));

        assert_eq!(
            describe_error(&error),
            "Please fix the following:\n  • supplierId is not a supported supplier"
        );
    }
}
