//! Client-side checks run before a request is sent.
//!
//! Every rule is evaluated and all failures are returned together so a form can
//! flag each bad field at once.

use std::fmt;
use thiserror::Error;

use crate::config::Config;
use crate::models::{LoginRequest, RegisterRequest, TopupRequest};

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_SPECIALS: &str = "@$!%*?&";
const NAME_MIN_LENGTH: usize = 2;
const NAME_MAX_LENGTH: usize = 100;
const EMAIL_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationReason {
    #[error("is required")]
    Required,
    #[error("must start with {prefix} and have exactly {length} digits")]
    PhonePattern { prefix: String, length: usize },
    #[error("must be at least {min}")]
    BelowMinimum { min: i64 },
    #[error("must be at most {max}")]
    AboveMaximum { max: i64 },
    #[error("is not a supported supplier")]
    UnknownSupplier,
    #[error("is not a valid email address")]
    InvalidEmail,
    #[error("must be at most {max} characters")]
    TooLong { max: usize },
    #[error("must be between {min} and {max} characters")]
    LengthOutOfRange { min: usize, max: usize },
    #[error("may only contain letters and spaces")]
    LettersOnly,
    #[error("must be at least {min} characters")]
    TooShort { min: usize },
    #[error("needs a lowercase letter, an uppercase letter, a digit and one of {specials}")]
    WeakPassword { specials: &'static str },
    #[error("does not match the password")]
    Mismatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// All failed checks for one submission
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_errors(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    #[cfg(test)]
    pub fn has(&self, field: &str, reason: &ValidationReason) -> bool {
        self.0.iter().any(|e| e.field == field && &e.reason == reason)
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn fail(&mut self, field: &'static str, reason: ValidationReason) {
        self.0.push(FieldError { field, reason });
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

/// Check phone number, amount bounds and supplier before `POST /topup`.
pub fn validate_topup(request: &TopupRequest, config: &Config) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    let phone = request.cell_phone.trim();
    if phone.is_empty() {
        errors.fail("cellPhone", ValidationReason::Required);
    } else if !is_valid_phone(phone, &config.phone_prefix, config.phone_length) {
        errors.fail(
            "cellPhone",
            ValidationReason::PhonePattern {
                prefix: config.phone_prefix.clone(),
                length: config.phone_length,
            },
        );
    }

    if request.value < config.min_amount {
        errors.fail("value", ValidationReason::BelowMinimum { min: config.min_amount });
    } else if request.value > config.max_amount {
        errors.fail("value", ValidationReason::AboveMaximum { max: config.max_amount });
    }

    let supplier = request.supplier_id.trim();
    if supplier.is_empty() {
        errors.fail("supplierId", ValidationReason::Required);
    } else if !config.valid_supplier_ids.iter().any(|id| id == supplier) {
        errors.fail("supplierId", ValidationReason::UnknownSupplier);
    }

    errors.finish()
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();
    check_email(&mut errors, &request.email);
    if request.password.is_empty() {
        errors.fail("password", ValidationReason::Required);
    }
    errors.finish()
}

pub fn validate_registration(
    request: &RegisterRequest,
    confirm_password: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    let name = request.name.trim();
    let name_len = name.chars().count();
    if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&name_len) {
        errors.fail(
            "name",
            ValidationReason::LengthOutOfRange {
                min: NAME_MIN_LENGTH,
                max: NAME_MAX_LENGTH,
            },
        );
    } else if !name.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        errors.fail("name", ValidationReason::LettersOnly);
    }

    check_email(&mut errors, &request.email);

    let password = &request.password;
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.fail("password", ValidationReason::TooShort { min: PASSWORD_MIN_LENGTH });
    } else if !is_strong_password(password) {
        errors.fail(
            "password",
            ValidationReason::WeakPassword {
                specials: PASSWORD_SPECIALS,
            },
        );
    }

    if confirm_password.is_empty() {
        errors.fail("confirmPassword", ValidationReason::Required);
    } else if confirm_password != password {
        errors.fail("confirmPassword", ValidationReason::Mismatch);
    }

    errors.finish()
}

fn is_valid_phone(phone: &str, prefix: &str, length: usize) -> bool {
    phone.len() == length && phone.starts_with(prefix) && phone.bytes().all(|b| b.is_ascii_digit())
}

fn check_email(errors: &mut Collector, email: &str) {
    let email = email.trim();
    if email.is_empty() {
        errors.fail("email", ValidationReason::Required);
    } else if email.chars().count() > EMAIL_MAX_LENGTH {
        errors.fail("email", ValidationReason::TooLong { max: EMAIL_MAX_LENGTH });
    } else if !is_valid_email(email) {
        errors.fail("email", ValidationReason::InvalidEmail);
    }
}

/// `local@domain.tld`: one `@`, no whitespace, a dot with text on both sides in the domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn is_strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topup(phone: &str, value: i64, supplier: &str) -> TopupRequest {
        TopupRequest {
            cell_phone: phone.to_string(),
            value,
            supplier_id: supplier.to_string(),
        }
    }

    #[test]
    fn test_valid_topup() {
        let config = Config::default();
        assert!(validate_topup(&topup("3001234567", 5000, "8753"), &config).is_ok());
    }

    #[test]
    fn test_phone_must_start_with_three() {
        let config = Config::default();
        let err = validate_topup(&topup("1234567890", 5000, "8753"), &config).unwrap_err();

        assert_eq!(err.errors().len(), 1);
        assert_eq!(err.errors()[0].field, "cellPhone");
        assert!(matches!(err.errors()[0].reason, ValidationReason::PhonePattern { .. }));
    }

    #[test]
    fn test_phone_length_and_digits() {
        let config = Config::default();
        assert!(validate_topup(&topup("300123456", 5000, "8753"), &config).is_err());
        assert!(validate_topup(&topup("30012345678", 5000, "8753"), &config).is_err());
        assert!(validate_topup(&topup("30012a4567", 5000, "8753"), &config).is_err());
    }

    #[test]
    fn test_amount_bounds() {
        let config = Config::default();
        let below = validate_topup(&topup("3001234567", 999, "8753"), &config).unwrap_err();
        assert!(below.has("value", &ValidationReason::BelowMinimum { min: 1000 }));

        let above = validate_topup(&topup("3001234567", 100_001, "8753"), &config).unwrap_err();
        assert!(above.has("value", &ValidationReason::AboveMaximum { max: 100_000 }));

        assert!(validate_topup(&topup("3001234567", 1000, "8753"), &config).is_ok());
        assert!(validate_topup(&topup("3001234567", 100_000, "8753"), &config).is_ok());
    }

    #[test]
    fn test_unknown_supplier() {
        let config = Config::default();
        let err = validate_topup(&topup("3001234567", 5000, "0000"), &config).unwrap_err();
        assert!(err.has("supplierId", &ValidationReason::UnknownSupplier));
    }

    #[test]
    fn test_every_failure_is_reported() {
        let config = Config::default();
        let err = validate_topup(&topup("", 10, "0000"), &config).unwrap_err();

        let fields: Vec<&str> = err.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["cellPhone", "value", "supplierId"]);
        assert!(err.to_string().contains("cellPhone is required"));
    }

    #[test]
    fn test_login_checks() {
        let ok = LoginRequest {
            email: "ana@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(&ok).is_ok());

        let bad = LoginRequest {
            email: "ana@example".to_string(),
            password: String::new(),
        };
        let err = validate_login(&bad).unwrap_err();
        assert!(err.has("email", &ValidationReason::InvalidEmail));
        assert!(err.has("password", &ValidationReason::Required));
    }

    #[test]
    fn test_registration_checks() {
        let request = RegisterRequest {
            name: "Ana María".to_string(),
            email: "ana@example.com".to_string(),
            password: "Secreta1!".to_string(),
        };
        assert!(validate_registration(&request, "Secreta1!").is_ok());

        let weak = RegisterRequest {
            name: "A".to_string(),
            password: "secreta12".to_string(),
            ..request.clone()
        };
        let err = validate_registration(&weak, "otra").unwrap_err();
        assert!(err.has("name", &ValidationReason::LengthOutOfRange { min: 2, max: 100 }));
        assert!(err.has("password", &ValidationReason::WeakPassword { specials: PASSWORD_SPECIALS }));
        assert!(err.has("confirmPassword", &ValidationReason::Mismatch));

        let digits = RegisterRequest {
            name: "R2D2".to_string(),
            ..request
        };
        let err = validate_registration(&digits, "Secreta1!").unwrap_err();
        assert!(err.has("name", &ValidationReason::LettersOnly));
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b@c.co"));
        assert!(!is_valid_email("@b.co"));
    }
}
