//! Field-level validation rules
//!
//! Every check is pure: it inspects a candidate value and reports a typed
//! error, never touching stored state. Absent values always pass.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static PAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("valid PAN regex"));

/// Minimum digit count for phone numbers
pub const MIN_PHONE_DIGITS: usize = 10;

/// Field validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid {field} format!")]
    InvalidEmail { field: &'static str },

    #[error("{field} must be at least 10 digits!")]
    InvalidPhone { field: &'static str },

    #[error("Invalid PAN format! Format: ABCDE1234F")]
    InvalidPan,

    #[error("Department code must be unique!")]
    DuplicateCode(String),

    #[error("Employee code {0} is already in use!")]
    DuplicateEmployeeCode(String),

    #[error("Employee code cannot be changed once assigned!")]
    ImmutableCode,

    #[error("{0} is required!")]
    MissingField(&'static str),
}

/// Check a `local@domain.tld` shaped address.
pub fn validate_email(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !EMAIL_RE.is_match(v) => Err(ValidationError::InvalidEmail { field }),
        _ => Ok(()),
    }
}

/// Check a phone number: digits only, at least ten of them.
pub fn validate_phone(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.len() < MIN_PHONE_DIGITS || !v.chars().all(|c| c.is_ascii_digit()) => {
            Err(ValidationError::InvalidPhone { field })
        }
        _ => Ok(()),
    }
}

/// Check a PAN tax id after uppercasing it.
pub fn validate_pan(value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if !PAN_RE.is_match(&v.to_uppercase()) => Err(ValidationError::InvalidPan),
        _ => Ok(()),
    }
}

/// Fails iff a *different* department already carries `code`.
pub fn validate_department_code_unique<'a, I>(
    code: &str,
    self_id: Option<i64>,
    existing: I,
) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = (i64, &'a str)>,
{
    let taken = existing
        .into_iter()
        .any(|(id, other)| other == code && Some(id) != self_id);
    if taken {
        Err(ValidationError::DuplicateCode(code.to_string()))
    } else {
        Ok(())
    }
}

/// Reject blank required text fields.
pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails_pass() {
        for email in ["john.doe@company.com", "a+b%c@mail.example.co", "x_y-z@d-o.io"] {
            assert_eq!(validate_email("work email", Some(email)), Ok(()), "{}", email);
        }
    }

    #[test]
    fn test_malformed_emails_fail() {
        for email in ["john.company.com", "john@company", "john@company.c", "@company.com", ""] {
            assert!(validate_email("work email", Some(email)).is_err(), "{}", email);
        }
    }

    #[test]
    fn test_email_error_names_field() {
        let err = validate_email("personal email", Some("nope")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid personal email format!");
    }

    #[test]
    fn test_absent_values_pass() {
        assert!(validate_email("work email", None).is_ok());
        assert!(validate_phone("Work phone", None).is_ok());
        assert!(validate_pan(None).is_ok());
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("Personal mobile", Some("98765432")).is_err());
        assert!(validate_phone("Personal mobile", Some("9876543210")).is_ok());
        assert!(validate_phone("Personal mobile", Some("919876543210")).is_ok());
        assert!(validate_phone("Personal mobile", Some("987654321A")).is_err());
        assert!(validate_phone("Personal mobile", Some("+919876543210")).is_err());
        assert!(validate_phone("Personal mobile", Some("")).is_err());
    }

    #[test]
    fn test_phone_error_message() {
        let err = validate_phone("Work phone", Some("123")).unwrap_err();
        assert_eq!(err.to_string(), "Work phone must be at least 10 digits!");
    }

    #[test]
    fn test_pan_rules() {
        assert!(validate_pan(Some("ABCDE1234F")).is_ok());
        assert!(validate_pan(Some("abcde1234f")).is_ok());
        assert!(validate_pan(Some("ABCD1234F")).is_err());
        assert!(validate_pan(Some("ABCDE12345")).is_err());
        assert!(validate_pan(Some("ABCDE1234FG")).is_err());
    }

    #[test]
    fn test_department_code_uniqueness() {
        let existing = [(1, "ENG"), (2, "HR")];
        assert!(validate_department_code_unique("OPS", None, existing).is_ok());
        assert_eq!(
            validate_department_code_unique("ENG", None, existing),
            Err(ValidationError::DuplicateCode("ENG".to_string()))
        );
        // Updating a department keeps its own code
        assert!(validate_department_code_unique("ENG", Some(1), existing).is_ok());
        assert!(validate_department_code_unique("ENG", Some(2), existing).is_err());
    }

    #[test]
    fn test_required() {
        assert!(validate_required("Name", "Jane").is_ok());
        assert_eq!(
            validate_required("Name", "   "),
            Err(ValidationError::MissingField("Name"))
        );
    }
}
