//! Registration input rules.

use animestream_core::config::AuthConfig;
use animestream_core::error::{AppError, FieldError};

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 20;

/// Checks a username/password pair before registration.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    password_min_length: usize,
}

impl CredentialValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            password_min_length: config.password_min_length,
        }
    }

    /// Validate both fields, reporting every violation at once.
    ///
    /// Callers pass already-trimmed input.
    pub fn validate(&self, username: &str, password: &str) -> Result<(), AppError> {
        let mut errors = Vec::new();

        let len = username.chars().count();
        if len < USERNAME_MIN || len > USERNAME_MAX {
            errors.push(FieldError::new(
                "username",
                format!("Username must be {USERNAME_MIN}-{USERNAME_MAX} characters long"),
            ));
        }
        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            errors.push(FieldError::new(
                "username",
                "Username may only contain letters, digits and underscores",
            ));
        }

        if password.chars().count() < self.password_min_length {
            errors.push(FieldError::new(
                "password",
                format!(
                    "Password must be at least {} characters long",
                    self.password_min_length
                ),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation_fields(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use animestream_core::error::ErrorKind;

    fn validator() -> CredentialValidator {
        CredentialValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_valid_credentials() {
        assert!(validator().validate("abc", "password123").is_ok());
        assert!(validator().validate("user_name_2024", "12345678").is_ok());
    }

    #[test]
    fn test_short_password_rejected_regardless_of_username() {
        for username in ["abc", "a", "bad name!", ""] {
            let err = validator().validate(username, "short").unwrap_err();
            assert_eq!(err.kind, ErrorKind::Validation);
            assert!(err.field_errors.iter().any(|e| e.field == "password"));
        }
    }

    #[test]
    fn test_all_violations_collected() {
        let err = validator().validate("a!", "x").unwrap_err();
        let fields: Vec<_> = err.field_errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "username", "password"]);
    }

    #[test]
    fn test_username_bounds() {
        assert!(validator().validate("ab", "password123").is_err());
        assert!(validator().validate(&"a".repeat(20), "password123").is_ok());
        assert!(validator().validate(&"a".repeat(21), "password123").is_err());
    }
}
