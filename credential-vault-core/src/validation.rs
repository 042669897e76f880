//! Credential schema validation and password strength scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{AccountType, CredentialFields, CredentialStatus, CsvCredentialRow};

const PASSWORD_STRENGTH_MESSAGE: &str = "Password strength: 0-5 (Weak to Strong)";

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// camelCase field key, as used in CSV headers and JSON payloads.
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field '{}': {}", self.field, self.message)
    }
}

/// All field errors found for one record, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any error concerns `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Password strength score, 0-5.
///
/// One point each for: a lowercase letter, an uppercase letter, a digit, a
/// character outside `[A-Za-z0-9]`, and a length of at least 8.
#[must_use]
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
        password.chars().count() >= 8,
    ];
    checks.iter().fold(0, |score, &hit| score + u8::from(hit))
}

fn check_text_fields(fields: &CredentialFields, errors: &mut ValidationErrors) {
    if fields.platform.is_empty() {
        errors.push("platform", "Platform Name is required");
    }
    if fields.username.is_empty() {
        errors.push("username", "Username is required");
    }
    if fields.password.is_empty() {
        errors.push("password", "Password is required");
    }
    if password_strength(&fields.password) == 0 {
        errors.push("password", PASSWORD_STRENGTH_MESSAGE);
    }
    if fields.account_identity.is_empty() {
        errors.push("accountIdentity", "Account Identity is required");
    }
}

impl CredentialFields {
    /// Check required fields and password strength.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_text_fields(self, &mut errors);
        errors.into_result()
    }
}

/// Trim a cell and treat a blank one like a missing one.
fn non_blank(cell: Option<String>) -> Option<String> {
    cell.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Secrets are taken verbatim; only an empty cell counts as missing.
fn verbatim(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.is_empty())
}

impl CsvCredentialRow {
    /// Platform label used in import reports.
    #[must_use]
    pub fn platform_label(&self) -> String {
        non_blank(self.platform.clone()).unwrap_or_else(|| "unknown".to_string())
    }

    /// Apply import defaults and validate.
    ///
    /// Cells are trimmed except `password` and `specialPin`, whose whitespace is
    /// kept. Missing platform/username/password/accountIdentity become empty
    /// strings (and then fail validation), missing accountType is
    /// `#1-TopPriority`, missing status is `Active`, other missing cells are `None`.
    pub fn into_fields(self) -> Result<CredentialFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let account_type = match non_blank(self.account_type) {
            None => AccountType::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.push("accountType", "Invalid account type");
                AccountType::default()
            }),
        };
        let status = match non_blank(self.status) {
            None => CredentialStatus::default(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                errors.push("status", "Invalid status");
                CredentialStatus::default()
            }),
        };

        let fields = CredentialFields {
            platform: non_blank(self.platform).unwrap_or_default(),
            account_name: non_blank(self.account_name),
            url: non_blank(self.url),
            username: non_blank(self.username).unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            account_identity: non_blank(self.account_identity).unwrap_or_default(),
            account_type,
            status,
            special_pin: verbatim(self.special_pin),
            recovery_number: non_blank(self.recovery_number),
            recovery_email: non_blank(self.recovery_email),
        };

        let mut all = ValidationErrors::default();
        check_text_fields(&fields, &mut all);
        all.0.extend(errors.0);
        all.into_result().map(|()| fields)
    }
}
