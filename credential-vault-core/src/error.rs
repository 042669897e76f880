//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use crate::validation::{FieldError, ValidationErrors};

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Field-level validation failure (structured, one entry per offending field)
    #[error("{0}")]
    Validation(ValidationErrors),

    /// A credential with identical values for all content fields already exists
    #[error("{0}")]
    Duplicate(String),

    /// Credential does not exist or is owned by another user
    #[error("Credential not found: {0}")]
    NotFound(i64),

    /// No authenticated user in the calling context
    #[error("Authentication required")]
    Unauthenticated,

    /// Import and export errors (malformed CSV stream, CSV write failure)
    #[error("Import/Export error: {0}")]
    ImportExportError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Non-field validation error (configuration, builder wiring)
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist, etc.) is used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added. **
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Validation(_)
            | Self::Duplicate(_)
            | Self::NotFound(_)
            | Self::Unauthenticated
            | Self::ValidationError(_) => true,
            Self::ImportExportError(_) | Self::StorageError(_) | Self::SerializationError(_) => {
                false
            }
        }
    }

    /// Log this error at the level matching [`Self::is_expected`].
    pub fn log(&self, operation: &str) {
        if self.is_expected() {
            log::warn!("{operation} rejected: {self}");
        } else {
            log::error!("{operation} failed: {self}");
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
