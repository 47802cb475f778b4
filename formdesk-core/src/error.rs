//! Error types for Formdesk core operations

use thiserror::Error;

/// Errors raised while decoding backend payloads into records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Expected a JSON object for a record")]
    NotAnObject,

    #[error("Expected a JSON array of records")]
    NotAnArray,

    #[error("Record is missing its identifier field '{field}'")]
    MissingId { field: String },
}

/// Client-side form validation failures. Raised before any request is sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("{label} is required")]
    RequiredFieldMissing { field: String, label: String },

    #[error("{label} must be a number")]
    NotANumber { field: String, label: String },

    #[error("{label} must be a date (YYYY-MM-DD or MM/DD/YYYY)")]
    NotADate { field: String, label: String },

    #[error("The form is not open")]
    NotOpen,
}

impl FormError {
    /// Field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            FormError::RequiredFieldMissing { field, .. }
            | FormError::NotANumber { field, .. }
            | FormError::NotADate { field, .. } => Some(field),
            FormError::NotOpen => None,
        }
    }
}

/// Master error type for core operations.
#[derive(Debug, Clone, Error)]
pub enum FormdeskError {
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    #[error("Validation error: {0}")]
    Form(#[from] FormError),
}

/// Result type alias for core operations.
pub type FormdeskResult<T> = Result<T, FormdeskError>;
