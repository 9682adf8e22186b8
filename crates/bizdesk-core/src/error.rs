//! # Error Types
//!
//! Domain-specific error types for bizdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bizdesk-core errors (this file)                                       │
//! │  ├── ValidationError  - One violated rule on one field                 │
//! │  ├── FieldErrors      - field name → first ValidationError             │
//! │  └── CoreError        - Business rule rejections                       │
//! │                                                                         │
//! │  bizdesk-db errors (separate crate)                                    │
//! │  └── DbError          - Store operation failures                       │
//! │                                                                         │
//! │  Back-office errors (in app)                                           │
//! │  └── ApiError         - What the web client sees (serialized)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `ValidationError` carries the exact human-readable message the
//! form displays next to the offending field; its variant records which
//! kind of rule failed.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule rejections.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Trying to sell more units than are in stock. Nothing was written.
    #[error("Insufficient stock for {product_name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_name: String,
        available: i64,
        requested: i64,
    },

    /// Form input failed its schema.
    #[error("Validation failed: {0}")]
    Validation(#[from] FieldErrors),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single violated rule.
///
/// `Display` yields the user-facing message only, so a `FieldErrors` map can
/// be rendered field by field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, TS)]
#[ts(export)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{message}")]
    Required { field: String, message: String },

    /// Value is shorter than the minimum length.
    #[error("{message}")]
    TooShort {
        field: String,
        min: usize,
        message: String,
    },

    /// Value is longer than the maximum length.
    #[error("{message}")]
    TooLong {
        field: String,
        max: usize,
        message: String,
    },

    /// Numeric value is below the minimum or above the maximum.
    #[error("{message}")]
    OutOfRange { field: String, message: String },

    /// A whole number was required.
    #[error("{message}")]
    NotInteger { field: String, message: String },

    /// Value does not match the field's pattern (email, UUID, sku, ...).
    #[error("{message}")]
    InvalidFormat { field: String, message: String },

    /// Value is not one of the allowed literals.
    #[error("{message}")]
    NotAllowed {
        field: String,
        allowed: Vec<String>,
        message: String,
    },

    /// The raw value has the wrong type (text where a number is expected).
    #[error("{message}")]
    WrongType { field: String, message: String },
}

impl ValidationError {
    /// The field this error belongs to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field, .. }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::NotInteger { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. }
            | ValidationError::WrongType { field, .. } => field,
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> &str {
        match self {
            ValidationError::Required { message, .. }
            | ValidationError::TooShort { message, .. }
            | ValidationError::TooLong { message, .. }
            | ValidationError::OutOfRange { message, .. }
            | ValidationError::NotInteger { message, .. }
            | ValidationError::InvalidFormat { message, .. }
            | ValidationError::NotAllowed { message, .. }
            | ValidationError::WrongType { message, .. } => message,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Field-level errors for one form submission.
///
/// Holds at most one error per field. The first error recorded for a field
/// wins; later ones are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, ValidationError>);

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records an error unless the field already has one.
    pub fn record(&mut self, error: ValidationError) {
        self.0.entry(error.field().to_string()).or_insert(error);
    }

    /// Returns the error recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&ValidationError> {
        self.0.get(field)
    }

    /// Returns the message recorded for `field`.
    pub fn message(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(ValidationError::message)
    }

    /// Returns true if no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields that failed.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over `(field, error)` in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.0.iter().map(|(field, err)| (field.as_str(), err))
    }

    /// Field name → message, as the form renders it.
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, err)| (field.clone(), err.message().to_string()))
            .collect()
    }

    /// Finishes a schema run: `Ok(value)` when nothing failed.
    pub fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, err) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, err)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn required(field: &str, message: &str) -> ValidationError {
        ValidationError::Required {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_name: "Espresso Beans".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Espresso Beans: available 3, requested 5"
        );
    }

    #[test]
    fn test_first_error_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.record(required("name", "Name is required"));
        errors.record(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
            message: "Name must be less than 100 characters".to_string(),
        });

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.message("name"), Some("Name is required"));
        assert!(matches!(
            errors.get("name"),
            Some(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        errors.record(required("price", "Price must be greater than 0"));
        errors.record(required("name", "Product name is required"));

        assert_eq!(
            errors.to_string(),
            "name: Product name is required; price: Price must be greater than 0"
        );
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let mut errors = FieldErrors::new();
        errors.record(required("name", "Name is required"));

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["name"]["kind"], "required");
        assert_eq!(json["name"]["message"], "Name is required");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let mut errors = FieldErrors::new();
        errors.record(required("sku", "sku is required"));
        let core_err: CoreError = errors.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
