//! # API Error Type
//!
//! Unified error type for back-office commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command Function  →  Result<T, ApiError>                               │
//! │                                                                         │
//! │  Form rejected?    ─── FieldErrors ────────────┐                        │
//! │  Business rule?    ─── CoreError ──────────────┤                        │
//! │  Store failure?    ─── DbError (logged) ───────┼──► ApiError ──► client │
//! │  Sign-in failure?  ─── IdentityError ──────────┘                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store failures are logged in full and reduced to a generic message.
//! Validation failures carry the per-field messages for the form.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::ConfigError;
use crate::identity::IdentityError;
use bizdesk_core::{CoreError, FieldErrors};
use bizdesk_db::DbError;

/// API error returned from commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "Please fix the highlighted fields",
///   "fieldErrors": { "name": "Name is required" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: ErrorCode,

    /// Shown to the user as is.
    pub message: String,

    /// First message per form field, only for validation errors.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,

    /// Form rejected, or a write broke a column rule
    ValidationError,

    DatabaseError,

    /// Selling more than is in stock
    InsufficientStock,

    /// Bad credentials or no session
    Unauthorized,

    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error without field details.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// The message recorded for `field`, if the form rejected it.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }
}

/// Converts form rejections to API errors.
impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError {
            code: ErrorCode::ValidationError,
            message: "Please fix the highlighted fields".to_string(),
            field_errors: errors.messages(),
        }
    }
}

/// Store failures keep their detail in the log. The client sees a fixed
/// message per category.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        let (code, message) = match &err {
            DbError::NotFound { entity, id } => return ApiError::not_found(entity, id),
            DbError::UniqueViolation { field, value } => {
                return ApiError::validation(format!("{} '{}' already exists", field, value))
            }
            DbError::ForeignKeyViolation { .. } => (ErrorCode::ValidationError, "Invalid reference"),
            DbError::CheckViolation { .. } => (ErrorCode::ValidationError, "Value out of range"),
            DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                (ErrorCode::DatabaseError, "Database unavailable")
            }
            DbError::MigrationFailed(_) => (ErrorCode::DatabaseError, "Database schema is out of date"),
            DbError::QueryFailed(_) | DbError::TransactionFailed(_) | DbError::Internal(_) => {
                (ErrorCode::DatabaseError, "Database operation failed")
            }
        };
        tracing::error!(category = err.category(), error = %err, "Store error");
        ApiError::new(code, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                product_name,
                available,
                requested,
            } => ApiError::new(
                ErrorCode::InsufficientStock,
                format!(
                    "Insufficient stock for {}: {} available, {} requested",
                    product_name, available, requested
                ),
            ),
            CoreError::Validation(errors) => errors.into(),
        }
    }
}

impl From<IdentityError> for ApiError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidCredentials => ApiError::unauthorized("Invalid email or password"),
            IdentityError::AlreadyRegistered => {
                ApiError::validation("An account with this email already exists")
            }
            IdentityError::Unavailable(e) => {
                tracing::error!("Identity provider unavailable: {}", e);
                ApiError::internal("Authentication service unavailable")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Failures while opening the back office.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DbError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_core::ValidationError;

    #[test]
    fn test_field_errors_become_validation_error() {
        let mut errors = FieldErrors::new();
        errors.record(ValidationError::Required {
            field: "name".to_string(),
            message: "Name is required".to_string(),
        });

        let api: ApiError = errors.into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.field_error("name"), Some("Name is required"));

        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "VALIDATION_ERROR");
        assert_eq!(json["fieldErrors"]["name"], "Name is required");
    }

    #[test]
    fn test_store_errors_are_generic() {
        let api: ApiError = DbError::PoolExhausted.into();
        assert_eq!(api.message, "Database unavailable");

        let api: ApiError = DbError::QueryFailed("disk I/O error at page 7".to_string()).into();
        assert_eq!(api.code, ErrorCode::DatabaseError);
        assert_eq!(api.message, "Database operation failed");

        let json = serde_json::to_value(&api).unwrap();
        assert!(json.get("fieldErrors").is_none());
    }

    #[test]
    fn test_insufficient_stock_code() {
        let api: ApiError = CoreError::InsufficientStock {
            product_name: "Widget".to_string(),
            available: 3,
            requested: 5,
        }
        .into();
        assert_eq!(api.code, ErrorCode::InsufficientStock);
        assert!(api.message.contains("3 available"));
    }
}
