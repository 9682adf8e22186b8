//! Errors from the storage layer.
//!
//! sqlx errors are sorted into a handful of cases the back office can act on.
//! SQLite reports constraint failures only through the message text, so the
//! mapping reads the prefix:
//!
//! ```text
//! "UNIQUE constraint failed: products.sku"   → UniqueViolation { field: "products.sku" }
//! "FOREIGN KEY constraint failed"            → ForeignKeyViolation
//! "CHECK constraint failed: stock_quantity"  → CheckViolation
//! RowNotFound                                → NotFound
//! PoolTimedOut                               → PoolExhausted
//! ```

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A row names a customer, product or sale that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A column check failed, e.g. stock going below zero.
    #[error("Constraint violation: {message}")]
    CheckViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

pub type DbResult<T> = Result<T, DbError>;

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Stable snake_case label for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            DbError::NotFound { .. } => "not_found",
            DbError::UniqueViolation { .. } => "unique_violation",
            DbError::ForeignKeyViolation { .. } => "foreign_key_violation",
            DbError::CheckViolation { .. } => "check_violation",
            DbError::ConnectionFailed(_) => "connection_failed",
            DbError::MigrationFailed(_) => "migration_failed",
            DbError::QueryFailed(_) => "query_failed",
            DbError::TransactionFailed(_) => "transaction_failed",
            DbError::PoolExhausted => "pool_exhausted",
            DbError::Internal(_) => "internal",
        }
    }

    fn from_constraint_message(message: &str) -> Self {
        if let Some(column) = message.strip_prefix("UNIQUE constraint failed: ") {
            return DbError::duplicate(column, "unknown");
        }
        if message.starts_with("FOREIGN KEY constraint failed") {
            return DbError::ForeignKeyViolation {
                message: message.to_string(),
            };
        }
        if message.starts_with("CHECK constraint failed") {
            return DbError::CheckViolation {
                message: message.to_string(),
            };
        }
        DbError::QueryFailed(message.to_string())
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => DbError::from_constraint_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}
