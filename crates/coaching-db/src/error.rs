//! # Database Error Types
//!
//! Error types for Records Store operations.
//!
//! ## Error Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    What the caller can see                              │
//! │                                                                         │
//! │  not-found    Lookups: Ok(None)                                        │
//! │               Mutations of a missing row: DbError::NotFound            │
//! │                                                                         │
//! │  validation   DbError::Validation(ValidationError) - nothing written   │
//! │                                                                         │
//! │  constraint   DbError::ForeignKeyViolation - referenced student,       │
//! │               exam or class does not exist (or is still referenced)    │
//! │               DbError::UniqueViolation - duplicate class name, ...     │
//! │                                                                         │
//! │  storage      Connection / migration / query / transaction failures    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is retried; every failure goes straight back to the caller.

use coaching_core::ValidationError;
use thiserror::Error;

/// Records Store errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Entity not found in database.
    ///
    /// ## When This Occurs
    /// - Updating, deleting or promoting a student id that does not exist
    /// - Changing the fee of an unknown class
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Input rejected before touching storage.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Creating a class whose name already exists
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Mark for a student or exam that does not exist (anymore)
    /// - Student enrolled into / promoted to an unknown class
    /// - Deleting a class that students or exams still reference
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a UniqueViolation error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// True for the not-found kind.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound { .. })
    }

    /// True for the constraint kind (foreign key or unique).
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            DbError::ForeignKeyViolation { .. } | DbError::UniqueViolation { .. }
        )
    }

    /// True for the validation kind.
    pub fn is_validation(&self) -> bool {
        matches!(self, DbError::Validation(_))
    }
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::RowNotFound    → DbError::NotFound
/// sqlx::Error::Database       → Analyze message for constraint type
/// sqlx::Error::PoolTimedOut   → DbError::PoolExhausted
/// Other                       → DbError::Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Record".to_string(),
                id: "unknown".to_string(),
            },

            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();

                // SQLite constraint messages:
                // "UNIQUE constraint failed: <table>.<column>"
                // "FOREIGN KEY constraint failed"
                if msg.contains("UNIQUE constraint failed") {
                    let field = msg
                        .split("UNIQUE constraint failed: ")
                        .nth(1)
                        .unwrap_or("unknown")
                        .to_string();
                    DbError::UniqueViolation {
                        field,
                        value: "unknown".to_string(),
                    }
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DbError::ForeignKeyViolation {
                        message: msg.to_string(),
                    }
                } else {
                    DbError::QueryFailed(msg.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(DbError::not_found("Student", "STU0009").is_not_found());
        assert!(DbError::duplicate("class_name", "Class 3").is_constraint());
        assert!(DbError::ForeignKeyViolation {
            message: "FOREIGN KEY constraint failed".to_string()
        }
        .is_constraint());
        assert!(DbError::from(ValidationError::required("name")).is_validation());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            DbError::not_found("Student", "STU0009").to_string(),
            "Student not found: STU0009"
        );
        assert_eq!(
            DbError::from(ValidationError::required("father mobile")).to_string(),
            "Invalid input: father mobile is required"
        );
    }
}
