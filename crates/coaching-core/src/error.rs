//! # Error Types
//!
//! Domain-specific error types for coaching-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  coaching-core errors (this file)                                      │
//! │  ├── CoreError        - Domain inconsistencies                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  coaching-db errors (separate crate)                                   │
//! │  └── DbError          - not-found / validation / constraint / storage  │
//! │                                                                         │
//! │  Flow: ValidationError → DbError::Validation → caller (screen)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending field in every message
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Stored rows contradict each other.
    ///
    /// ## When This Occurs
    /// - More marks recorded for a class's exams than exams exist
    #[error("Inconsistent data: {0}")]
    Inconsistent(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the store boundary, before anything is written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Operator typed something that is not a number.
    ///
    /// ## User Workflow
    /// ```text
    /// Marks entry grid: "4O" (letter O)
    ///      │
    ///      ▼
    /// parse_marks("4O")
    ///      │
    ///      ▼
    /// InvalidNumber { field: "obtained marks", input: "4O" }
    ///      │
    ///      ▼
    /// Screen highlights the cell instead of silently dropping it
    /// ```
    #[error("{field} must be a number, got '{input}'")]
    InvalidNumber { field: String, input: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., unknown month name, too many decimals).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
