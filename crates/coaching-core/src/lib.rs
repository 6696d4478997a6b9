//! # coaching-core: Domain Logic for the Coaching Center Records
//!
//! Pure types and rules shared by the Records Store and whatever screen layer
//! sits on top of it. Nothing in here touches the disk, the network or the clock.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Coaching Center Records                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Screens (external collaborator)                 │   │
//! │  │   Rosters ──► Student profile ──► Marks entry ──► Fees          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ coaching-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   stats   │  │ validation│  │   │
//! │  │   │  Student  │  │   Money   │  │ ExamStats │  │  parsing  │  │   │
//! │  │   │   Exam    │  │           │  │           │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                coaching-db (Records Store)                      │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Student, ClassBatch, Exam, Mark, Payment, ...)
//! - [`month`] - Calendar month names used by fee payments
//! - [`money`] - Money type with integer arithmetic
//! - [`stats`] - Exam attendance statistics and payment ordering helpers
//! - [`report`] - Exam result report model and text rendering
//! - [`error`] - Domain error types
//! - [`validation`] - Field checks and parsing of operator input
//!
//! ## Example Usage
//!
//! ```rust
//! use coaching_core::validation::{format_student_id, parse_amount};
//!
//! assert_eq!(format_student_id(1), "STU0001");
//!
//! let fee = parse_amount("monthly fee", "500.50").unwrap();
//! assert_eq!(fee.cents(), 50050);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod month;
pub mod report;
pub mod stats;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use money::Money;
pub use month::Month;
pub use report::ExamReport;
pub use stats::ExamStats;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of every human-readable student identifier (`STU0001`).
pub const STUDENT_ID_PREFIX: &str = "STU";

/// Minimum number of digits after the prefix; longer sequences are not truncated.
pub const STUDENT_ID_WIDTH: usize = 4;

/// Key of the shared admin credential in the configuration table.
pub const ADMIN_PASSWORD_KEY: &str = "admin_password";

/// Maximum length accepted for free-text names (students, classes, exams).
pub const MAX_NAME_LEN: usize = 200;
