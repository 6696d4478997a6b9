//! # Domain Types
//!
//! Entities of the coaching center records.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Student      │   │   ClassBatch    │   │      Exam       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (row)       │   │  class_id (row) │   │  exam_id (row)  │       │
//! │  │  student_id     │   │  class_name ◄───┼───┤  class_name     │       │
//! │  │  current_class ─┼──►│  monthly_fee    │   │  total_marks    │       │
//! │  └────────┬────────┘   └─────────────────┘   └────────┬────────┘       │
//! │           │                                           │                 │
//! │           │   ┌─────────────────┐                     │                 │
//! │           ├──►│      Mark       │◄────────────────────┘                 │
//! │           │   │ (student, exam) │  at most one per pair                 │
//! │           │   └─────────────────┘                                       │
//! │           │   ┌─────────────────┐   ┌─────────────────┐                 │
//! │           ├──►│    Payment      │   │ PromotionRecord │◄──┐             │
//! │           │   │ (student,month, │   │  append-only    │   │             │
//! │           │   │  year) unique   │   └─────────────────┘   │             │
//! │           └───────────────────────────────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! - `id` / `exam_id` / `class_id`: SQLite row ids, used for relations where
//!   the legacy screens did (exams, marks)
//! - Business keys: `student_id` (`STU0001`) and `class_name`, shown to the
//!   operator and used as the relation key for students and classes

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::month::Month;

// =============================================================================
// Student
// =============================================================================

/// Enrollment status. Inactive students are hidden from rosters and stats
/// but keep all of their rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
}

/// An enrolled student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Student {
    /// Internal row number; the numeric part of `student_id` comes from it.
    pub id: i64,

    /// Human-readable identifier (`STU0001`). Immutable once assigned.
    pub student_id: String,

    pub name: String,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,

    /// Primary contact number (required).
    pub father_mobile: String,
    pub alternative_mobile: Option<String>,

    /// Name of the class the student is enrolled in.
    pub current_class: String,
    pub section: Option<String>,

    pub status: StudentStatus,
}

impl Student {
    /// Checks if the student shows up on rosters.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }
}

/// The mutable fields of a student, as entered on the admission form.
///
/// Used for both creation and full-overwrite updates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StudentFields {
    pub name: String,
    pub father_name: Option<String>,
    pub mother_name: Option<String>,
    pub father_mobile: String,
    pub alternative_mobile: Option<String>,
    pub current_class: String,
    pub section: Option<String>,
}

// =============================================================================
// Class (Batch)
// =============================================================================

/// A named cohort sharing a monthly fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ClassBatch {
    pub class_id: i64,
    pub class_name: String,
    pub monthly_fee_cents: i64,
}

impl ClassBatch {
    /// Returns the monthly fee as Money.
    #[inline]
    pub fn monthly_fee(&self) -> Money {
        Money::from_cents(self.monthly_fee_cents)
    }
}

// =============================================================================
// Exam
// =============================================================================

/// An exam held for one class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Exam {
    pub exam_id: i64,
    pub class_name: String,
    pub exam_name: String,
    /// Maximum obtainable marks.
    pub total_marks: f64,
    #[ts(as = "String")]
    pub exam_date: NaiveDate,
}

/// Input for creating an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewExam {
    pub class_name: String,
    pub exam_name: String,
    pub total_marks: f64,
    #[ts(as = "String")]
    pub exam_date: NaiveDate,
}

// =============================================================================
// Marks
// =============================================================================

/// A stored mark. At most one per (student, exam).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Mark {
    pub mark_id: i64,
    pub student_id: String,
    pub exam_id: i64,
    pub obtained_marks: f64,
}

/// One line of a student's mark sheet (mark joined with its exam).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StudentMark {
    pub exam_id: i64,
    pub exam_name: String,
    pub total_marks: f64,
    pub obtained_marks: f64,
    #[ts(as = "String")]
    pub exam_date: NaiveDate,
    pub class_name: String,
}

/// One row of an exam's mark-entry roster.
///
/// `obtained_marks` is `None` when nothing has been entered yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct ExamRosterEntry {
    pub student_id: String,
    pub name: String,
    pub obtained_marks: Option<f64>,
}

impl ExamRosterEntry {
    #[inline]
    pub fn is_entered(&self) -> bool {
        self.obtained_marks.is_some()
    }
}

/// A mark cell rejected during batch entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarkRejection {
    pub student_id: String,
    pub input: String,
    pub reason: String,
}

/// Outcome of saving a whole mark-entry grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BatchMarkReport {
    /// Students whose mark was written.
    pub saved: Vec<String>,
    /// Students whose cell was blank (left as "not entered").
    pub skipped: Vec<String>,
    /// Cells that could not be saved, with the reason.
    pub rejected: Vec<MarkRejection>,
}

impl BatchMarkReport {
    #[inline]
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

// =============================================================================
// Payments
// =============================================================================

/// Whether a monthly fee has been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

/// A fee payment for one (student, month, year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub payment_id: i64,
    pub student_id: String,
    /// Class the student was in when the payment was recorded.
    pub class_name: String,
    pub month: Month,
    pub year: i32,
    pub amount_cents: i64,
    pub paid_status: PaymentStatus,
}

impl Payment {
    /// Returns the payment amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewPayment {
    pub student_id: String,
    pub class_name: String,
    pub month: Month,
    pub year: i32,
    pub amount: Money,
    pub status: PaymentStatus,
}

// =============================================================================
// Promotions
// =============================================================================

/// One logged class transition. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct PromotionRecord {
    pub id: i64,
    pub student_id: String,
    pub year: i32,
    pub from_class: String,
    pub to_class: String,
    pub overall_result_summary: String,
}

/// A student a bulk promotion could not move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PromotionFailure {
    pub student_id: String,
    pub reason: String,
}

/// Result of promoting every active student of a class.
///
/// Each student is promoted in its own transaction, so `promoted` and
/// `failures` can both be non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BulkPromotionReport {
    pub from_class: String,
    pub to_class: String,
    pub promoted: Vec<String>,
    pub failures: Vec<PromotionFailure>,
}

impl BulkPromotionReport {
    /// Creates an empty report for a source/target pair.
    pub fn new(from_class: impl Into<String>, to_class: impl Into<String>) -> Self {
        BulkPromotionReport {
            from_class: from_class.into(),
            to_class: to_class.into(),
            promoted: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Number of students actually moved.
    #[inline]
    pub fn promoted_count(&self) -> usize {
        self.promoted.len()
    }
}

// =============================================================================
// Reporting
// =============================================================================

/// Headline numbers for the dashboard, computed fresh on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    /// Calendar year the revenue figures refer to.
    pub year: i32,
    pub active_students: i64,
    pub classes: i64,
    pub exams: i64,
    /// Sum of paid payments in `year`.
    pub revenue_cents: i64,
    /// Number of paid payments in `year`.
    pub paid_payments: i64,
}

impl DashboardSummary {
    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_cents(self.revenue_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
