//! # Exam & Payment Statistics
//!
//! Pure helpers on top of counts and rows the store has already fetched.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::Payment;

/// Exam attendance of one student within one class.
///
/// ## Derivation
/// ```text
/// total    = exams ever created for the class
/// attended = marks the student has for those exams
/// missed   = total - attended, floored at 0
/// ```
///
/// `total` counts every exam of the class, including ones held before the
/// student joined or after they left. When `attended > total` the rows
/// contradict each other; `missed` is floored and `inconsistent` is set so
/// callers can surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamStats {
    pub total: i64,
    pub attended: i64,
    pub missed: i64,
    pub inconsistent: bool,
}

impl ExamStats {
    /// Builds stats from raw counts.
    ///
    /// ## Example
    /// ```rust
    /// use coaching_core::ExamStats;
    ///
    /// let stats = ExamStats::from_counts(5, 3);
    /// assert_eq!((stats.total, stats.attended, stats.missed), (5, 3, 2));
    /// assert!(!stats.inconsistent);
    /// ```
    pub fn from_counts(total: i64, attended: i64) -> Self {
        let raw_missed = total - attended;
        ExamStats {
            total,
            attended,
            missed: raw_missed.max(0),
            inconsistent: raw_missed < 0,
        }
    }

    /// Turns the inconsistency flag into an error for callers that must not
    /// proceed on contradictory rows.
    pub fn ensure_consistent(&self) -> CoreResult<()> {
        if self.inconsistent {
            return Err(CoreError::Inconsistent(format!(
                "{} marks recorded for {} exams",
                self.attended, self.total
            )));
        }
        Ok(())
    }
}

/// Sorts payments newest first in calendar order (year, then month number).
///
/// The store returns payment history in its legacy order (year descending,
/// then month *name* descending), which puts "September" before "March".
/// Screens that want calendar order call this explicitly.
pub fn sort_payments_chronologically(payments: &mut [Payment]) {
    payments.sort_by(|a, b| {
        b.year
            .cmp(&a.year)
            .then_with(|| b.month.number().cmp(&a.month.number()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::Month;
    use crate::types::PaymentStatus;

    fn payment(month: Month, year: i32) -> Payment {
        Payment {
            payment_id: 0,
            student_id: "STU0001".to_string(),
            class_name: "Class 5".to_string(),
            month,
            year,
            amount_cents: 50000,
            paid_status: PaymentStatus::Paid,
        }
    }

    #[test]
    fn test_missed_is_difference() {
        let stats = ExamStats::from_counts(5, 3);
        assert_eq!(stats.missed, 2);
        assert!(!stats.inconsistent);

        let none = ExamStats::from_counts(0, 0);
        assert_eq!(none.missed, 0);
        assert!(!none.inconsistent);
    }

    #[test]
    fn test_negative_missed_is_floored_and_flagged() {
        let stats = ExamStats::from_counts(2, 3);
        assert_eq!(stats.missed, 0);
        assert!(stats.inconsistent);
        assert_eq!(
            stats.ensure_consistent().unwrap_err().to_string(),
            "Inconsistent data: 3 marks recorded for 2 exams"
        );
        assert!(ExamStats::from_counts(5, 3).ensure_consistent().is_ok());
    }

    #[test]
    fn test_chronological_sort() {
        let mut rows = vec![
            payment(Month::March, 2026),
            payment(Month::September, 2025),
            payment(Month::December, 2026),
            payment(Month::April, 2026),
        ];
        sort_payments_chronologically(&mut rows);

        let order: Vec<(i32, Month)> = rows.iter().map(|p| (p.year, p.month)).collect();
        assert_eq!(
            order,
            vec![
                (2026, Month::December),
                (2026, Month::April),
                (2026, Month::March),
                (2025, Month::September),
            ]
        );
    }
}
