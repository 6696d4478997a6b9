//! # Mark Repository
//!
//! Obtained marks per (student, exam), the mark-entry roster and per-exam
//! aggregates.
//!
//! ## One Mark Per Pair
//! ```text
//! upsert_mark("STU0001", 7, 55.0)   → INSERT          marks: (STU0001, 7, 55.0)
//! upsert_mark("STU0001", 7, 61.5)   → ON CONFLICT     marks: (STU0001, 7, 61.5)
//! ```
//! The unique index on `(student_id, exam_id)` backs the upsert, so a pair
//! can never hold two rows whatever order the writes arrive in.

use coaching_core::validation::{parse_marks, validate_obtained_marks};
use coaching_core::{
    BatchMarkReport, ExamRosterEntry, ExamStats, Mark, MarkRejection, StudentMark,
};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Repository for mark operations.
#[derive(Debug, Clone)]
pub struct MarkRepository {
    pool: SqlitePool,
}

impl MarkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MarkRepository { pool }
    }

    /// Stores a student's mark for an exam, replacing any earlier value.
    ///
    /// ## Errors
    /// * `Validation` - negative or non-finite value
    /// * `ForeignKeyViolation` - student or exam does not exist
    pub async fn upsert_mark(&self, student_id: &str, exam_id: i64, obtained: f64) -> DbResult<()> {
        let obtained = validate_obtained_marks(obtained)?;

        debug!(student_id = %student_id, exam_id, obtained, "Upserting mark");

        sqlx::query(
            r#"
            INSERT INTO marks (student_id, exam_id, obtained_marks)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(student_id, exam_id)
            DO UPDATE SET obtained_marks = excluded.obtained_marks
            "#,
        )
        .bind(student_id.trim())
        .bind(exam_id)
        .bind(obtained)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// The stored mark for a (student, exam) pair, if one was entered.
    pub async fn get_mark(&self, student_id: &str, exam_id: i64) -> DbResult<Option<Mark>> {
        let mark = sqlx::query_as::<_, Mark>(
            "SELECT mark_id, student_id, exam_id, obtained_marks
             FROM marks WHERE student_id = ?1 AND exam_id = ?2",
        )
        .bind(student_id.trim())
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(mark)
    }

    /// Saves a whole mark-entry grid of raw operator input.
    ///
    /// ## Per Cell
    /// - blank → skipped, stays "not entered"
    /// - not a non-negative number → rejected with the reason
    /// - unknown student → rejected
    /// - otherwise upserted
    ///
    /// Valid cells are saved even when others are rejected.
    ///
    /// ## Errors
    /// * `NotFound` - exam does not exist
    pub async fn record_marks<I, S, T>(&self, exam_id: i64, entries: I) -> DbResult<BatchMarkReport>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let exists: Option<i64> = sqlx::query_scalar("SELECT exam_id FROM exams WHERE exam_id = ?1")
            .bind(exam_id)
            .fetch_optional(&self.pool)
            .await?;
        if exists.is_none() {
            return Err(DbError::not_found("Exam", exam_id.to_string()));
        }

        let mut report = BatchMarkReport::default();

        for (student_id, input) in entries {
            let student_id = student_id.as_ref().trim().to_string();
            let input = input.as_ref();

            if input.trim().is_empty() {
                report.skipped.push(student_id);
                continue;
            }

            let value = match parse_marks(input) {
                Ok(value) => value,
                Err(e) => {
                    report.rejected.push(MarkRejection {
                        student_id,
                        input: input.trim().to_string(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.upsert_mark(&student_id, exam_id, value).await {
                Ok(()) => report.saved.push(student_id),
                Err(DbError::ForeignKeyViolation { .. }) => {
                    report.rejected.push(MarkRejection {
                        student_id,
                        input: input.trim().to_string(),
                        reason: "unknown student".to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        if report.has_rejections() {
            warn!(
                exam_id,
                rejected = report.rejected.len(),
                "Some marks were not saved"
            );
        }
        info!(
            exam_id,
            saved = report.saved.len(),
            skipped = report.skipped.len(),
            "Mark entry saved"
        );
        Ok(report)
    }

    /// Every mark a student has, joined with its exam, oldest exam first.
    pub async fn marks_for_student(&self, student_id: &str) -> DbResult<Vec<StudentMark>> {
        let marks = sqlx::query_as::<_, StudentMark>(
            r#"
            SELECT e.exam_id, e.exam_name, e.total_marks, m.obtained_marks,
                   e.exam_date, e.class_name
            FROM marks m
            INNER JOIN exams e ON e.exam_id = m.exam_id
            WHERE m.student_id = ?1
            ORDER BY e.exam_date, e.exam_id
            "#,
        )
        .bind(student_id.trim())
        .fetch_all(&self.pool)
        .await?;

        debug!(student_id = %student_id, count = marks.len(), "Loaded student marks");
        Ok(marks)
    }

    /// The mark-entry roster of an exam: every active student currently in
    /// the exam's class, with their mark or `None`.
    ///
    /// An unknown exam yields an empty roster.
    pub async fn marks_by_exam(&self, exam_id: i64) -> DbResult<Vec<ExamRosterEntry>> {
        let roster = sqlx::query_as::<_, ExamRosterEntry>(
            r#"
            SELECT s.student_id, s.name, m.obtained_marks
            FROM students s
            INNER JOIN exams e ON e.class_name = s.current_class
            LEFT JOIN marks m ON m.student_id = s.student_id AND m.exam_id = e.exam_id
            WHERE e.exam_id = ?1 AND s.status = 'active'
            ORDER BY s.id
            "#,
        )
        .bind(exam_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(exam_id, count = roster.len(), "Loaded exam roster");
        Ok(roster)
    }

    /// Highest recorded mark for an exam, 0 when none.
    pub async fn highest_mark(&self, exam_id: i64) -> DbResult<f64> {
        let highest: f64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(obtained_marks), 0.0) FROM marks WHERE exam_id = ?1",
        )
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(highest)
    }

    /// Mean of the recorded marks for an exam, 0 when none.
    pub async fn average_mark(&self, exam_id: i64) -> DbResult<f64> {
        let average: f64 = sqlx::query_scalar(
            "SELECT COALESCE(AVG(obtained_marks), 0.0) FROM marks WHERE exam_id = ?1",
        )
        .bind(exam_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(average)
    }

    /// Exam attendance of a student within a class.
    ///
    /// `total` counts every exam the class ever had, including exams from
    /// before the student joined. See [`ExamStats`].
    pub async fn exam_stats(&self, student_id: &str, class_name: &str) -> DbResult<ExamStats> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM exams WHERE class_name = ?1")
            .bind(class_name.trim())
            .fetch_one(&self.pool)
            .await?;

        let attended: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM marks m
            INNER JOIN exams e ON e.exam_id = m.exam_id
            WHERE m.student_id = ?1 AND e.class_name = ?2
            "#,
        )
        .bind(student_id.trim())
        .bind(class_name.trim())
        .fetch_one(&self.pool)
        .await?;

        let stats = ExamStats::from_counts(total, attended);
        if let Err(e) = stats.ensure_consistent() {
            warn!(
                student_id = %student_id,
                class = %class_name,
                error = %e,
                "Missed count floored at 0"
            );
        }

        Ok(stats)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
