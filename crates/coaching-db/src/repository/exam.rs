//! # Exam Repository
//!
//! Exams belong to a class by name. Duplicate exam names within a class are
//! allowed; the row id tells them apart.

use coaching_core::validation::validate_new_exam;
use coaching_core::{Exam, NewExam};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Repository for exam operations.
#[derive(Debug, Clone)]
pub struct ExamRepository {
    pool: SqlitePool,
}

impl ExamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ExamRepository { pool }
    }

    /// Creates an exam and returns its id.
    ///
    /// ## Errors
    /// * `Validation` - blank names, total marks not above zero
    /// * `ForeignKeyViolation` - class does not exist
    pub async fn create(&self, exam: &NewExam) -> DbResult<i64> {
        let exam = validate_new_exam(exam)?;

        let result = sqlx::query(
            "INSERT INTO exams (class_name, exam_name, total_marks, exam_date)
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&exam.class_name)
        .bind(&exam.exam_name)
        .bind(exam.total_marks)
        .bind(exam.exam_date)
        .execute(&self.pool)
        .await?;

        let exam_id = result.last_insert_rowid();
        info!(
            exam_id,
            class = %exam.class_name,
            exam = %exam.exam_name,
            "Exam created"
        );
        Ok(exam_id)
    }

    /// Exams of a class in creation order.
    pub async fn list_by_class(&self, class_name: &str) -> DbResult<Vec<Exam>> {
        let exams = sqlx::query_as::<_, Exam>(
            "SELECT exam_id, class_name, exam_name, total_marks, exam_date
             FROM exams
             WHERE class_name = ?1
             ORDER BY exam_id",
        )
        .bind(class_name.trim())
        .fetch_all(&self.pool)
        .await?;

        debug!(class = %class_name, count = exams.len(), "Listed exams");
        Ok(exams)
    }

    pub async fn get(&self, exam_id: i64) -> DbResult<Option<Exam>> {
        let exam = sqlx::query_as::<_, Exam>(
            "SELECT exam_id, class_name, exam_name, total_marks, exam_date
             FROM exams WHERE exam_id = ?1",
        )
        .bind(exam_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(exam)
    }

    /// Deletes an exam and every mark recorded for it.
    pub async fn delete(&self, exam_id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM exams WHERE exam_id = ?1")
            .bind(exam_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Exam", exam_id.to_string()));
        }

        info!(exam_id, "Exam deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
