//! # Student Repository
//!
//! Admission, roster and maintenance of student records.
//!
//! ## Identifier Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlite_sequence('students') = 41     (highest row id ever issued)     │
//! │       │                                                                 │
//! │       ▼  + 1                                                            │
//! │  id = 42  ──►  student_id = "STU0042"                                  │
//! │                                                                         │
//! │  Row 41 deleted later? The sequence still says 41, so the next         │
//! │  admission gets 42 again: numbers are consumed, never reused.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both numbers are computed and written by a single `INSERT ... SELECT`, so
//! the row id and the `STU` number always agree and two admissions running
//! at once never read the same sequence.

use coaching_core::validation::{format_student_id, validate_student_fields};
use coaching_core::{Student, StudentFields, StudentStatus, STUDENT_ID_PREFIX, STUDENT_ID_WIDTH};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const STUDENT_COLUMNS: &str = "id, student_id, name, father_name, mother_name, father_mobile, \
     alternative_mobile, current_class, section, status";

/// Highest row id ever issued for students, plus one.
const NEXT_SEQUENCE_SQL: &str = "SELECT MAX(
         COALESCE((SELECT seq FROM sqlite_sequence WHERE name = 'students'), 0),
         COALESCE((SELECT MAX(id) FROM students), 0)
     ) + 1";

/// Allocates the number and inserts the row in one statement. The write
/// lock is held before the sequence is read.
fn admit_sql() -> String {
    format!(
        "INSERT INTO students (
             id, student_id, name, father_name, mother_name, father_mobile,
             alternative_mobile, current_class, section, status
         )
         SELECT alloc.seq, printf('{STUDENT_ID_PREFIX}%0{STUDENT_ID_WIDTH}d', alloc.seq),
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8
         FROM ({NEXT_SEQUENCE_SQL} AS seq) AS alloc
         RETURNING student_id"
    )
}

/// Repository for student operations.
#[derive(Debug, Clone)]
pub struct StudentRepository {
    pool: SqlitePool,
}

impl StudentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StudentRepository { pool }
    }

    /// Previews the identifier the next admission will receive.
    ///
    /// Nothing is reserved; [`add`](Self::add) allocates again.
    pub async fn next_student_id(&self) -> DbResult<String> {
        let sequence: i64 = sqlx::query_scalar(NEXT_SEQUENCE_SQL)
            .fetch_one(&self.pool)
            .await?;
        Ok(format_student_id(sequence))
    }

    /// Admits a student and returns the new `STU` identifier.
    ///
    /// ## Errors
    /// * `Validation` - name, father mobile or class blank
    /// * `ForeignKeyViolation` - class does not exist
    pub async fn add(&self, fields: &StudentFields) -> DbResult<String> {
        let fields = validate_student_fields(fields)?;

        let sql = admit_sql();
        let student_id: String = sqlx::query_scalar(&sql)
            .bind(&fields.name)
            .bind(&fields.father_name)
            .bind(&fields.mother_name)
            .bind(&fields.father_mobile)
            .bind(&fields.alternative_mobile)
            .bind(&fields.current_class)
            .bind(&fields.section)
            .bind(StudentStatus::Active)
            .fetch_one(&self.pool)
            .await?;

        info!(
            student_id = %student_id,
            class = %fields.current_class,
            "Student admitted"
        );
        Ok(student_id)
    }

    /// Active students of a class, in admission order.
    pub async fn list_by_class(&self, class_name: &str) -> DbResult<Vec<Student>> {
        let sql = format!(
            "SELECT {STUDENT_COLUMNS} FROM students
             WHERE current_class = ?1 AND status = ?2
             ORDER BY id"
        );

        let students = sqlx::query_as::<_, Student>(&sql)
            .bind(class_name.trim())
            .bind(StudentStatus::Active)
            .fetch_all(&self.pool)
            .await?;

        debug!(class = %class_name, count = students.len(), "Listed class roster");
        Ok(students)
    }

    /// Gets a student by identifier, whatever their status.
    pub async fn get_by_id(&self, student_id: &str) -> DbResult<Option<Student>> {
        let sql = format!("SELECT {STUDENT_COLUMNS} FROM students WHERE student_id = ?1");

        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(student_id.trim())
            .fetch_optional(&self.pool)
            .await?;

        Ok(student)
    }

    /// Overwrites every mutable field. The identifier and status stay.
    ///
    /// Changing `current_class` here does not log a promotion; use
    /// [`PromotionRepository`](crate::PromotionRepository) for that.
    pub async fn update(&self, student_id: &str, fields: &StudentFields) -> DbResult<()> {
        let fields = validate_student_fields(fields)?;

        debug!(student_id = %student_id, "Updating student");

        let result = sqlx::query(
            r#"
            UPDATE students SET
                name = ?1,
                father_name = ?2,
                mother_name = ?3,
                father_mobile = ?4,
                alternative_mobile = ?5,
                current_class = ?6,
                section = ?7
            WHERE student_id = ?8
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.father_name)
        .bind(&fields.mother_name)
        .bind(&fields.father_mobile)
        .bind(&fields.alternative_mobile)
        .bind(&fields.current_class)
        .bind(&fields.section)
        .bind(student_id.trim())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Student", student_id));
        }

        Ok(())
    }

    /// Marks a student active or inactive. Inactive students keep their
    /// rows but drop out of rosters and counts.
    pub async fn set_status(&self, student_id: &str, status: StudentStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE students SET status = ?1 WHERE student_id = ?2")
            .bind(status)
            .bind(student_id.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Student", student_id));
        }

        info!(student_id = %student_id, ?status, "Student status changed");
        Ok(())
    }

    /// Removes a student together with their marks, payments and
    /// promotion history.
    pub async fn delete(&self, student_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = ?1")
            .bind(student_id.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Student", student_id));
        }

        info!(student_id = %student_id, "Student deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
