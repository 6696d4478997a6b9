//! # Promotion Repository
//!
//! Moves students between classes and keeps the append-only history.
//!
//! ## Single Promotion (one transaction)
//! ```text
//! BEGIN
//!   INSERT promotion_history        (from = students.current_class, to,
//!     SELECT FROM students            current year, summary)
//!                                   ── missing student → NotFound, rollback
//!   UPDATE students.current_class   ── unknown class → FK error, rollback
//! COMMIT
//! ```
//! Either both writes land or neither does.
//!
//! ## Class Promotion
//! Each active student of the source class is promoted in its own
//! transaction. One failure does not undo the others; it is reported in
//! [`BulkPromotionReport::failures`].

use chrono::Datelike;
use coaching_core::validation::{optional_text, required_text, validate_year};
use coaching_core::{BulkPromotionReport, PromotionFailure, PromotionRecord, StudentStatus};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult};

/// Calendar year of the local wall clock.
pub(crate) fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Repository for promotions.
#[derive(Debug, Clone)]
pub struct PromotionRepository {
    pool: SqlitePool,
}

impl PromotionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PromotionRepository { pool }
    }

    /// Promotes one student, logging the move under the current year.
    pub async fn promote_student(
        &self,
        student_id: &str,
        new_class: &str,
        summary: &str,
    ) -> DbResult<PromotionRecord> {
        self.promote_student_for_year(student_id, new_class, summary, current_year())
            .await
    }

    /// Promotes one student, logging the move under `year`.
    ///
    /// ## Errors
    /// * `Validation` - blank target class, implausible year
    /// * `NotFound` - no such student
    /// * `ForeignKeyViolation` - target class does not exist
    pub async fn promote_student_for_year(
        &self,
        student_id: &str,
        new_class: &str,
        summary: &str,
        year: i32,
    ) -> DbResult<PromotionRecord> {
        let new_class = required_text("class", new_class)?;
        let year = validate_year(year)?;
        let summary = optional_text(Some(summary)).unwrap_or_default();
        let student_id = student_id.trim();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        // Opens with a write so the lock is taken before current_class is read
        let (history_id, from_class) = sqlx::query_as::<_, (i64, String)>(
            r#"
            INSERT INTO promotion_history (student_id, year, from_class, to_class, overall_result_summary)
            SELECT student_id, ?2, current_class, ?3, ?4
            FROM students
            WHERE student_id = ?1
            RETURNING id, from_class
            "#,
        )
        .bind(student_id)
        .bind(year)
        .bind(&new_class)
        .bind(&summary)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("Student", student_id))?;

        sqlx::query("UPDATE students SET current_class = ?1 WHERE student_id = ?2")
            .bind(&new_class)
            .bind(student_id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            student_id = %student_id,
            from = %from_class,
            to = %new_class,
            year,
            "Student promoted"
        );

        Ok(PromotionRecord {
            id: history_id,
            student_id: student_id.to_string(),
            year,
            from_class,
            to_class: new_class,
            overall_result_summary: summary,
        })
    }

    /// Promotes every active student of `from_class` to `to_class`.
    ///
    /// An empty class is a no-op that reports zero promoted.
    ///
    /// ## Errors
    /// * `NotFound` - target class does not exist (nothing is attempted)
    pub async fn promote_class(
        &self,
        from_class: &str,
        to_class: &str,
        summary: &str,
    ) -> DbResult<BulkPromotionReport> {
        let from_class = required_text("class", from_class)?;
        let to_class = required_text("class", to_class)?;

        let target: Option<i64> =
            sqlx::query_scalar("SELECT class_id FROM classes WHERE class_name = ?1")
                .bind(&to_class)
                .fetch_optional(&self.pool)
                .await?;
        if target.is_none() {
            return Err(DbError::not_found("Class", &to_class));
        }

        let members: Vec<String> = sqlx::query_scalar(
            "SELECT student_id FROM students WHERE current_class = ?1 AND status = ?2 ORDER BY id",
        )
        .bind(&from_class)
        .bind(StudentStatus::Active)
        .fetch_all(&self.pool)
        .await?;

        debug!(from = %from_class, to = %to_class, count = members.len(), "Promoting class");

        let year = current_year();
        let mut report = BulkPromotionReport::new(&from_class, &to_class);

        for student_id in members {
            match self
                .promote_student_for_year(&student_id, &to_class, summary, year)
                .await
            {
                Ok(_) => report.promoted.push(student_id),
                Err(e) => {
                    warn!(student_id = %student_id, error = %e, "Promotion failed");
                    report.failures.push(PromotionFailure {
                        student_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            from = %from_class,
            to = %to_class,
            promoted = report.promoted_count(),
            failed = report.failures.len(),
            "Class promotion finished"
        );
        Ok(report)
    }

    /// A student's promotion history, latest year first; moves within the
    /// same year keep the order they happened in.
    pub async fn history(&self, student_id: &str) -> DbResult<Vec<PromotionRecord>> {
        let records = sqlx::query_as::<_, PromotionRecord>(
            r#"
            SELECT id, student_id, year, from_class, to_class, overall_result_summary
            FROM promotion_history
            WHERE student_id = ?1
            ORDER BY year DESC, id ASC
            "#,
        )
        .bind(student_id.trim())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use coaching_core::StudentFields;

    async fn student(db: &Database, name: &str, class: &str) -> String {
        db.students()
            .add(&StudentFields {
                name: name.to_string(),
                father_mobile: "01600000000".to_string(),
                current_class: class.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_promote_student() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Asha Roy", "Class 5").await;

        let record = db
            .promotions()
            .promote_student(&s, "Class 6", "  Passed with A ")
            .await
            .unwrap();

        assert_eq!(record.from_class, "Class 5");
        assert_eq!(record.to_class, "Class 6");
        assert_eq!(record.year, current_year());
        assert_eq!(record.overall_result_summary, "Passed with A");

        let history = db.promotions().history(&s).await.unwrap();
        assert_eq!(history, vec![record]);

        let moved = db.students().get_by_id(&s).await.unwrap().unwrap();
        assert_eq!(moved.current_class, "Class 6");
    }

    #[tokio::test]
    async fn test_failed_promotion_writes_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Asha Roy", "Class 5").await;

        let err = db
            .promotions()
            .promote_student(&s, "Class 13", "")
            .await
            .unwrap_err();
        assert!(err.is_constraint());

        assert!(db.promotions().history(&s).await.unwrap().is_empty());
        let unchanged = db.students().get_by_id(&s).await.unwrap().unwrap();
        assert_eq!(unchanged.current_class, "Class 5");
    }

    #[tokio::test]
    async fn test_promote_missing_student() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .promotions()
            .promote_student("STU0404", "Class 6", "")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_history_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Asha Roy", "Class 3").await;
        let promotions = db.promotions();

        promotions.promote_student_for_year(&s, "Class 4", "", 2024).await.unwrap();
        promotions.promote_student_for_year(&s, "Class 5", "first", 2025).await.unwrap();
        promotions.promote_student_for_year(&s, "Class 6", "second", 2025).await.unwrap();

        let moves: Vec<(i32, String)> = promotions
            .history(&s)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.year, r.to_class))
            .collect();
        assert_eq!(
            moves,
            vec![
                (2025, "Class 5".to_string()),
                (2025, "Class 6".to_string()),
                (2024, "Class 4".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_promote_class() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = student(&db, "Asha Roy", "Class 7").await;
        let b = student(&db, "Bikash Das", "Class 7").await;
        let inactive = student(&db, "Chandana Sen", "Class 7").await;
        db.students()
            .set_status(&inactive, StudentStatus::Inactive)
            .await
            .unwrap();

        let report = db
            .promotions()
            .promote_class("Class 7", "Class 8", "Annual")
            .await
            .unwrap();

        assert_eq!(report.promoted, vec![a.clone(), b.clone()]);
        assert!(report.failures.is_empty());
        assert_eq!(db.students().list_by_class("Class 8").await.unwrap().len(), 2);
        assert!(db.students().list_by_class("Class 7").await.unwrap().is_empty());

        let left_behind = db.students().get_by_id(&inactive).await.unwrap().unwrap();
        assert_eq!(left_behind.current_class, "Class 7");
        assert!(db.promotions().history(&inactive).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_promotions_on_file_database() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("coaching.db")))
            .await
            .unwrap();

        let mut ids = Vec::new();
        for n in 0..6 {
            ids.push(student(&db, &format!("Student {n}"), "Class 4").await);
        }

        let mut handles = Vec::new();
        for id in ids.clone() {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                db.promotions()
                    .promote_student_for_year(&id, "Class 5", "Passed", 2026)
                    .await
            }));
        }
        for handle in handles {
            let record = handle.await.unwrap().unwrap();
            assert_eq!(record.from_class, "Class 4");
            assert_eq!(record.to_class, "Class 5");
        }

        assert_eq!(db.students().list_by_class("Class 5").await.unwrap().len(), 6);
        for id in &ids {
            assert_eq!(db.promotions().history(id).await.unwrap().len(), 1);
        }

        db.close().await;
    }

    #[tokio::test]
    async fn test_promote_empty_class_is_noop() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let report = db
            .promotions()
            .promote_class("Class 10", "Class 9", "")
            .await
            .unwrap();

        assert_eq!(report.promoted_count(), 0);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_promote_class_to_unknown_target() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Asha Roy", "Class 7").await;

        let err = db
            .promotions()
            .promote_class("Class 7", "Class 77", "")
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let unchanged = db.students().get_by_id(&s).await.unwrap().unwrap();
        assert_eq!(unchanged.current_class, "Class 7");
    }
}
