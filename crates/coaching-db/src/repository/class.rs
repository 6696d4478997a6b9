//! # Class Repository
//!
//! Classes (batches) and their monthly fees. The class name is the natural
//! key students and exams refer to.

use coaching_core::validation::{required_text, validate_amount};
use coaching_core::{ClassBatch, Money};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

/// Repository for class operations.
#[derive(Debug, Clone)]
pub struct ClassRepository {
    pool: SqlitePool,
}

impl ClassRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ClassRepository { pool }
    }

    /// Lists every class in creation order.
    pub async fn list(&self) -> DbResult<Vec<ClassBatch>> {
        let classes = sqlx::query_as::<_, ClassBatch>(
            "SELECT class_id, class_name, monthly_fee_cents FROM classes ORDER BY class_id",
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = classes.len(), "Listed classes");
        Ok(classes)
    }

    /// Gets a class by name.
    pub async fn get(&self, class_name: &str) -> DbResult<Option<ClassBatch>> {
        let class = sqlx::query_as::<_, ClassBatch>(
            "SELECT class_id, class_name, monthly_fee_cents FROM classes WHERE class_name = ?1",
        )
        .bind(class_name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(class)
    }

    /// Reads a class's monthly fee. `None` when the class does not exist.
    pub async fn get_fee(&self, class_name: &str) -> DbResult<Option<Money>> {
        let cents: Option<i64> =
            sqlx::query_scalar("SELECT monthly_fee_cents FROM classes WHERE class_name = ?1")
                .bind(class_name.trim())
                .fetch_optional(&self.pool)
                .await?;

        Ok(cents.map(Money::from_cents))
    }

    /// Sets a class's monthly fee.
    ///
    /// ## Errors
    /// * `Validation` - negative fee
    /// * `NotFound` - no class with that name
    pub async fn update_fee(&self, class_name: &str, fee: Money) -> DbResult<()> {
        let fee = validate_amount("monthly fee", fee)?;

        debug!(class = %class_name, fee = %fee, "Updating class fee");

        let result = sqlx::query("UPDATE classes SET monthly_fee_cents = ?1 WHERE class_name = ?2")
            .bind(fee.cents())
            .bind(class_name.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Class", class_name));
        }

        Ok(())
    }

    /// Creates a class and returns its row id.
    ///
    /// ## Errors
    /// * `Validation` - blank name or negative fee
    /// * `UniqueViolation` - name already taken
    pub async fn create(&self, class_name: &str, fee: Money) -> DbResult<i64> {
        let class_name = required_text("class", class_name)?;
        let fee = validate_amount("monthly fee", fee)?;

        let result = sqlx::query("INSERT INTO classes (class_name, monthly_fee_cents) VALUES (?1, ?2)")
            .bind(&class_name)
            .bind(fee.cents())
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { .. } => DbError::duplicate("class_name", &class_name),
                other => other,
            })?;

        let class_id = result.last_insert_rowid();
        info!(class_id, class = %class_name, fee = %fee, "Class created");
        Ok(class_id)
    }

    /// Deletes a class.
    ///
    /// ## Errors
    /// * `NotFound` - no class with that name
    /// * `ForeignKeyViolation` - students or exams still reference it
    pub async fn delete(&self, class_name: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM classes WHERE class_name = ?1")
            .bind(class_name.trim())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Class", class_name));
        }

        info!(class = %class_name, "Class deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::NaiveDate;
    use coaching_core::{NewExam, StudentFields};

    #[tokio::test]
    async fn test_read_and_update_fee() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let classes = db.classes();

        assert_eq!(
            classes.get_fee("Class 7").await.unwrap(),
            Some(Money::from_cents(50000))
        );

        classes
            .update_fee("Class 7", Money::from_major_minor(725, 50))
            .await
            .unwrap();

        assert_eq!(
            classes.get_fee("Class 7").await.unwrap(),
            Some(Money::from_cents(72550))
        );
        // Other classes untouched
        assert_eq!(
            classes.get_fee("Class 8").await.unwrap(),
            Some(Money::from_cents(50000))
        );
    }

    #[tokio::test]
    async fn test_unknown_class() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let classes = db.classes();

        assert_eq!(classes.get_fee("Class 12").await.unwrap(), None);
        assert!(classes.get("Class 12").await.unwrap().is_none());

        let err = classes
            .update_fee("Class 12", Money::from_cents(100))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_negative_fee_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .classes()
            .update_fee("Class 3", Money::from_cents(-1))
            .await
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_create_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let classes = db.classes();

        classes
            .create("  Class 11 ", Money::from_major_minor(800, 0))
            .await
            .unwrap();

        let created = classes.get("Class 11").await.unwrap().unwrap();
        assert_eq!(created.monthly_fee(), Money::from_cents(80000));
        assert_eq!(classes.list().await.unwrap().len(), 9);

        classes.delete("Class 11").await.unwrap();
        assert!(classes.get("Class 11").await.unwrap().is_none());
        assert!(classes.delete("Class 11").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_name() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .classes()
            .create("Class 3", Money::zero())
            .await
            .unwrap_err();

        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "class_name");
                assert_eq!(value, "Class 3");
            }
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_referenced_class_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        db.students()
            .add(&StudentFields {
                name: "Asha Roy".to_string(),
                father_mobile: "01700000001".to_string(),
                current_class: "Class 4".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        db.exams()
            .create(&NewExam {
                class_name: "Class 5".to_string(),
                exam_name: "Unit Test".to_string(),
                total_marks: 20.0,
                exam_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            })
            .await
            .unwrap();

        let err = db.classes().delete("Class 4").await.unwrap_err();
        assert!(err.is_constraint());
        let err = db.classes().delete("Class 5").await.unwrap_err();
        assert!(err.is_constraint());

        assert!(db.classes().get("Class 4").await.unwrap().is_some());
    }
}
