//! # Report Repository
//!
//! Read-only aggregates for the dashboard and the exam result sheet.
//! Everything is computed on the spot; nothing is cached.
//!
//! "Current year" is the local wall-clock year at the time of the call.

use coaching_core::validation::validate_year;
use coaching_core::{DashboardSummary, ExamReport, Money, PaymentStatus, StudentStatus};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::exam::ExamRepository;
use crate::repository::mark::MarkRepository;
use crate::repository::promotion::current_year;

/// Repository for reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    pub async fn active_student_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE status = ?1")
            .bind(StudentStatus::Active)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn class_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM classes")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn exam_count(&self) -> DbResult<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM exams")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Sum of paid payments recorded for `year`.
    pub async fn revenue_for_year(&self, year: i32) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE year = ?1 AND paid_status = ?2",
        )
        .bind(year)
        .bind(PaymentStatus::Paid)
        .fetch_one(&self.pool)
        .await?;
        Ok(Money::from_cents(cents))
    }

    /// Number of paid payments recorded for `year`.
    pub async fn paid_payment_count(&self, year: i32) -> DbResult<i64> {
        let count = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments WHERE year = ?1 AND paid_status = ?2",
        )
        .bind(year)
        .bind(PaymentStatus::Paid)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    /// Dashboard numbers for the current year.
    pub async fn summary(&self) -> DbResult<DashboardSummary> {
        self.summary_for_year(current_year()).await
    }

    /// Dashboard numbers with revenue restricted to `year`.
    pub async fn summary_for_year(&self, year: i32) -> DbResult<DashboardSummary> {
        let year = validate_year(year)?;

        let summary = DashboardSummary {
            year,
            active_students: self.active_student_count().await?,
            classes: self.class_count().await?,
            exams: self.exam_count().await?,
            revenue_cents: self.revenue_for_year(year).await?.cents(),
            paid_payments: self.paid_payment_count(year).await?,
        };

        debug!(?summary, "Computed dashboard summary");
        Ok(summary)
    }

    /// Result sheet for an exam. `None` when the exam does not exist.
    pub async fn exam_report(&self, exam_id: i64) -> DbResult<Option<ExamReport>> {
        let Some(exam) = ExamRepository::new(self.pool.clone()).get(exam_id).await? else {
            return Ok(None);
        };

        let marks = MarkRepository::new(self.pool.clone());
        let entries = marks.marks_by_exam(exam_id).await?;
        let highest = marks.highest_mark(exam_id).await?;
        let average = marks.average_mark(exam_id).await?;

        debug!(exam_id, students = entries.len(), "Built exam report");

        Ok(Some(ExamReport {
            exam,
            entries,
            highest,
            average,
        }))
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
    use coaching_core::{Month, NewExam, NewPayment, StudentFields};

    async fn student(db: &Database, name: &str, class: &str) -> String {
        db.students()
            .add(&StudentFields {
                name: name.to_string(),
                father_mobile: "01300000000".to_string(),
                current_class: class.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    async fn pay(db: &Database, student_id: &str, month: Month, year: i32, cents: i64, status: PaymentStatus) {
        db.payments()
            .upsert_payment(&NewPayment {
                student_id: student_id.to_string(),
                class_name: "Class 3".to_string(),
                month,
                year,
                amount: Money::from_cents(cents),
                status,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let summary = db.reports().summary().await.unwrap();

        assert_eq!(summary.year, current_year());
        assert_eq!(summary.active_students, 0);
        assert_eq!(summary.classes, 8);
        assert_eq!(summary.exams, 0);
        assert_eq!(summary.revenue(), Money::zero());
        assert_eq!(summary.paid_payments, 0);
    }

    #[tokio::test]
    async fn test_summary_for_year() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = student(&db, "Asha Roy", "Class 3").await;
        let b = student(&db, "Bikash Das", "Class 3").await;
        let c = student(&db, "Chandana Sen", "Class 3").await;
        db.students()
            .set_status(&c, StudentStatus::Inactive)
            .await
            .unwrap();

        pay(&db, &a, Month::January, 2026, 50000, PaymentStatus::Paid).await;
        pay(&db, &a, Month::February, 2026, 50000, PaymentStatus::Unpaid).await;
        pay(&db, &b, Month::January, 2026, 45050, PaymentStatus::Paid).await;
        pay(&db, &b, Month::December, 2025, 50000, PaymentStatus::Paid).await;

        let summary = db.reports().summary_for_year(2026).await.unwrap();
        assert_eq!(summary.active_students, 2);
        assert_eq!(summary.revenue_cents, 95050);
        assert_eq!(summary.paid_payments, 2);

        let previous = db.reports().summary_for_year(2025).await.unwrap();
        assert_eq!(previous.revenue_cents, 50000);
        assert_eq!(previous.paid_payments, 1);
    }

    #[tokio::test]
    async fn test_exam_report() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let a = student(&db, "Asha Roy", "Class 10").await;
        let b = student(&db, "Bikash Das", "Class 10").await;
        let c = student(&db, "Chandana Sen", "Class 10").await;

        let exam_id = db
            .exams()
            .create(&NewExam {
                class_name: "Class 10".to_string(),
                exam_name: "Final".to_string(),
                total_marks: 100.0,
                exam_date: NaiveDate::from_ymd_opt(2026, 11, 30).unwrap(),
            })
            .await
            .unwrap();
        db.marks().upsert_mark(&a, exam_id, 40.0).await.unwrap();
        db.marks().upsert_mark(&c, exam_id, 80.0).await.unwrap();

        let report = db.reports().exam_report(exam_id).await.unwrap().unwrap();
        assert_eq!(report.exam.exam_name, "Final");
        assert_eq!(report.entries.len(), 3);
        assert_eq!(report.entries[1].student_id, b);
        assert_eq!(report.entries[1].obtained_marks, None);
        assert_eq!(report.highest, 80.0);
        assert_eq!(report.average, 60.0);
        assert_eq!(report.pending_count(), 1);

        let text = report.render_text();
        assert!(text.contains("Chandana Sen"));
        assert!(text.contains("80.00 / 100.00"));
        assert_eq!(db.reports().exam_count().await.unwrap(), 1);

        assert!(db.reports().exam_report(exam_id + 1).await.unwrap().is_none());
    }
}
