//! # Payment Repository
//!
//! Monthly fee payments, at most one per (student, month, year).
//!
//! ## Ordering
//! [`payments_for_student`](PaymentRepository::payments_for_student) sorts by
//! year, then by month *name*, both descending. Month names are text, so
//! within a year "September" comes before "March". Callers that want
//! calendar order use
//! [`sort_payments_chronologically`](coaching_core::stats::sort_payments_chronologically).

use coaching_core::validation::{required_text, validate_amount, validate_year};
use coaching_core::{Money, Month, NewPayment, Payment, PaymentStatus};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};

const PAYMENT_COLUMNS: &str =
    "payment_id, student_id, class_name, month, year, amount_cents, paid_status";

/// Repository for payment operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Records a payment, replacing amount and status of an existing row
    /// for the same (student, month, year).
    ///
    /// ## Errors
    /// * `Validation` - negative amount, blank class, implausible year
    /// * `ForeignKeyViolation` - student does not exist
    pub async fn upsert_payment(&self, payment: &NewPayment) -> DbResult<()> {
        let class_name = required_text("class", &payment.class_name)?;
        let amount = validate_amount("amount", payment.amount)?;
        let year = validate_year(payment.year)?;

        debug!(
            student_id = %payment.student_id,
            month = %payment.month,
            year,
            amount = %amount,
            status = ?payment.status,
            "Upserting payment"
        );

        sqlx::query(
            r#"
            INSERT INTO payments (student_id, class_name, month, year, amount_cents, paid_status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(student_id, month, year)
            DO UPDATE SET
                amount_cents = excluded.amount_cents,
                paid_status = excluded.paid_status
            "#,
        )
        .bind(payment.student_id.trim())
        .bind(&class_name)
        .bind(payment.month)
        .bind(year)
        .bind(amount.cents())
        .bind(payment.status)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets the payment for one period.
    pub async fn get(&self, student_id: &str, month: Month, year: i32) -> DbResult<Option<Payment>> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments
             WHERE student_id = ?1 AND month = ?2 AND year = ?3"
        );

        let payment = sqlx::query_as::<_, Payment>(&sql)
            .bind(student_id.trim())
            .bind(month)
            .bind(year)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// All payments of a student: year descending, then month name
    /// descending (text order, not calendar order).
    pub async fn payments_for_student(&self, student_id: &str) -> DbResult<Vec<Payment>> {
        let sql = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments
             WHERE student_id = ?1
             ORDER BY year DESC, month DESC"
        );

        let payments = sqlx::query_as::<_, Payment>(&sql)
            .bind(student_id.trim())
            .fetch_all(&self.pool)
            .await?;

        debug!(student_id = %student_id, count = payments.len(), "Loaded payments");
        Ok(payments)
    }

    /// Marks a month as paid for a student.
    ///
    /// The class is taken from the student's current enrollment; the amount
    /// defaults to that class's monthly fee.
    ///
    /// ## Errors
    /// * `NotFound` - no such student, or their class has vanished
    pub async fn record_monthly_fee(
        &self,
        student_id: &str,
        month: Month,
        year: i32,
        amount: Option<Money>,
    ) -> DbResult<Payment> {
        let student_id = student_id.trim();

        let class_name: String =
            sqlx::query_scalar("SELECT current_class FROM students WHERE student_id = ?1")
                .bind(student_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::not_found("Student", student_id))?;

        let amount = match amount {
            Some(amount) => amount,
            None => {
                let cents: i64 = sqlx::query_scalar(
                    "SELECT monthly_fee_cents FROM classes WHERE class_name = ?1",
                )
                .bind(&class_name)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| DbError::not_found("Class", &class_name))?;
                Money::from_cents(cents)
            }
        };

        self.upsert_payment(&NewPayment {
            student_id: student_id.to_string(),
            class_name,
            month,
            year,
            amount,
            status: PaymentStatus::Paid,
        })
        .await?;

        info!(student_id = %student_id, %month, year, amount = %amount, "Monthly fee recorded");

        self.get(student_id, month, year)
            .await?
            .ok_or_else(|| DbError::Internal("payment missing after upsert".to_string()))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use coaching_core::stats::sort_payments_chronologically;
    use coaching_core::StudentFields;

    async fn student(db: &Database, class: &str) -> String {
        db.students()
            .add(&StudentFields {
                name: "Asha Roy".to_string(),
                father_mobile: "01500000000".to_string(),
                current_class: class.to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    fn payment(student_id: &str, month: Month, year: i32, cents: i64, status: PaymentStatus) -> NewPayment {
        NewPayment {
            student_id: student_id.to_string(),
            class_name: "Class 4".to_string(),
            month,
            year,
            amount: Money::from_cents(cents),
            status,
        }
    }

    #[tokio::test]
    async fn test_upsert_twice_keeps_one_row() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Class 4").await;
        let payments = db.payments();

        payments
            .upsert_payment(&payment(&s, Month::March, 2026, 40000, PaymentStatus::Unpaid))
            .await
            .unwrap();
        payments
            .upsert_payment(&payment(&s, Month::March, 2026, 50000, PaymentStatus::Paid))
            .await
            .unwrap();

        let all = payments.payments_for_student(&s).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount_cents, 50000);
        assert_eq!(all[0].paid_status, PaymentStatus::Paid);
        assert_eq!(all[0].month, Month::March);
    }

    #[tokio::test]
    async fn test_history_uses_text_month_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Class 4").await;
        let payments = db.payments();

        for (month, year) in [
            (Month::March, 2026),
            (Month::September, 2026),
            (Month::January, 2026),
            (Month::December, 2025),
        ] {
            payments
                .upsert_payment(&payment(&s, month, year, 50000, PaymentStatus::Paid))
                .await
                .unwrap();
        }

        let mut listed = payments.payments_for_student(&s).await.unwrap();
        let order: Vec<Month> = listed.iter().map(|p| p.month).collect();
        assert_eq!(
            order,
            vec![Month::September, Month::March, Month::January, Month::December]
        );

        sort_payments_chronologically(&mut listed);
        let order: Vec<Month> = listed.iter().map(|p| p.month).collect();
        assert_eq!(
            order,
            vec![Month::September, Month::March, Month::January, Month::December]
        );
        assert_eq!(listed[3].year, 2025);
    }

    #[tokio::test]
    async fn test_calendar_sort_differs_from_text_sort() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Class 4").await;

        for month in [Month::April, Month::May, Month::June] {
            db.payments()
                .upsert_payment(&payment(&s, month, 2026, 50000, PaymentStatus::Paid))
                .await
                .unwrap();
        }

        let mut listed = db.payments().payments_for_student(&s).await.unwrap();
        let text: Vec<Month> = listed.iter().map(|p| p.month).collect();
        assert_eq!(text, vec![Month::May, Month::June, Month::April]);

        sort_payments_chronologically(&mut listed);
        let calendar: Vec<Month> = listed.iter().map(|p| p.month).collect();
        assert_eq!(calendar, vec![Month::June, Month::May, Month::April]);
    }

    #[tokio::test]
    async fn test_validation_and_constraints() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let s = student(&db, "Class 4").await;
        let payments = db.payments();

        let negative = payment(&s, Month::May, 2026, -1, PaymentStatus::Paid);
        assert!(payments.upsert_payment(&negative).await.unwrap_err().is_validation());

        let bad_year = payment(&s, Month::May, 26, 100, PaymentStatus::Paid);
        assert!(payments.upsert_payment(&bad_year).await.unwrap_err().is_validation());

        let stranger = payment("STU0404", Month::May, 2026, 100, PaymentStatus::Paid);
        assert!(payments.upsert_payment(&stranger).await.unwrap_err().is_constraint());
    }

    #[tokio::test]
    async fn test_record_monthly_fee_defaults_to_class_fee() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.classes()
            .update_fee("Class 9", Money::from_major_minor(900, 0))
            .await
            .unwrap();
        let s = student(&db, "Class 9").await;

        let paid = db
            .payments()
            .record_monthly_fee(&s, Month::February, 2026, None)
            .await
            .unwrap();
        assert_eq!(paid.amount(), Money::from_cents(90000));
        assert_eq!(paid.class_name, "Class 9");
        assert_eq!(paid.paid_status, PaymentStatus::Paid);

        let discounted = db
            .payments()
            .record_monthly_fee(&s, Month::February, 2026, Some(Money::from_cents(45000)))
            .await
            .unwrap();
        assert_eq!(discounted.payment_id, paid.payment_id);
        assert_eq!(discounted.amount_cents, 45000);
    }

    #[tokio::test]
    async fn test_record_monthly_fee_unknown_student() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db
            .payments()
            .record_monthly_fee("STU0404", Month::May, 2026, None)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(db.payments().get("STU0404", Month::May, 2026).await.unwrap().is_none());
    }
}
