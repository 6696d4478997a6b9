//! First-run seeding.
//!
//! Runs after migrations on every launch. Each step checks before it writes,
//! so an existing database keeps its classes, fees and password.

use coaching_core::validation::{required_text, validate_amount};
use coaching_core::ADMIN_PASSWORD_KEY;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::config::StoreSettings;
use crate::error::{DbError, DbResult};
use crate::repository::admin::hash_password;

/// Seeds default classes and the admin credential where absent.
pub async fn seed_defaults(pool: &SqlitePool, settings: &StoreSettings) -> DbResult<()> {
    seed_classes(pool, settings).await?;
    seed_admin(pool, settings).await?;
    Ok(())
}

async fn seed_classes(pool: &SqlitePool, settings: &StoreSettings) -> DbResult<()> {
    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM classes")
        .fetch_one(pool)
        .await?;

    if existing > 0 {
        debug!(existing, "Classes present, skipping class seed");
        return Ok(());
    }

    let fee = validate_amount("monthly fee", settings.default_monthly_fee)?;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    for name in &settings.default_classes {
        let name = required_text("class", name)?;
        sqlx::query(
            "INSERT INTO classes (class_name, monthly_fee_cents) VALUES (?1, ?2)
             ON CONFLICT(class_name) DO NOTHING",
        )
        .bind(&name)
        .bind(fee.cents())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit()
        .await
        .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

    info!(
        count = settings.default_classes.len(),
        fee = %fee,
        "Seeded default classes"
    );
    Ok(())
}

async fn seed_admin(pool: &SqlitePool, settings: &StoreSettings) -> DbResult<()> {
    let present: Option<String> = sqlx::query_scalar("SELECT value FROM app_config WHERE key = ?1")
        .bind(ADMIN_PASSWORD_KEY)
        .fetch_optional(pool)
        .await?;

    if present.is_some() {
        debug!("Admin credential present, skipping");
        return Ok(());
    }

    let hash = hash_password(&settings.default_admin_password)?;

    sqlx::query("INSERT INTO app_config (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO NOTHING")
        .bind(ADMIN_PASSWORD_KEY)
        .bind(&hash)
        .execute(pool)
        .await?;

    info!("Seeded default admin credential");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use coaching_core::Money;

    #[tokio::test]
    async fn test_fresh_database_gets_eight_classes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let classes = db.classes().list().await.unwrap();

        assert_eq!(classes.len(), 8);
        assert_eq!(classes[0].class_name, "Class 3");
        assert!(classes.iter().all(|c| c.monthly_fee_cents == 50000));
    }

    #[tokio::test]
    async fn test_existing_classes_are_kept() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.classes()
            .update_fee("Class 3", Money::from_major_minor(650, 0))
            .await
            .unwrap();

        seed_defaults(db.pool(), &StoreSettings::default())
            .await
            .unwrap();

        let fee = db.classes().get_fee("Class 3").await.unwrap();
        assert_eq!(fee, Some(Money::from_major_minor(650, 0)));
        assert_eq!(db.classes().list().await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_custom_settings() {
        let settings = StoreSettings {
            default_classes: vec!["Morning Batch".to_string(), "Evening Batch".to_string()],
            default_monthly_fee: Money::from_major_minor(300, 0),
            default_admin_password: "s3cret".to_string(),
        };
        let db = Database::new(DbConfig::in_memory().settings(settings))
            .await
            .unwrap();

        let classes = db.classes().list().await.unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[1].monthly_fee_cents, 30000);
        assert!(db.admin().verify_admin("s3cret").await.unwrap());
        assert!(!db.admin().verify_admin("admin").await.unwrap());
    }
}
