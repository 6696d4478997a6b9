//! # Database Migrations
//!
//! Embedded SQL migrations for the Records Store.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Database::new                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  _sqlx_migrations present? ── no ──► create it                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  001_initial_schema.sql  ✓ applied  → skipped                          │
//! │  00N_next_change.sql     ⬜ pending → run in its own transaction        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bootstrap::seed_defaults (classes, admin credential)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Add `migrations/sqlite/NNN_description.sql` with the next number
//! 2. Never edit an applied migration; sqlx checks the checksum
//! 3. Seed rows belong in `bootstrap`, not in SQL

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent: already applied migrations are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(
        embedded = MIGRATOR.migrations.len(),
        "Checking for pending migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(embedded, applied)` migration counts.
///
/// A database that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await
    {
        Ok(count) => count,
        Err(e) => {
            debug!(error = %e, "Migration table not readable");
            0
        }
    };

    Ok((total, applied.max(0) as usize))
}
