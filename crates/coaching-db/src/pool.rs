//! # Database Pool Management
//!
//! Connection pool creation, configuration and first-run bootstrap.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Records Store Startup                              │
//! │                                                                         │
//! │  DbConfig::from_env() ← COACHING_DB_PATH or ./coaching_center.db       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Database::new(config).await                                           │
//! │       │                                                                 │
//! │       ├── open pool (WAL, foreign keys ON, create if missing)          │
//! │       ├── run embedded migrations (idempotent)                         │
//! │       └── seed classes / admin credential if absent (idempotent)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  db.students() / db.marks() / db.payments() / ...                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One operator, one workstation: the pool is small and every operation is
//! a single round-trip that commits immediately, except where a repository
//! opens an explicit transaction.
//!
//! ## Concurrent Writers
//! `Database` is `Clone` and may be shared across tasks. Every write path
//! starts with a writing statement, so a second writer waits up to
//! `busy_timeout` for the lock instead of failing a read-to-write upgrade.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::bootstrap;
use crate::config::{StoreSettings, DB_PATH_ENV, DEFAULT_DB_FILE};
use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::admin::AdminRepository;
use crate::repository::class::ClassRepository;
use crate::repository::exam::ExamRepository;
use crate::repository::mark::MarkRepository;
use crate::repository::payment::PaymentRepository;
use crate::repository::promotion::PromotionRepository;
use crate::repository::report::ReportRepository;
use crate::repository::student::StudentRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("/path/to/coaching_center.db")
///     .max_connections(2);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 4
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection.
    /// Default: 10 minutes
    pub idle_timeout: Duration,

    /// How long a writer waits for another connection's write lock.
    /// Default: 5 seconds
    pub busy_timeout: Duration,

    /// Whether to run migrations and seeding on connect.
    /// Default: true
    pub run_migrations: bool,

    /// What to seed into a fresh database.
    pub settings: StoreSettings,
}

impl DbConfig {
    /// Creates a new database configuration with the given path.
    ///
    /// ## Arguments
    /// * `path` - Path to the SQLite database file. Will be created if it doesn't exist.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 4,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
            settings: StoreSettings::default(),
        }
    }

    /// Configuration from the environment.
    ///
    /// ## Environment Variables
    /// - `COACHING_DB_PATH`: database file (default `coaching_center.db`)
    /// - see [`StoreSettings::from_env`] for seed overrides
    pub fn from_env() -> Self {
        let path = std::env::var(DB_PATH_ENV).unwrap_or_else(|_| DEFAULT_DB_FILE.to_string());
        let mut config = DbConfig::new(path);
        config.settings = StoreSettings::from_env();
        config
    }

    /// Sets the maximum number of connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Sets the minimum number of connections.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the write-lock wait.
    pub fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to run migrations and seeding on connect.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// Replaces the seed settings.
    pub fn settings(mut self, settings: StoreSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Creates an in-memory database configuration (for testing).
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// // Isolated database, already migrated and seeded
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(":memory:"),
            max_connections: 1, // In-memory requires single connection
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            busy_timeout: Duration::from_secs(5),
            run_migrations: true,
            settings: StoreSettings::default(),
        }
    }
}

// =============================================================================
// Database
// =============================================================================

/// The Records Store handle.
///
/// Cheap to clone; every repository it hands out shares the same pool.
/// No rows are cached: each call re-queries SQLite.
///
/// ## Usage
/// ```rust,ignore
/// let db = Database::new(DbConfig::from_env()).await?;
/// let roster = db.students().list_by_class("Class 5").await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database and brings it to a usable state.
    ///
    /// ## What This Does
    /// 1. Creates the database file if it doesn't exist
    /// 2. Configures SQLite: WAL, NORMAL synchronous, foreign keys ON
    /// 3. Creates the connection pool
    /// 4. Runs migrations and seeds defaults (if enabled)
    ///
    /// Safe to call on every launch.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Initializing database connection"
        );

        let connect_url = format!("sqlite://{}?mode=rwc", config.database_path.display());

        let connect_options = SqliteConnectOptions::from_str(&connect_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            // Cascading deletes of marks/payments/history depend on this
            .foreign_keys(true)
            .busy_timeout(config.busy_timeout)
            .create_if_missing(true);

        debug!("Connection options configured");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.initialize(&config.settings).await?;
        }

        Ok(db)
    }

    /// Runs migrations, then seeds default classes and the admin credential
    /// where they are missing.
    ///
    /// Idempotent: safe to run multiple times.
    pub async fn initialize(&self, settings: &StoreSettings) -> DbResult<()> {
        info!("Running database migrations");
        migrations::run_migrations(&self.pool).await?;
        bootstrap::seed_defaults(&self.pool, settings).await?;
        info!("Database ready");
        Ok(())
    }

    /// Returns a reference to the connection pool.
    ///
    /// Prefer repository methods when available.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Students: ids, admission, roster, update, delete.
    pub fn students(&self) -> StudentRepository {
        StudentRepository::new(self.pool.clone())
    }

    /// Classes and their monthly fees.
    pub fn classes(&self) -> ClassRepository {
        ClassRepository::new(self.pool.clone())
    }

    /// Exams per class.
    pub fn exams(&self) -> ExamRepository {
        ExamRepository::new(self.pool.clone())
    }

    /// Marks, per-exam rosters and aggregates.
    pub fn marks(&self) -> MarkRepository {
        MarkRepository::new(self.pool.clone())
    }

    /// Monthly fee payments.
    pub fn payments(&self) -> PaymentRepository {
        PaymentRepository::new(self.pool.clone())
    }

    /// Class promotions and their history.
    pub fn promotions(&self) -> PromotionRepository {
        PromotionRepository::new(self.pool.clone())
    }

    /// Dashboard aggregates and exam result reports.
    pub fn reports(&self) -> ReportRepository {
        ReportRepository::new(self.pool.clone())
    }

    /// The shared admin credential.
    pub fn admin(&self) -> AdminRepository {
        AdminRepository::new(self.pool.clone())
    }

    /// Closes the database connection pool.
    ///
    /// After calling close, all repository operations will fail.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// Checks if the database can execute queries.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
