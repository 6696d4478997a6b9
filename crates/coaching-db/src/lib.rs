//! # coaching-db: Records Store for the Coaching Center
//!
//! Owns every read and write of the center's records: students, classes,
//! exams, marks, fee payments, promotion history and the admin credential.
//! SQLite via sqlx; nothing is cached between calls.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Coaching Center Data Flow                           │
//! │                                                                         │
//! │  Screen / binary (seed, exam-report)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   coaching-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories  │   │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │◄───│ student, class │   │  + bootstrap │   │   │
//! │  │   │  SqlitePool   │    │ exam, mark,    │   │  seeding     │   │   │
//! │  │   │               │    │ payment, ...   │   │              │   │   │
//! │  │   └───────────────┘    └────────────────┘   └──────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  coaching_center.db (or $COACHING_DB_PATH)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`config`] - Seed settings and environment lookup
//! - [`migrations`] - Embedded database migrations
//! - [`bootstrap`] - First-run seeding
//! - [`error`] - Database error types
//! - [`repository`] - One repository per entity
//!
//! ## Usage
//!
//! ```rust,ignore
//! use coaching_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::from_env()).await?;
//!
//! let id = db.students().add(&fields).await?;
//! db.marks().upsert_mark(&id, exam_id, 72.5).await?;
//! let report = db.reports().exam_report(exam_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreSettings;
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::admin::AdminRepository;
pub use repository::class::ClassRepository;
pub use repository::exam::ExamRepository;
pub use repository::mark::MarkRepository;
pub use repository::payment::PaymentRepository;
pub use repository::promotion::PromotionRepository;
pub use repository::report::ReportRepository;
pub use repository::student::StudentRepository;

/// Installs the tracing subscriber used by the binaries.
///
/// Honors `RUST_LOG`; falls back to `info,coaching=debug,sqlx=warn`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,coaching=debug,sqlx=warn"));

    // A second install (tests, repeated calls) is ignored.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
