//! # Repository Module
//!
//! One repository per entity. Each holds a clone of the pool and runs plain
//! runtime-checked queries; no rows are cached.
//!
//! ## Repository Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Database                                                              │
//! │   ├── students()   → StudentRepository    ids, admission, roster       │
//! │   ├── classes()    → ClassRepository      batches and fees             │
//! │   ├── exams()      → ExamRepository       exams per class              │
//! │   ├── marks()      → MarkRepository       upsert, roster, aggregates   │
//! │   ├── payments()   → PaymentRepository    monthly fees                 │
//! │   ├── promotions() → PromotionRepository  class moves + history        │
//! │   ├── reports()    → ReportRepository     dashboard, result sheets     │
//! │   └── admin()      → AdminRepository      shared credential            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Conventions
//! - Lookups return `Ok(None)` for a missing row
//! - Mutations of a missing row return [`DbError::NotFound`](crate::DbError)
//! - Input is validated before any SQL runs

pub mod admin;
pub mod class;
pub mod exam;
pub mod mark;
pub mod payment;
pub mod promotion;
pub mod report;
pub mod student;
