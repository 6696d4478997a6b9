//! # Store Settings
//!
//! Values the Records Store seeds into a fresh database.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`COACHING_*`)
//! 2. Defaults (this file)
//!
//! Settings only matter at first launch: once classes and the admin
//! credential exist, seeding leaves them alone.

use coaching_core::validation::parse_amount;
use coaching_core::Money;
use tracing::warn;

/// Environment variable overriding the database file path.
pub const DB_PATH_ENV: &str = "COACHING_DB_PATH";

/// Database file used when nothing else is configured (working directory).
pub const DEFAULT_DB_FILE: &str = "coaching_center.db";

/// Classes created on first run.
pub const DEFAULT_CLASSES: [&str; 8] = [
    "Class 3", "Class 4", "Class 5", "Class 6", "Class 7", "Class 8", "Class 9", "Class 10",
];

/// Seed configuration for a new database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Class names seeded when the classes table is empty, in display order.
    pub default_classes: Vec<String>,

    /// Monthly fee given to every seeded class.
    pub default_monthly_fee: Money,

    /// Admin password seeded when none is stored.
    pub default_admin_password: String,
}

impl Default for StoreSettings {
    /// ## Default Values
    /// - Classes: "Class 3" through "Class 10"
    /// - Fee: 500.00 each
    /// - Admin password: "admin"
    fn default() -> Self {
        StoreSettings {
            default_classes: DEFAULT_CLASSES.iter().map(|c| c.to_string()).collect(),
            default_monthly_fee: Money::from_major_minor(500, 0),
            default_admin_password: "admin".to_string(),
        }
    }
}

impl StoreSettings {
    /// Creates settings from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `COACHING_DEFAULT_FEE`: seeded monthly fee (e.g. "650.00")
    /// - `COACHING_ADMIN_PASSWORD`: seeded admin password
    pub fn from_env() -> Self {
        let mut settings = StoreSettings::default();

        if let Ok(raw) = std::env::var("COACHING_DEFAULT_FEE") {
            match parse_amount("COACHING_DEFAULT_FEE", &raw) {
                Ok(fee) => settings.default_monthly_fee = fee,
                Err(e) => warn!(error = %e, "Ignoring invalid default fee"),
            }
        }

        if let Ok(password) = std::env::var("COACHING_ADMIN_PASSWORD") {
            if password.trim().is_empty() {
                warn!("Ignoring blank COACHING_ADMIN_PASSWORD");
            } else {
                settings.default_admin_password = password;
            }
        }

        settings
    }
}
