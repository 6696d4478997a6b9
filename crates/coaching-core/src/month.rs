//! # Calendar Months
//!
//! Fee payments are keyed on `(student, month, year)`. The month is stored as
//! its English name (`"January"`), which is what the fee screen's month picker
//! has always produced.
//!
//! Storage order of month names is lexical ("April" < "August" < "December"),
//! not calendar order. [`Month::number`] gives the calendar position when a
//! caller needs it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Full English name, as stored.
    pub const fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// Calendar position, 1-12.
    pub fn number(&self) -> u32 {
        Month::ALL
            .iter()
            .position(|m| m == self)
            .map(|i| i as u32 + 1)
            .unwrap_or(0)
    }

    /// Month from its calendar position.
    pub fn from_number(n: u32) -> Option<Month> {
        if (1..=12).contains(&n) {
            Some(Month::ALL[(n - 1) as usize])
        } else {
            None
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts full names and three-letter abbreviations, case-insensitive.
///
/// ```rust
/// use coaching_core::Month;
///
/// assert_eq!("march".parse::<Month>().unwrap(), Month::March);
/// assert_eq!("SEP".parse::<Month>().unwrap(), Month::September);
/// assert!("Select Month".parse::<Month>().is_err());
/// ```
impl FromStr for Month {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();

        if needle.is_empty() {
            return Err(ValidationError::required("month"));
        }

        Month::ALL
            .iter()
            .copied()
            .find(|m| {
                let name = m.name().to_ascii_lowercase();
                name == needle || (needle.len() == 3 && name.starts_with(&needle))
            })
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "month".to_string(),
                allowed: Month::ALL.iter().map(|m| m.name().to_string()).collect(),
            })
    }
}
