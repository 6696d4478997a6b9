//! # Validation Module
//!
//! Field checks and parsing of operator input, applied at the store boundary.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screens                                                      │
//! │  └── Immediate feedback (optional, not trusted)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Records Store boundary                                       │
//! │  └── THIS MODULE: required fields, numeric parsing, ranges             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign keys (class names, student ids, exam ids)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unparseable numbers are errors, never silently skipped.

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewExam, StudentFields};
use crate::{MAX_NAME_LEN, STUDENT_ID_PREFIX, STUDENT_ID_WIDTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Trims a required text field and rejects it when blank or oversized.
///
/// ## Example
/// ```rust
/// use coaching_core::validation::required_text;
///
/// assert_eq!(required_text("name", "  Asha ").unwrap(), "Asha");
/// assert!(required_text("name", "   ").is_err());
/// ```
pub fn required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional text field; blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates and normalizes the admission form.
///
/// ## Rules
/// - `name`, `father_mobile` and `current_class` are required
/// - Every other field is optional; blanks are stored as NULL
pub fn validate_student_fields(fields: &StudentFields) -> ValidationResult<StudentFields> {
    Ok(StudentFields {
        name: required_text("name", &fields.name)?,
        father_name: optional_text(fields.father_name.as_deref()),
        mother_name: optional_text(fields.mother_name.as_deref()),
        father_mobile: required_text("father mobile", &fields.father_mobile)?,
        alternative_mobile: optional_text(fields.alternative_mobile.as_deref()),
        current_class: required_text("class", &fields.current_class)?,
        section: optional_text(fields.section.as_deref()),
    })
}

/// Validates exam input.
///
/// ## Rules
/// - class and exam name are required
/// - total marks must be a finite number above zero
pub fn validate_new_exam(exam: &NewExam) -> ValidationResult<NewExam> {
    Ok(NewExam {
        class_name: required_text("class", &exam.class_name)?,
        exam_name: required_text("exam name", &exam.exam_name)?,
        total_marks: validate_total_marks(exam.total_marks)?,
        exam_date: exam.exam_date,
    })
}

/// Validates an admin password before it is stored.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.trim().is_empty() {
        return Err(ValidationError::required("password"));
    }
    Ok(())
}

// =============================================================================
// Student Identifiers
// =============================================================================

/// Formats a sequence number as a student identifier.
///
/// ## Example
/// ```rust
/// use coaching_core::validation::format_student_id;
///
/// assert_eq!(format_student_id(7), "STU0007");
/// assert_eq!(format_student_id(12345), "STU12345");
/// ```
pub fn format_student_id(sequence: i64) -> String {
    format!(
        "{}{:0width$}",
        STUDENT_ID_PREFIX,
        sequence,
        width = STUDENT_ID_WIDTH
    )
}

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Parses a decimal typed by the operator.
///
/// Rejects blanks, garbage and non-finite values (`"NaN"`, `"inf"`).
pub fn parse_decimal(field: &str, input: &str) -> ValidationResult<f64> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::InvalidNumber {
            field: field.to_string(),
            input: trimmed.to_string(),
        }),
    }
}

/// Parses an obtained-marks cell.
///
/// ## Example
/// ```rust
/// use coaching_core::validation::parse_marks;
///
/// assert_eq!(parse_marks("72.5").unwrap(), 72.5);
/// assert!(parse_marks("absent").is_err());
/// assert!(parse_marks("-3").is_err());
/// ```
pub fn parse_marks(input: &str) -> ValidationResult<f64> {
    validate_obtained_marks(parse_decimal("obtained marks", input)?)
}

/// Checks an obtained-marks value.
pub fn validate_obtained_marks(value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: "obtained marks".to_string(),
            input: value.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "obtained marks".to_string(),
        });
    }
    Ok(value)
}

/// Checks an exam's total-marks ceiling.
pub fn validate_total_marks(value: f64) -> ValidationResult<f64> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidNumber {
            field: "total marks".to_string(),
            input: value.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "total marks".to_string(),
        });
    }
    Ok(value)
}

/// Parses a non-negative money amount with at most two decimals.
///
/// Integer parsing only, so `"0.1"` is exactly 10 minor units.
///
/// ## Example
/// ```rust
/// use coaching_core::validation::parse_amount;
///
/// assert_eq!(parse_amount("fee", "500").unwrap().cents(), 50000);
/// assert_eq!(parse_amount("fee", "499.9").unwrap().cents(), 49990);
/// assert!(parse_amount("fee", "12.345").is_err());
/// assert!(parse_amount("fee", "five hundred").is_err());
/// ```
pub fn parse_amount(field: &str, input: &str) -> ValidationResult<Money> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }

    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        input: trimmed.to_string(),
    };

    if trimmed.starts_with('-') {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    let (major_part, minor_part) = match trimmed.split_once('.') {
        Some((major, minor)) => (major, minor),
        None => (trimmed, ""),
    };

    if major_part.is_empty() && minor_part.is_empty() {
        return Err(invalid());
    }
    if !major_part.chars().all(|c| c.is_ascii_digit())
        || !minor_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(invalid());
    }
    if minor_part.len() > 2 {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "at most two decimal places".to_string(),
        });
    }

    let major: i64 = if major_part.is_empty() {
        0
    } else {
        major_part.parse().map_err(|_| invalid())?
    };
    let minor: i64 = match minor_part.len() {
        0 => 0,
        1 => minor_part.parse::<i64>().map_err(|_| invalid())? * 10,
        _ => minor_part.parse().map_err(|_| invalid())?,
    };

    major
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(minor))
        .map(Money::from_cents)
        .ok_or_else(invalid)
}

/// Validates a fee or payment amount already in Money form.
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<Money> {
    if amount.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }
    Ok(amount)
}

/// Validates a calendar year for payments and promotions.
pub fn validate_year(year: i32) -> ValidationResult<i32> {
    if !(1900..=9999).contains(&year) {
        return Err(ValidationError::InvalidFormat {
            field: "year".to_string(),
            reason: "must be a four-digit year".to_string(),
        });
    }
    Ok(year)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form() -> StudentFields {
        StudentFields {
            name: " Asha Roy ".to_string(),
            father_name: Some("Ravi Roy".to_string()),
            mother_name: Some("   ".to_string()),
            father_mobile: "9800000001".to_string(),
            alternative_mobile: None,
            current_class: "Class 5".to_string(),
            section: Some("".to_string()),
        }
    }

    #[test]
    fn test_student_fields_normalized() {
        let fields = validate_student_fields(&form()).unwrap();
        assert_eq!(fields.name, "Asha Roy");
        assert_eq!(fields.mother_name, None);
        assert_eq!(fields.section, None);
        assert_eq!(fields.father_name.as_deref(), Some("Ravi Roy"));
    }

    #[test]
    fn test_student_fields_required() {
        let mut missing_name = form();
        missing_name.name = "  ".to_string();
        assert_eq!(
            validate_student_fields(&missing_name),
            Err(ValidationError::required("name"))
        );

        let mut missing_mobile = form();
        missing_mobile.father_mobile = String::new();
        assert_eq!(
            validate_student_fields(&missing_mobile),
            Err(ValidationError::required("father mobile"))
        );
    }

    #[test]
    fn test_student_id_format() {
        assert_eq!(format_student_id(1), "STU0001");
        assert_eq!(format_student_id(42), "STU0042");
        assert_eq!(format_student_id(10000), "STU10000");
    }

    #[test]
    fn test_parse_marks() {
        assert_eq!(parse_marks(" 40 ").unwrap(), 40.0);
        assert_eq!(parse_marks("0").unwrap(), 0.0);
        assert!(matches!(
            parse_marks("NaN"),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_marks("-1"),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
        assert!(matches!(
            parse_marks(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", "0").unwrap(), Money::zero());
        assert_eq!(parse_amount("amount", ".5").unwrap().cents(), 50);
        assert_eq!(parse_amount("amount", "12.").unwrap().cents(), 1200);
        assert_eq!(parse_amount("amount", "500.05").unwrap().cents(), 50005);
        assert!(matches!(
            parse_amount("amount", "-10"),
            Err(ValidationError::MustBeNonNegative { .. })
        ));
        assert!(matches!(
            parse_amount("amount", "."),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_amount("amount", "1e3"),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert!(matches!(
            parse_amount("amount", "99999999999999999999"),
            Err(ValidationError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn test_new_exam_rules() {
        let exam = NewExam {
            class_name: "Class 7".to_string(),
            exam_name: "Unit Test 1".to_string(),
            total_marks: 0.0,
            exam_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        };
        assert!(matches!(
            validate_new_exam(&exam),
            Err(ValidationError::MustBePositive { .. })
        ));

        let ok = NewExam {
            total_marks: 50.0,
            ..exam
        };
        assert!(validate_new_exam(&ok).is_ok());
    }

    #[test]
    fn test_year_and_password() {
        assert!(validate_year(2026).is_ok());
        assert!(validate_year(26).is_err());
        assert!(validate_password("  ").is_err());
        assert!(validate_password("s3cret").is_ok());
    }
}
