//! # Exam Result Report
//!
//! The printable result sheet for one exam: every active student of the
//! exam's class with their obtained marks, plus highest and average.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Records Store                      This module                        │
//! │  ─────────────                      ───────────                        │
//! │  get exam        ──┐                                                   │
//! │  marks_by_exam   ──┼──► ExamReport ──► render_text() ──► print / save  │
//! │  highest/average ──┘               └─► to_json()     ──► other tools   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use ts_rs::TS;

use crate::types::{Exam, ExamRosterEntry};

/// Result sheet data for one exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamReport {
    pub exam: Exam,
    /// Roster order (enrollment order).
    pub entries: Vec<ExamRosterEntry>,
    /// 0 when no marks exist.
    pub highest: f64,
    /// 0 when no marks exist.
    pub average: f64,
}

impl ExamReport {
    /// Number of students with a mark entered.
    pub fn entered_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_entered()).count()
    }

    /// Number of students still without a mark.
    pub fn pending_count(&self) -> usize {
        self.entries.len() - self.entered_count()
    }

    /// Serializes the report for external tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Renders a fixed-width result sheet.
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use coaching_core::{Exam, ExamReport, ExamRosterEntry};
    ///
    /// let report = ExamReport {
    ///     exam: Exam {
    ///         exam_id: 1,
    ///         class_name: "Class 8".to_string(),
    ///         exam_name: "Algebra Quiz".to_string(),
    ///         total_marks: 50.0,
    ///         exam_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
    ///     },
    ///     entries: vec![ExamRosterEntry {
    ///         student_id: "STU0001".to_string(),
    ///         name: "Asha Roy".to_string(),
    ///         obtained_marks: Some(41.0),
    ///     }],
    ///     highest: 41.0,
    ///     average: 41.0,
    /// };
    ///
    /// let text = report.render_text();
    /// assert!(text.contains("Algebra Quiz"));
    /// assert!(text.contains("41.00 / 50.00"));
    /// ```
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let rule = "-".repeat(60);

        // Writing into a String cannot fail.
        let _ = writeln!(out, "Exam Result: {}", self.exam.exam_name);
        let _ = writeln!(
            out,
            "Class: {}    Date: {}    Total Marks: {:.2}",
            self.exam.class_name, self.exam.exam_date, self.exam.total_marks
        );
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "{:<10} {:<30} {:>17}", "ID", "Name", "Obtained");
        let _ = writeln!(out, "{}", rule);

        for entry in &self.entries {
            let obtained = match entry.obtained_marks {
                Some(value) => format!("{:.2} / {:.2}", value, self.exam.total_marks),
                None => "-".to_string(),
            };
            let _ = writeln!(
                out,
                "{:<10} {:<30} {:>17}",
                entry.student_id,
                truncate(&entry.name, 30),
                obtained
            );
        }

        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Highest: {:.2}    Average: {:.2}", self.highest, self.average);
        let _ = writeln!(
            out,
            "Entered: {}    Not entered: {}",
            self.entered_count(),
            self.pending_count()
        );

        out
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> ExamReport {
        ExamReport {
            exam: Exam {
                exam_id: 3,
                class_name: "Class 9".to_string(),
                exam_name: "Physics Midterm".to_string(),
                total_marks: 100.0,
                exam_date: NaiveDate::from_ymd_opt(2026, 5, 20).unwrap(),
            },
            entries: vec![
                ExamRosterEntry {
                    student_id: "STU0001".to_string(),
                    name: "Asha Roy".to_string(),
                    obtained_marks: Some(80.0),
                },
                ExamRosterEntry {
                    student_id: "STU0002".to_string(),
                    name: "Bikash Das".to_string(),
                    obtained_marks: None,
                },
                ExamRosterEntry {
                    student_id: "STU0003".to_string(),
                    name: "Chandana Sen".to_string(),
                    obtained_marks: Some(40.0),
                },
            ],
            highest: 80.0,
            average: 60.0,
        }
    }

    #[test]
    fn test_counts() {
        let report = sample();
        assert_eq!(report.entered_count(), 2);
        assert_eq!(report.pending_count(), 1);
    }

    #[test]
    fn test_render_lists_every_student_in_order() {
        let text = sample().render_text();
        let first = text.find("STU0001").unwrap();
        let second = text.find("STU0002").unwrap();
        let third = text.find("STU0003").unwrap();
        assert!(first < second && second < third);
        assert!(text.contains("Highest: 80.00    Average: 60.00"));
        assert!(text.contains("Entered: 2    Not entered: 1"));
        assert!(text.contains("2026-05-20"));
    }

    #[test]
    fn test_json_export_keeps_missing_marks_null() {
        let json = sample().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["entries"][1]["obtained_marks"].is_null());
        assert_eq!(value["exam"]["exam_date"], "2026-05-20");
    }

    #[test]
    fn test_truncate_long_names() {
        assert_eq!(truncate("short", 30), "short");
        assert_eq!(truncate("abcdef", 4), "abc~");
    }
}
