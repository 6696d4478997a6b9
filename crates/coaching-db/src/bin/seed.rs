//! # Demo Data Generator
//!
//! Fills a database with a believable coaching center: students in every
//! class, a few exams with marks, and this year's fee payments.
//!
//! ## Usage
//! ```bash
//! # Default: 6 students per class into ./coaching_center.db (or $COACHING_DB_PATH)
//! cargo run -p coaching-db --bin seed
//!
//! # More students, different file
//! cargo run -p coaching-db --bin seed -- --students 15 --db ./data/demo.db
//! ```
//!
//! Refuses to run against a database that already has students.

use chrono::{Datelike, Local, NaiveDate};
use coaching_core::{Month, NewExam, StudentFields};
use coaching_db::{init_tracing, Database, DbConfig};
use std::env;

const FIRST_NAMES: &[&str] = &[
    "Asha", "Bikash", "Chandana", "Dipa", "Emon", "Farhana", "Gautam", "Hasina", "Imran",
    "Joya", "Kamal", "Laboni", "Mahin", "Nadia", "Omar", "Priya", "Rafi", "Sumi", "Tanvir",
    "Urmi",
];

const FAMILY_NAMES: &[&str] = &[
    "Roy", "Das", "Sen", "Paul", "Hossain", "Rahman", "Chowdhury", "Saha", "Ahmed", "Barua",
];

const EXAM_NAMES: &[(&str, f64)] = &[("Monthly Test", 50.0), ("Mid Term", 100.0), ("Model Test", 100.0)];

const SECTIONS: &[&str] = &["A", "B"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut per_class: usize = 6;
    let mut config = DbConfig::from_env();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--students" | "-s" => {
                if i + 1 < args.len() {
                    per_class = args[i + 1].parse().unwrap_or(per_class);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Coaching Center Demo Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -s, --students <N>  Students per class (default: 6)");
                println!("  -d, --db <PATH>     Database file (default: $COACHING_DB_PATH or ./coaching_center.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    println!("Coaching Center Demo Data Generator");
    println!("===================================");
    println!("Database: {}", config.database_path.display());
    println!("Students per class: {}", per_class);
    println!();

    let db = Database::new(config).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.reports().active_student_count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} active students", existing);
        println!("  Skipping seed to avoid duplicates.");
        return Ok(());
    }

    let today = Local::now().date_naive();
    let year = today.year();
    let start = std::time::Instant::now();

    let mut admitted = 0usize;
    let mut marks = 0usize;
    let mut payments = 0usize;

    for (class_idx, class) in db.classes().list().await?.iter().enumerate() {
        let mut roster = Vec::with_capacity(per_class);

        for n in 0..per_class {
            let seed = class_idx * 31 + n * 7;
            let fields = demo_student(seed, &class.class_name);
            match db.students().add(&fields).await {
                Ok(id) => roster.push(id),
                Err(e) => eprintln!("Failed to admit {}: {}", fields.name, e),
            }
        }
        admitted += roster.len();

        for (exam_idx, (exam_name, total)) in EXAM_NAMES.iter().enumerate() {
            let exam_date = NaiveDate::from_ymd_opt(year, (exam_idx as u32) * 3 + 2, 15)
                .unwrap_or(today);
            let exam_id = db
                .exams()
                .create(&NewExam {
                    class_name: class.class_name.clone(),
                    exam_name: exam_name.to_string(),
                    total_marks: *total,
                    exam_date,
                })
                .await?;

            for (n, student_id) in roster.iter().enumerate() {
                // Every seventh student missed this exam
                if (n + exam_idx) % 7 == 6 {
                    continue;
                }
                let obtained = demo_mark(class_idx * 13 + n * 5 + exam_idx, *total);
                db.marks().upsert_mark(student_id, exam_id, obtained).await?;
                marks += 1;
            }
        }

        for (n, student_id) in roster.iter().enumerate() {
            for month in Month::ALL.iter().take(today.month() as usize) {
                // Some students are a month behind
                if n % 4 == 3 && month.number() == today.month() {
                    continue;
                }
                db.payments()
                    .record_monthly_fee(student_id, *month, year, None)
                    .await?;
                payments += 1;
            }
        }

        println!("  {}: {} students", class.class_name, roster.len());
    }

    println!();
    println!(
        "✓ Admitted {} students, {} marks, {} payments in {:?}",
        admitted,
        marks,
        payments,
        start.elapsed()
    );

    let summary = db.reports().summary().await?;
    println!();
    println!("Dashboard ({}):", summary.year);
    println!("  Active students: {}", summary.active_students);
    println!("  Classes:         {}", summary.classes);
    println!("  Exams:           {}", summary.exams);
    println!(
        "  Revenue:         {} ({} payments)",
        summary.revenue(),
        summary.paid_payments
    );

    db.close().await;
    Ok(())
}

/// Deterministic student record for a seed number.
fn demo_student(seed: usize, class_name: &str) -> StudentFields {
    let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
    let family = FAMILY_NAMES[(seed / 3) % FAMILY_NAMES.len()];
    let father = FIRST_NAMES[(seed + 5) % FIRST_NAMES.len()];

    StudentFields {
        name: format!("{} {}", first, family),
        father_name: Some(format!("{} {}", father, family)),
        mother_name: None,
        father_mobile: format!("017{:08}", 10_000_000 + seed * 7919 % 89_999_999),
        alternative_mobile: (seed % 3 == 0).then(|| format!("018{:08}", seed * 104_729 % 99_999_999)),
        current_class: class_name.to_string(),
        section: Some(SECTIONS[seed % SECTIONS.len()].to_string()),
    }
}

/// A mark between 40% and 98% of `total`, rounded to halves.
fn demo_mark(seed: usize, total: f64) -> f64 {
    let pct = 40.0 + ((seed * 37) % 59) as f64;
    (total * pct / 100.0 * 2.0).round() / 2.0
}
