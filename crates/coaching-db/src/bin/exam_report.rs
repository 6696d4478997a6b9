//! # Exam Result Sheet
//!
//! Prints the result sheet of one exam, as text or JSON.
//!
//! ## Usage
//! ```bash
//! cargo run -p coaching-db --bin exam-report -- --exam 3
//! cargo run -p coaching-db --bin exam-report -- --exam 3 --json > exam-3.json
//! cargo run -p coaching-db --bin exam-report -- --list "Class 8"
//! ```

use coaching_db::{init_tracing, Database, DbConfig};
use std::env;
use std::process::ExitCode;

fn usage() {
    println!("Usage: exam-report [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -e, --exam <ID>      Exam to report on");
    println!("  -l, --list <CLASS>   List the exams of a class");
    println!("  -j, --json           Print JSON instead of text");
    println!("  -d, --db <PATH>      Database file (default: $COACHING_DB_PATH or ./coaching_center.db)");
    println!("  -h, --help           Show this help message");
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().collect();

    let mut config = DbConfig::from_env();
    let mut exam_id: Option<i64> = None;
    let mut list_class: Option<String> = None;
    let mut json = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--exam" | "-e" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(id) => exam_id = Some(id),
                        Err(_) => {
                            eprintln!("Not an exam id: {}", args[i + 1]);
                            return Ok(ExitCode::FAILURE);
                        }
                    }
                    i += 1;
                }
            }
            "--list" | "-l" => {
                if i + 1 < args.len() {
                    list_class = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--json" | "-j" => json = true,
            "--help" | "-h" => {
                usage();
                return Ok(ExitCode::SUCCESS);
            }
            other => eprintln!("Ignoring unknown argument: {}", other),
        }
        i += 1;
    }

    let db = Database::new(config).await?;

    if let Some(class_name) = list_class {
        let exams = db.exams().list_by_class(&class_name).await?;
        if exams.is_empty() {
            println!("No exams for {}", class_name);
        }
        for exam in exams {
            println!(
                "{:>5}  {}  {:<30} {:>7.2}",
                exam.exam_id, exam.exam_date, exam.exam_name, exam.total_marks
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let Some(exam_id) = exam_id else {
        usage();
        return Ok(ExitCode::FAILURE);
    };

    let Some(report) = db.reports().exam_report(exam_id).await? else {
        eprintln!("Exam {} not found", exam_id);
        return Ok(ExitCode::FAILURE);
    };

    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text());
    }

    db.close().await;
    Ok(ExitCode::SUCCESS)
}
