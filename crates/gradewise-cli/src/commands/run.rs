//! The `gradewise run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use gradewise_core::batch::{BatchConfig, BatchGrader, ProgressReporter};
use gradewise_core::config::load_config_from;
use gradewise_core::parser;
use gradewise_core::statistics::ExamStats;
use gradewise_core::submission::{Submission, SubmissionSet};
use gradewise_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_sheet_start(&self, student_id: &str) {
        eprintln!("  Grading: {student_id}");
    }

    fn on_sheet_complete(&self, submission: &Submission) {
        eprintln!(
            "  Done: {} {} / {} ({:.1}%, {})",
            submission.student_id,
            submission.total_score,
            submission.total_marks,
            submission.percentage,
            submission.letter_grade(),
        );
    }

    fn on_sheet_error(&self, student_id: &str, error: &str) {
        eprintln!("  ERROR: {student_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} graded, {failed} failed ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputFormat {
    Json,
    Html,
}

fn parse_formats(format: &str) -> Result<Vec<OutputFormat>> {
    if format == "all" {
        return Ok(vec![OutputFormat::Json, OutputFormat::Html]);
    }
    format
        .split(',')
        .map(|f| match f.trim() {
            "json" => Ok(OutputFormat::Json),
            "html" => Ok(OutputFormat::Html),
            other => anyhow::bail!("unknown output format: {other} (expected json, html, or all)"),
        })
        .collect()
}

pub async fn execute(
    exam_path: PathBuf,
    answers_path: PathBuf,
    parallelism: Option<usize>,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let policy = config.validate()?;

    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let formats = parse_formats(&format)?;

    let exam = parser::parse_exam(&exam_path)?;
    for w in parser::validate_exam(&exam) {
        match &w.question_id {
            Some(id) => tracing::warn!("exam {} [{id}]: {}", exam.id, w.message),
            None => tracing::warn!("exam {}: {}", exam.id, w.message),
        }
    }

    let sheets = parser::load_answer_sheets(&answers_path)?;
    anyhow::ensure!(
        !sheets.is_empty(),
        "no answer sheets found in {}",
        answers_path.display()
    );

    eprintln!(
        "gradewise v{} - Grading {} answer sheets for {} ({} questions, policy: {})",
        env!("CARGO_PKG_VERSION"),
        sheets.len(),
        exam.title,
        exam.questions.len(),
        config.policy.preset,
    );
    eprintln!();

    let grader = BatchGrader::new(policy, BatchConfig { parallelism });
    let set = grader.run(&exam, sheets, &ConsoleReporter).await?;

    print_summary(&set, &ExamStats::compute(&exam, &set.submissions));

    // Save outputs
    std::fs::create_dir_all(&output)?;
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

    for fmt in formats {
        match fmt {
            OutputFormat::Json => {
                let path = output.join(format!("submissions-{timestamp}.json"));
                set.save_json(&path)?;
                eprintln!("Submissions saved to: {}", path.display());
            }
            OutputFormat::Html => {
                let path = output.join(format!("submissions-{timestamp}.html"));
                write_html_report(&set, &exam, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
        }
    }

    Ok(())
}

fn print_summary(set: &SubmissionSet, stats: &ExamStats) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Student", "Name", "Score", "Percentage", "Grade"]);

    for s in &set.submissions {
        table.add_row(vec![
            Cell::new(&s.student_id),
            Cell::new(&s.student_name),
            Cell::new(format!("{} / {}", s.total_score, s.total_marks)),
            Cell::new(format!("{:.1}%", s.percentage)),
            Cell::new(s.letter_grade()),
        ]);
    }

    println!("\n{table}");
    println!(
        "Mean {:.1}% | Median {:.1}% | Min {:.1}% | Max {:.1}% | Std dev {:.2}",
        stats.mean_percentage,
        stats.median_percentage,
        stats.min_percentage,
        stats.max_percentage,
        stats.std_dev,
    );
    println!(
        "Passed {} / {} ({:.1}%)",
        stats.pass_count, stats.submission_count, stats.pass_rate
    );
}
