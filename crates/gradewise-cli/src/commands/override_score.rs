//! The `gradewise override` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use gradewise_core::submission::{Submission, SubmissionSet};

pub fn execute(path: PathBuf, student: String, question: String, score: f64) -> Result<()> {
    let mut set = SubmissionSet::load_json(&path)?;

    let submission = set.student_mut(&student)?;
    let index = resolve_question(submission, &question)?;
    let previous = submission.results[index].result.score;

    submission
        .override_score(index, score)
        .with_context(|| format!("cannot override question {question} for {student}"))?;

    println!(
        "{} [{}]: {} -> {}",
        student, submission.results[index].question_id, previous, submission.results[index].result.score
    );
    println!(
        "Total: {} / {} ({:.1}%, {})",
        submission.total_score,
        submission.total_marks,
        submission.percentage,
        submission.letter_grade()
    );

    set.save_json(&path)?;
    println!("Updated {}", path.display());
    Ok(())
}

/// A question number starting at 1, or a question id.
fn resolve_question(submission: &Submission, question: &str) -> Result<usize> {
    if let Ok(number) = question.parse::<usize>() {
        anyhow::ensure!(
            (1..=submission.results.len()).contains(&number),
            "question number {number} out of range (1-{})",
            submission.results.len()
        );
        return Ok(number - 1);
    }

    submission
        .results
        .iter()
        .position(|r| r.question_id == question)
        .with_context(|| format!("no question with id '{question}'"))
}
