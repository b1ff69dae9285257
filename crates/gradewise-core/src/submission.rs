//! Graded submissions with JSON persistence and teacher overrides.
//!
//! A [`Submission`] stores every per-question [`GradingResult`] verbatim next
//! to the question and answer text. Totals are derived data: they are
//! recomputed from the per-question scores whenever one of them changes.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SubmissionError;
use crate::model::{AnswerSheet, Exam};
use crate::results::{percentage_of, round_to, GradingResult};

/// One graded answer inside a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub question_text: String,
    pub answer_text: String,
    #[serde(flatten)]
    pub result: GradingResult,
    /// Set once a teacher has replaced the computed score.
    #[serde(default)]
    pub overridden: bool,
}

/// Letter grade bands over the submission percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 85.0 {
            LetterGrade::A
        } else if percentage >= 70.0 {
            LetterGrade::B
        } else if percentage >= 55.0 {
            LetterGrade::C
        } else if percentage >= 40.0 {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            LetterGrade::A => "Excellent",
            LetterGrade::B => "Good",
            LetterGrade::C => "Average",
            LetterGrade::D => "Pass",
            LetterGrade::F => "Fail",
        }
    }

    pub fn all() -> [LetterGrade; 5] {
        [
            LetterGrade::A,
            LetterGrade::B,
            LetterGrade::C,
            LetterGrade::D,
            LetterGrade::F,
        ]
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        };
        f.write_str(letter)
    }
}

/// A student's graded exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub exam_id: String,
    pub student_id: String,
    pub student_name: String,
    pub results: Vec<QuestionResult>,
    pub total_score: f64,
    pub total_marks: f64,
    pub percentage: f64,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    /// Assemble a submission and compute its totals.
    ///
    /// `total_marks` is the exam's total, so questions missing from
    /// `results` still count against the student.
    pub fn from_results(exam: &Exam, sheet: &AnswerSheet, results: Vec<QuestionResult>) -> Self {
        let mut submission = Self {
            id: Uuid::new_v4(),
            exam_id: exam.id.clone(),
            student_id: sheet.student_id.clone(),
            student_name: sheet.student_name.clone(),
            results,
            total_score: 0.0,
            total_marks: exam.total_marks(),
            percentage: 0.0,
            submitted_at: Utc::now(),
        };
        submission.recompute_totals();
        submission
    }

    /// Re-derive `total_score` and `percentage` from the current
    /// per-question scores.
    pub fn recompute_totals(&mut self) {
        let total: f64 = self.results.iter().map(|r| r.result.score).sum();
        self.total_score = round_to(total, 2);
        self.percentage = percentage_of(self.total_score, self.total_marks);
    }

    /// Replace the score of question `index` and recompute the totals.
    pub fn override_score(&mut self, index: usize, new_score: f64) -> Result<(), SubmissionError> {
        let count = self.results.len();
        let entry = self
            .results
            .get_mut(index)
            .ok_or(SubmissionError::QuestionOutOfRange { index, count })?;

        let max_marks = entry.result.max_marks;
        if !new_score.is_finite() || new_score < 0.0 || new_score > max_marks {
            return Err(SubmissionError::ScoreOutOfRange {
                score: new_score,
                max_marks,
            });
        }

        let previous = entry.result.score;
        entry.result.score = round_to(new_score, 2);
        entry.result.percentage = percentage_of(entry.result.score, max_marks);
        entry.overridden = true;

        tracing::info!(
            submission = %self.id,
            question = %entry.question_id,
            previous,
            score = entry.result.score,
            "score overridden"
        );

        self.recompute_totals();
        Ok(())
    }

    pub fn letter_grade(&self) -> LetterGrade {
        LetterGrade::from_percentage(self.percentage)
    }

    /// Save the submission as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    /// Load a submission from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// Summary of an exam (without the model answers).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamSummary {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    pub total_marks: f64,
}

impl From<&Exam> for ExamSummary {
    fn from(exam: &Exam) -> Self {
        Self {
            id: exam.id.clone(),
            title: exam.title.clone(),
            question_count: exam.questions.len(),
            total_marks: exam.total_marks(),
        }
    }
}

/// All submissions graded in one run against one exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSet {
    /// Unique run identifier.
    pub id: Uuid,
    /// When the set was created.
    pub created_at: DateTime<Utc>,
    pub exam: ExamSummary,
    pub submissions: Vec<Submission>,
    /// Total wall-clock grading duration in milliseconds.
    pub duration_ms: u64,
}

impl SubmissionSet {
    /// The only submission for `student_id`.
    pub fn student_mut(&mut self, student_id: &str) -> Result<&mut Submission, SubmissionError> {
        let count = self
            .submissions
            .iter()
            .filter(|s| s.student_id == student_id)
            .count();
        if count > 1 {
            return Err(SubmissionError::DuplicateStudent {
                student_id: student_id.to_string(),
                count,
            });
        }
        self.submissions
            .iter_mut()
            .find(|s| s.student_id == student_id)
            .ok_or_else(|| SubmissionError::StudentNotFound(student_id.to_string()))
    }

    /// Save the set as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        write_json(self, path)
    }

    /// Load a set from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize submissions")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)
        .with_context(|| format!("failed to write submissions to {}", path.display()))?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read submissions from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse submissions JSON: {}", path.display()))
}
