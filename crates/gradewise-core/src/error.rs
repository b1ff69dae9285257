//! Error types for configuration and submission records.
//!
//! The grading engine itself never fails; these cover the layers around it
//! (loading a scoring policy, editing stored submissions).

use thiserror::Error;

/// Errors raised while building a scoring policy from configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A weight is negative or not a finite number.
    #[error("invalid {name} weight: {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    /// The three weights do not add up to 1.0.
    #[error("weights must sum to 1.0, got {sum:.3}")]
    WeightSum { sum: f64 },

    /// The weight string could not be parsed.
    #[error("invalid weights '{0}': expected three comma-separated numbers")]
    MalformedWeights(String),

    /// Unknown policy preset name.
    #[error("unknown policy preset: {0}")]
    UnknownPreset(String),

    /// Parallelism of zero.
    #[error("parallelism must be at least 1")]
    InvalidParallelism,
}

/// Errors raised when editing a stored submission.
#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    /// The question index does not exist in the submission.
    #[error("question {index} out of range (submission has {count} questions)")]
    QuestionOutOfRange { index: usize, count: usize },

    /// The override score is outside `[0, max_marks]`.
    #[error("score {score} out of range for a question worth {max_marks} marks")]
    ScoreOutOfRange { score: f64, max_marks: f64 },

    /// No submission exists for this student.
    #[error("no submission found for student: {0}")]
    StudentNotFound(String),

    /// More than one submission exists for this student.
    #[error("{count} submissions found for student {student_id}; expected one")]
    DuplicateStudent { student_id: String, count: usize },
}
