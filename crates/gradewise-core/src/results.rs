//! Grading result types.

use serde::{Deserialize, Serialize};

use crate::feedback::BRIEF_COHERENCE;
use crate::policy::FeedbackThresholds;

/// Which branch of the grader produced a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Empty answer or the `(no answer)` sentinel.
    NoAnswer,
    /// Answer identical to the model answer after normalization.
    ExactMatch,
    /// Scored from the weighted signals.
    #[default]
    Graded,
}

/// Reporting categories derived from a result. These are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    NoAnswer,
    OffTopic,
    Incomplete,
    TooBrief,
}

/// The three component signals, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub similarity: f64,
    pub keyword_score: f64,
    pub coherence: f64,
}

/// The outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    /// Awarded marks, `0 <= score <= max_marks`, two decimals.
    pub score: f64,
    /// Maximum marks for the question, echoed from the input.
    pub max_marks: f64,
    /// `100 * score / max_marks`, one decimal.
    pub percentage: f64,
    /// Similarity to the model answer, three decimals.
    pub semantic_similarity: f64,
    /// Fraction of keywords found, three decimals.
    pub keyword_score: f64,
    /// Length adequacy, three decimals.
    pub coherence_score: f64,
    /// Keywords found in the answer, in input order.
    pub matched_keywords: Vec<String>,
    /// Keywords not found in the answer, in input order.
    pub missed_keywords: Vec<String>,
    /// Human-readable feedback.
    pub feedback: String,
    #[serde(default)]
    pub outcome: Outcome,
    /// Reporting categories, decided from the unrounded signals.
    #[serde(default)]
    pub concerns: Vec<Concern>,
}

impl GradingResult {
    /// Component signals as stored (rounded).
    pub fn signals(&self) -> Signals {
        Signals {
            similarity: self.semantic_similarity,
            keyword_score: self.keyword_score,
            coherence: self.coherence_score,
        }
    }
}

/// Reporting categories for a graded answer.
///
/// Takes the same unrounded signals and thresholds as the feedback text, so
/// an "off-topic" or "too brief" remark always has a matching concern.
pub fn classify(
    signals: &Signals,
    missed_keywords: &[String],
    thresholds: &FeedbackThresholds,
) -> Vec<Concern> {
    let mut concerns = Vec::new();
    if signals.similarity < thresholds.off_topic {
        concerns.push(Concern::OffTopic);
    }
    if !missed_keywords.is_empty() {
        concerns.push(Concern::Incomplete);
    }
    if signals.coherence < BRIEF_COHERENCE {
        concerns.push(Concern::TooBrief);
    }
    concerns
}

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// `100 * score / max_marks` rounded to one decimal and kept in `[0, 100]`.
/// A non-positive maximum yields 0.
pub fn percentage_of(score: f64, max_marks: f64) -> f64 {
    if max_marks > 0.0 {
        round_to(100.0 * score / max_marks, 1).max(0.0).min(100.0)
    } else {
        0.0
    }
}
