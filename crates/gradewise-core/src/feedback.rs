//! Natural-language feedback from the score breakdown.

use crate::policy::FeedbackThresholds;
use crate::results::Signals;

pub const PERFECT_FEEDBACK: &str =
    "Perfect answer! Your response matches the expected answer exactly.";

pub const NO_ANSWER_FEEDBACK: &str = "No answer was provided for this question.";

/// Coherence below this draws a "too brief" remark.
pub const BRIEF_COHERENCE: f64 = 0.5;

/// At most this many missed keywords are named in the feedback.
pub const MAX_LISTED_KEYWORDS: usize = 4;

/// Build the feedback string.
///
/// Clauses are independent and appended in a fixed order: quality tier,
/// similarity warning, missing keywords, length note.
pub fn generate_feedback(
    signals: &Signals,
    missed_keywords: &[String],
    final_fraction: f64,
    exact_match: bool,
    thresholds: &FeedbackThresholds,
) -> String {
    if exact_match {
        return PERFECT_FEEDBACK.to_string();
    }

    let mut parts: Vec<String> = Vec::new();

    let tier = if final_fraction >= thresholds.excellent {
        "Excellent answer! You addressed all the key points effectively."
    } else if final_fraction >= thresholds.good {
        "Good answer. You covered the main concepts with minor gaps."
    } else if final_fraction >= thresholds.partial {
        "Partial credit. Your answer touches on some relevant points but lacks depth."
    } else {
        "Your answer does not sufficiently address the question."
    };
    parts.push(tier.to_string());

    if signals.similarity < thresholds.off_topic {
        parts.push("Your response seems off-topic compared to the expected answer.".to_string());
    } else if signals.similarity < thresholds.imprecise {
        parts.push("The core concept is partially addressed but could be more precise.".to_string());
    }

    if !missed_keywords.is_empty() {
        let listed = missed_keywords
            .iter()
            .take(MAX_LISTED_KEYWORDS)
            .map(|k| format!("\"{k}\""))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Missing key concept(s): {listed}."));
    }

    if signals.coherence < BRIEF_COHERENCE {
        parts.push("Your answer is too brief; please elaborate.".to_string());
    } else if signals.coherence < 1.0 {
        parts.push("Consider expanding your answer with more detail.".to_string());
    }

    parts.join(" ")
}
