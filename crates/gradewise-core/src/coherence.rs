//! Length-adequacy signal.

use crate::policy::CoherenceRule;
use crate::results::round_to;
use crate::text::word_count;

/// The word threshold an answer has to reach for full coherence credit.
///
/// Never larger than the model answer itself, so a one-word model answer
/// cannot demand a paragraph.
pub fn effective_minimum(min_words: usize, model_words: usize) -> usize {
    min_words.min(model_words.max(1))
}

/// Coherence under the default model-relative rule.
pub fn coherence(student_text: &str, model_text: &str, min_words: usize) -> f64 {
    evaluate_coherence(student_text, model_text, min_words, CoherenceRule::ModelRelative)
}

/// Coherence of `student_text` in `[0, 1]` under `rule`.
pub fn evaluate_coherence(
    student_text: &str,
    model_text: &str,
    min_words: usize,
    rule: CoherenceRule,
) -> f64 {
    let student_words = word_count(student_text);

    match rule {
        CoherenceRule::ModelRelative => {
            if student_words == 0 {
                return 0.0;
            }
            let minimum = effective_minimum(min_words, word_count(model_text));
            if student_words >= minimum {
                1.0
            } else {
                round_to(student_words as f64 / minimum as f64, 2)
            }
        }
        CoherenceRule::FixedBuckets => {
            if student_words < (min_words / 2).max(5) {
                0.0
            } else if student_words < min_words {
                0.5
            } else {
                1.0
            }
        }
    }
}
