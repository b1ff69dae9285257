//! The grading orchestrator.
//!
//! Grading one answer is a fixed decision sequence:
//!
//! 1. empty answer or `(no answer)`: zero marks, everything missed;
//! 2. exact match with the model answer (after light normalization): full
//!    marks;
//! 3. otherwise similarity, keyword coverage, and coherence are combined with
//!    the policy weights, clamped to `[0, 1]`, and scaled to `max_marks`.
//!
//! No step returns an error. Weights are taken as given; the final clamp is
//! the only protection against a misconfigured policy.

use crate::coherence::evaluate_coherence;
use crate::feedback::{generate_feedback, NO_ANSWER_FEEDBACK};
use crate::keywords::match_keywords;
use crate::model::Question;
use crate::policy::{ScoringPolicy, Weights};
use crate::results::{
    classify, percentage_of, round_to, Concern, GradingResult, Outcome, Signals,
};
use crate::similarity::token_similarity;
use crate::text::{normalize_for_exact_match, stemmed_tokens};

/// Placeholder stored for questions a student left blank.
pub const NO_ANSWER_SENTINEL: &str = "(no answer)";

/// Returns `true` for an empty (or whitespace-only) answer or the sentinel.
pub fn is_no_answer(answer: &str) -> bool {
    let trimmed = answer.trim();
    trimmed.is_empty() || trimmed == NO_ANSWER_SENTINEL
}

/// Returns `true` if both texts normalize to the same string.
pub fn is_exact_match(student_answer: &str, model_answer: &str) -> bool {
    normalize_for_exact_match(student_answer) == normalize_for_exact_match(model_answer)
}

/// Keep `score` within `[0, max_marks]` without panicking on a bad maximum.
fn clamp_score(score: f64, max_marks: f64) -> f64 {
    score.max(0.0).min(max_marks.max(0.0))
}

/// Grades answers under a fixed [`ScoringPolicy`].
///
/// Holds no mutable state; share it freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Grader {
    policy: ScoringPolicy,
}

impl Grader {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Grade a student's answer to `question`.
    pub fn grade_question(&self, question: &Question, answer: &str) -> GradingResult {
        self.grade(
            answer,
            &question.model_answer,
            &question.keywords,
            question.max_marks,
            question.min_words,
        )
    }

    /// Grade `student_answer` against `model_answer`.
    pub fn grade<S: AsRef<str>>(
        &self,
        student_answer: &str,
        model_answer: &str,
        keywords: &[S],
        max_marks: f64,
        min_words: usize,
    ) -> GradingResult {
        let keywords: Vec<String> = keywords.iter().map(|k| k.as_ref().to_string()).collect();

        if is_no_answer(student_answer) {
            tracing::debug!("no answer submitted, awarding zero");
            return GradingResult {
                score: 0.0,
                max_marks,
                percentage: 0.0,
                semantic_similarity: 0.0,
                keyword_score: 0.0,
                coherence_score: 0.0,
                matched_keywords: Vec::new(),
                missed_keywords: keywords,
                feedback: NO_ANSWER_FEEDBACK.to_string(),
                outcome: Outcome::NoAnswer,
                concerns: vec![Concern::NoAnswer],
            };
        }

        if is_exact_match(student_answer, model_answer) {
            tracing::debug!("answer matches model answer exactly");
            let score = clamp_score(round_to(max_marks, 2), max_marks);
            let feedback = generate_feedback(
                &Signals::default(),
                &[],
                1.0,
                true,
                &self.policy.thresholds,
            );
            return GradingResult {
                score,
                max_marks,
                percentage: percentage_of(score, max_marks),
                semantic_similarity: 1.0,
                keyword_score: 1.0,
                coherence_score: 1.0,
                matched_keywords: keywords,
                missed_keywords: Vec::new(),
                feedback,
                outcome: Outcome::ExactMatch,
                concerns: Vec::new(),
            };
        }

        let similarity =
            token_similarity(&stemmed_tokens(student_answer), &stemmed_tokens(model_answer));
        let keyword_report =
            match_keywords(student_answer, &keywords, self.policy.keyword_matching);
        let coherence = evaluate_coherence(
            student_answer,
            model_answer,
            min_words,
            self.policy.coherence_rule,
        );

        let signals = Signals {
            similarity,
            keyword_score: keyword_report.score,
            coherence,
        };

        // `max`/`min` rather than `clamp` so a NaN from bad weights becomes 0.
        let final_fraction = self.policy.weights.combine(&signals).max(0.0).min(1.0);
        let score = clamp_score(round_to(final_fraction * max_marks, 2), max_marks);

        tracing::debug!(
            similarity,
            keyword_score = keyword_report.score,
            coherence,
            final_fraction,
            score,
            "graded answer"
        );

        let feedback = generate_feedback(
            &signals,
            &keyword_report.missed,
            final_fraction,
            false,
            &self.policy.thresholds,
        );

        let concerns = classify(&signals, &keyword_report.missed, &self.policy.thresholds);

        GradingResult {
            score,
            max_marks,
            percentage: percentage_of(score, max_marks),
            semantic_similarity: round_to(similarity, 3),
            keyword_score: round_to(keyword_report.score, 3),
            coherence_score: round_to(coherence, 3),
            matched_keywords: keyword_report.matched,
            missed_keywords: keyword_report.missed,
            feedback,
            outcome: Outcome::Graded,
            concerns,
        }
    }
}

/// Grade one answer with the default policy and the given weights.
pub fn grade<S: AsRef<str>>(
    student_answer: &str,
    model_answer: &str,
    keywords: &[S],
    max_marks: f64,
    min_words: usize,
    weights: Weights,
) -> GradingResult {
    Grader::new(ScoringPolicy::default().with_weights(weights)).grade(
        student_answer,
        model_answer,
        keywords,
        max_marks,
        min_words,
    )
}
