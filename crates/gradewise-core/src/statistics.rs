//! Aggregate statistics over the submissions for one exam.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::Exam;
use crate::results::{percentage_of, round_to, GradingResult, Outcome};
use crate::submission::{LetterGrade, Submission};

/// Submissions at or above this percentage count as passed.
pub const PASS_PERCENTAGE: f64 = 50.0;

/// How many missed keywords are kept per question.
pub const TOP_MISSED_KEYWORDS: usize = 5;

/// Class-level statistics for an exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamStats {
    pub submission_count: usize,
    pub mean_percentage: f64,
    pub median_percentage: f64,
    pub min_percentage: f64,
    pub max_percentage: f64,
    /// Population standard deviation of the percentages.
    pub std_dev: f64,
    /// Submissions at or above [`PASS_PERCENTAGE`].
    pub pass_count: usize,
    /// `100 * pass_count / submission_count`, one decimal; 0 with no submissions.
    pub pass_rate: f64,
    /// Submissions per letter grade; every grade is present, possibly zero.
    pub grade_distribution: BTreeMap<LetterGrade, usize>,
    /// One entry per exam question, in exam order.
    pub questions: Vec<QuestionStats>,
}

/// Statistics for a single question across all submissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionStats {
    pub question_id: String,
    pub max_marks: f64,
    /// Number of submissions that contain this question, blank or not.
    pub submissions: usize,
    /// Of those, how many left it blank.
    pub no_answer_count: usize,
    pub average_score: f64,
    pub average_percentage: f64,
    pub average_similarity: f64,
    pub average_keyword_score: f64,
    pub average_coherence: f64,
    /// Most frequently missed keywords with their counts, most missed first.
    pub most_missed_keywords: Vec<(String, usize)>,
}

impl ExamStats {
    /// Compute statistics. Submissions are matched to questions by id.
    pub fn compute(exam: &Exam, submissions: &[Submission]) -> Self {
        let percentages: Vec<f64> = submissions.iter().map(|s| s.percentage).collect();

        let mut grade_distribution: BTreeMap<LetterGrade, usize> =
            LetterGrade::all().into_iter().map(|g| (g, 0)).collect();
        for submission in submissions {
            *grade_distribution.entry(submission.letter_grade()).or_default() += 1;
        }

        let pass_count = percentages.iter().filter(|&&p| p >= PASS_PERCENTAGE).count();

        let questions = exam
            .questions
            .iter()
            .map(|q| question_stats(&q.id, q.max_marks, submissions))
            .collect();

        Self {
            submission_count: submissions.len(),
            mean_percentage: round_to(mean(&percentages), 1),
            median_percentage: round_to(median(&percentages), 1),
            min_percentage: percentages.iter().copied().reduce(f64::min).unwrap_or(0.0),
            max_percentage: percentages.iter().copied().reduce(f64::max).unwrap_or(0.0),
            std_dev: round_to(std_dev(&percentages), 2),
            pass_count,
            pass_rate: percentage_of(pass_count as f64, submissions.len() as f64),
            grade_distribution,
            questions,
        }
    }

    pub fn question(&self, question_id: &str) -> Option<&QuestionStats> {
        self.questions.iter().find(|q| q.question_id == question_id)
    }
}

fn question_stats(question_id: &str, max_marks: f64, submissions: &[Submission]) -> QuestionStats {
    let results: Vec<&GradingResult> = submissions
        .iter()
        .flat_map(|s| s.results.iter())
        .filter(|r| r.question_id == question_id)
        .map(|r| &r.result)
        .collect();

    let mut missed: BTreeMap<&str, usize> = BTreeMap::new();
    for result in &results {
        if result.outcome == Outcome::NoAnswer {
            continue;
        }
        for keyword in &result.missed_keywords {
            *missed.entry(keyword.as_str()).or_default() += 1;
        }
    }
    let mut most_missed: Vec<(String, usize)> =
        missed.into_iter().map(|(k, n)| (k.to_string(), n)).collect();
    // Stable sort keeps the alphabetical order among equal counts.
    most_missed.sort_by(|a, b| b.1.cmp(&a.1));
    most_missed.truncate(TOP_MISSED_KEYWORDS);

    QuestionStats {
        question_id: question_id.to_string(),
        max_marks,
        submissions: results.len(),
        no_answer_count: results
            .iter()
            .filter(|r| r.outcome == Outcome::NoAnswer)
            .count(),
        average_score: round_to(average(&results, |r| r.score), 2),
        average_percentage: round_to(average(&results, |r| r.percentage), 1),
        average_similarity: round_to(average(&results, |r| r.semantic_similarity), 3),
        average_keyword_score: round_to(average(&results, |r| r.keyword_score), 3),
        average_coherence: round_to(average(&results, |r| r.coherence_score), 3),
        most_missed_keywords: most_missed,
    }
}

fn average(results: &[&GradingResult], field: impl Fn(&GradingResult) -> f64) -> f64 {
    let values: Vec<f64> = results.iter().map(|r| field(r)).collect();
    mean(&values)
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
