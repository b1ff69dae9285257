//! Core data model types for gradewise.
//!
//! An [`Exam`] is a list of [`Question`]s authored by a teacher; an
//! [`AnswerSheet`] is one student's free-text answers to it.

use serde::{Deserialize, Serialize};

use crate::grader::NO_ANSWER_SENTINEL;

/// A single short-answer question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier, unique within the exam.
    pub id: String,
    /// The question as shown to students. Not used for scoring.
    #[serde(default)]
    pub text: String,
    /// The teacher's reference answer.
    pub model_answer: String,
    /// Concepts the answer is expected to mention.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Marks available for this question.
    pub max_marks: f64,
    /// Expected minimum answer length in words (0 = no minimum).
    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

pub(crate) fn default_min_words() -> usize {
    15
}

/// A published exam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default = "default_duration")]
    pub duration_minutes: u32,
    #[serde(default)]
    pub questions: Vec<Question>,
}

pub(crate) fn default_duration() -> u32 {
    30
}

impl Exam {
    /// Sum of `max_marks` over all questions.
    pub fn total_marks(&self) -> f64 {
        self.questions.iter().map(|q| q.max_marks).sum()
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// One student's answers, positionally matched to the exam's questions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheet {
    pub student_id: String,
    pub student_name: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl AnswerSheet {
    /// The answer to question `index`, or the no-answer sentinel if the sheet
    /// stops short.
    pub fn answer_for(&self, index: usize) -> &str {
        self.answers
            .get(index)
            .map(String::as_str)
            .unwrap_or(NO_ANSWER_SENTINEL)
    }
}
