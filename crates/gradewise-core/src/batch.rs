//! Batch grading of many answer sheets against one exam.
//!
//! Each sheet is graded on the blocking pool under a semaphore permit, so at
//! most `parallelism` sheets are in flight. Results come back in the order
//! the sheets were given.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::grader::Grader;
use crate::model::{AnswerSheet, Exam};
use crate::policy::ScoringPolicy;
use crate::submission::{ExamSummary, QuestionResult, Submission, SubmissionSet};

/// Configuration for the batch grader.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum sheets graded concurrently.
    pub parallelism: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_sheet_start(&self, student_id: &str);
    fn on_sheet_complete(&self, submission: &Submission);
    fn on_sheet_error(&self, student_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_sheet_start(&self, _: &str) {}
    fn on_sheet_complete(&self, _: &Submission) {}
    fn on_sheet_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Grade every question of `exam` for one sheet.
///
/// Missing answers are graded as the no-answer sentinel; answers beyond the
/// last question are ignored.
pub fn grade_sheet(grader: &Grader, exam: &Exam, sheet: &AnswerSheet) -> Submission {
    if sheet.answers.len() > exam.questions.len() {
        tracing::warn!(
            student = %sheet.student_id,
            answers = sheet.answers.len(),
            questions = exam.questions.len(),
            "answer sheet has more answers than questions, ignoring the extra ones"
        );
    }

    let results = exam
        .questions
        .iter()
        .enumerate()
        .map(|(i, question)| {
            let answer = sheet.answer_for(i);
            QuestionResult {
                question_id: question.id.clone(),
                question_text: question.text.clone(),
                answer_text: answer.to_string(),
                result: grader.grade_question(question, answer),
                overridden: false,
            }
        })
        .collect();

    Submission::from_results(exam, sheet, results)
}

/// Grades answer sheets concurrently.
pub struct BatchGrader {
    grader: Grader,
    config: BatchConfig,
}

impl BatchGrader {
    pub fn new(policy: ScoringPolicy, config: BatchConfig) -> Self {
        Self {
            grader: Grader::new(policy),
            config,
        }
    }

    pub fn grader(&self) -> &Grader {
        &self.grader
    }

    /// Grade all `sheets` against `exam`.
    ///
    /// A sheet whose grading task fails is reported through `progress` and
    /// left out of the set; the rest of the batch continues. Each student is
    /// graded once: a later sheet with an already seen `student_id` is
    /// rejected the same way.
    pub async fn run(
        &self,
        exam: &Exam,
        sheets: Vec<AnswerSheet>,
        progress: &dyn ProgressReporter,
    ) -> Result<SubmissionSet> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let exam_arc = Arc::new(exam.clone());

        tracing::info!(
            exam = %exam.id,
            sheets = sheets.len(),
            parallelism = self.config.parallelism,
            "grading batch"
        );

        let total = sheets.len();
        let mut failed = 0usize;
        let mut seen: HashSet<String> = HashSet::new();
        let mut futures = FuturesUnordered::new();

        for (index, sheet) in sheets.into_iter().enumerate() {
            if !seen.insert(sheet.student_id.clone()) {
                tracing::warn!(
                    student = %sheet.student_id,
                    "duplicate answer sheet for student, keeping the first one"
                );
                progress.on_sheet_error(&sheet.student_id, "duplicate answer sheet");
                failed += 1;
                continue;
            }

            let semaphore = Arc::clone(&semaphore);
            let exam = Arc::clone(&exam_arc);
            let grader = self.grader.clone();
            let student_id = sheet.student_id.clone();

            futures.push(async move {
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    progress.on_sheet_start(&sheet.student_id);
                    let student = sheet.student_id.clone();
                    tokio::task::spawn_blocking(move || grade_sheet(&grader, &exam, &sheet))
                        .await
                        .with_context(|| format!("grading task for student {student} failed"))
                };
                (index, student_id, inner.await)
            });
        }

        let mut graded = Vec::with_capacity(futures.len());

        while let Some((index, student_id, result)) = futures.next().await {
            match result {
                Ok(submission) => {
                    progress.on_sheet_complete(&submission);
                    graded.push((index, submission));
                }
                Err(e) => {
                    tracing::error!("grading failed for {student_id}: {e:#}");
                    progress.on_sheet_error(&student_id, &e.to_string());
                    failed += 1;
                }
            }
        }

        graded.sort_by_key(|(index, _)| *index);
        let submissions: Vec<Submission> = graded.into_iter().map(|(_, s)| s).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(total, submissions.len(), failed, elapsed);

        Ok(SubmissionSet {
            id: run_id,
            created_at: chrono::Utc::now(),
            exam: ExamSummary::from(exam),
            submissions,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}
