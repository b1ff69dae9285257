//! Exam and answer-sheet loading.
//!
//! Exams are TOML files; answer sheets are JSON (a single sheet or an array).

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{default_duration, default_min_words, AnswerSheet, Exam, Question};
use crate::text::tokenize;

/// Intermediate TOML structure for parsing exam files.
#[derive(Debug, Deserialize)]
struct TomlExamFile {
    exam: TomlExamHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlExamHeader {
    id: String,
    title: String,
    #[serde(default)]
    subject: String,
    #[serde(default = "default_duration")]
    duration_minutes: u32,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    text: String,
    model_answer: String,
    #[serde(default)]
    keywords: Vec<String>,
    max_marks: f64,
    #[serde(default = "default_min_words")]
    min_words: usize,
}

/// Parse a single TOML file into an [`Exam`].
pub fn parse_exam(path: &Path) -> Result<Exam> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read exam file: {}", path.display()))?;

    parse_exam_str(&content, path)
}

/// Parse a TOML string into an [`Exam`]. Questions without an `id` are
/// numbered `q1`, `q2`, ... by position.
pub fn parse_exam_str(content: &str, source_path: &Path) -> Result<Exam> {
    let parsed: TomlExamFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .enumerate()
        .map(|(i, q)| Question {
            id: q.id.unwrap_or_else(|| format!("q{}", i + 1)),
            text: q.text,
            model_answer: q.model_answer,
            keywords: q.keywords,
            max_marks: q.max_marks,
            min_words: q.min_words,
        })
        .collect();

    Ok(Exam {
        id: parsed.exam.id,
        title: parsed.exam.title,
        subject: parsed.exam.subject,
        duration_minutes: parsed.exam.duration_minutes,
        questions,
    })
}

/// Recursively load all `.toml` exam files from a directory.
pub fn load_exam_directory(dir: &Path) -> Result<Vec<Exam>> {
    let mut exams = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            exams.extend(load_exam_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_exam(&path) {
                Ok(exam) => exams.push(exam),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    exams.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(exams)
}

/// Load an exam from a file, or every exam under a directory.
pub fn load_exams(path: &Path) -> Result<Vec<Exam>> {
    if path.is_dir() {
        load_exam_directory(path)
    } else {
        Ok(vec![parse_exam(path)?])
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnswerFile {
    Many(Vec<AnswerSheet>),
    One(AnswerSheet),
}

/// Parse answer sheets from a JSON string holding one sheet or an array.
pub fn parse_answer_sheets_str(content: &str, source_path: &Path) -> Result<Vec<AnswerSheet>> {
    let parsed: AnswerFile = serde_json::from_str(content)
        .with_context(|| format!("failed to parse answer sheets: {}", source_path.display()))?;

    Ok(match parsed {
        AnswerFile::Many(sheets) => sheets,
        AnswerFile::One(sheet) => vec![sheet],
    })
}

/// Load answer sheets from a `.json` file, or every `.json` file in a
/// directory (non-recursive, sorted by file name).
pub fn load_answer_sheets(path: &Path) -> Result<Vec<AnswerSheet>> {
    if !path.is_dir() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer sheets: {}", path.display()))?;
        return parse_answer_sheets_str(&content, path);
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("failed to read directory: {}", path.display()))?
    {
        let file = entry?.path();
        if file.extension().is_some_and(|ext| ext == "json") {
            files.push(file);
        }
    }
    files.sort();

    let mut sheets = Vec::new();
    for file in files {
        let content = std::fs::read_to_string(&file)
            .with_context(|| format!("failed to read answer sheets: {}", file.display()))?;
        sheets.extend(parse_answer_sheets_str(&content, &file)?);
    }
    Ok(sheets)
}

/// A warning from exam validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an exam for common authoring mistakes.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if exam.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "exam has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &exam.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message: format!("duplicate question ID: {}", q.id),
            });
        }
    }

    for q in &exam.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message,
            })
        };

        if q.model_answer.trim().is_empty() {
            warn("model answer is empty".into());
        } else if tokenize(&q.model_answer).is_empty() {
            warn("model answer has no gradable words (only stop words or punctuation)".into());
        }

        if q.max_marks.is_nan() || q.max_marks <= 0.0 {
            warn(format!("max_marks must be positive, got {}", q.max_marks));
        }

        let mut seen_keywords = HashSet::new();
        for keyword in &q.keywords {
            if keyword.trim().is_empty() {
                warn("empty keyword".into());
            } else if !seen_keywords.insert(keyword.to_lowercase()) {
                warn(format!("duplicate keyword: {keyword}"));
            }
        }
    }

    warnings
}
