//! The `gradewise grade` command.

use anyhow::{Context, Result};

use gradewise_core::grader::Grader;
use gradewise_core::policy::{PolicyPreset, Weights};

/// Arguments of `gradewise grade`.
pub struct GradeArgs {
    pub model_answer: String,
    pub answer: String,
    pub keywords: Option<String>,
    pub max_marks: f64,
    pub min_words: usize,
    pub weights: Option<String>,
    pub policy: String,
    pub json: bool,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    anyhow::ensure!(
        args.max_marks.is_finite() && args.max_marks > 0.0,
        "max marks must be a positive number"
    );

    let preset: PolicyPreset = args.policy.parse()?;
    let mut policy = preset.policy();
    if let Some(w) = &args.weights {
        let weights: Weights = w.parse()?;
        weights.validate().context("invalid --weights")?;
        policy.weights = weights;
    }

    let keywords: Vec<String> = args
        .keywords
        .as_deref()
        .map(|k| {
            k.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let grader = Grader::new(policy);
    let result = grader.grade(
        &args.answer,
        &args.model_answer,
        &keywords,
        args.max_marks,
        args.min_words,
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "Score: {} / {} ({:.1}%)",
        result.score, result.max_marks, result.percentage
    );
    println!("  Similarity: {:.3}", result.semantic_similarity);
    println!("  Keywords:   {:.3}", result.keyword_score);
    println!("  Coherence:  {:.3}", result.coherence_score);
    if !result.matched_keywords.is_empty() {
        println!("Matched: {}", result.matched_keywords.join(", "));
    }
    if !result.missed_keywords.is_empty() {
        println!("Missed:  {}", result.missed_keywords.join(", "));
    }
    println!("Feedback: {}", result.feedback);

    Ok(())
}
