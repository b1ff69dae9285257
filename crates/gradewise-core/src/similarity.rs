//! Term-frequency cosine similarity with a stem-overlap floor.

use std::collections::{BTreeMap, BTreeSet};

use crate::text::stemmed_tokens;

/// Multiplier applied to the stem-overlap ratio before it is used as a
/// floor under the cosine score.
pub const OVERLAP_FLOOR: f64 = 0.95;

/// Term frequency (count / total) for each distinct token.
///
/// Ordered so that every sum over the vocabulary runs in the same order.
pub fn term_frequencies(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_default() += 1;
    }

    let total = tokens.len().max(1) as f64;
    counts
        .into_iter()
        .map(|(token, count)| (token, count as f64 / total))
        .collect()
}

fn magnitude(tf: &BTreeMap<&str, f64>) -> f64 {
    tf.values().map(|v| v * v).sum::<f64>().sqrt()
}

/// Cosine similarity of the TF vectors of two token lists.
///
/// Returns 0.0 when either list is empty.
pub fn cosine_similarity(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let tf_a = term_frequencies(a);
    let tf_b = term_frequencies(b);

    // Terms missing from either side contribute zero to the dot product.
    let dot: f64 = tf_a
        .iter()
        .filter_map(|(term, wa)| tf_b.get(term).map(|wb| wa * wb))
        .sum();

    let mag_a = magnitude(&tf_a);
    let mag_b = magnitude(&tf_b);
    if mag_a == 0.0 || mag_b == 0.0 {
        return 0.0;
    }

    (dot / (mag_a * mag_b)).min(1.0)
}

/// Share of the model's distinct stems that also appear in the student's.
///
/// 1.0 if the model has no stems, 0.0 if only the student has none.
pub fn overlap_ratio(student: &[String], model: &[String]) -> f64 {
    let model_set: BTreeSet<&str> = model.iter().map(String::as_str).collect();
    if model_set.is_empty() {
        return 1.0;
    }
    let student_set: BTreeSet<&str> = student.iter().map(String::as_str).collect();
    if student_set.is_empty() {
        return 0.0;
    }

    let shared = model_set.intersection(&student_set).count();
    shared as f64 / model_set.len() as f64
}

/// Similarity of two already stemmed token lists:
/// `max(cosine, OVERLAP_FLOOR * overlap)`.
pub fn token_similarity(student: &[String], model: &[String]) -> f64 {
    let cosine = cosine_similarity(student, model);
    let overlap = overlap_ratio(student, model);
    cosine.max(OVERLAP_FLOOR * overlap)
}

/// Similarity of a student answer to the model answer, in `[0, 1]`.
pub fn similarity(student_text: &str, model_text: &str) -> f64 {
    token_similarity(&stemmed_tokens(student_text), &stemmed_tokens(model_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn term_frequencies_sum_to_one() {
        let tokens = toks(&["cell", "cell", "wall", "plant"]);
        let tf = term_frequencies(&tokens);
        assert_eq!(tf["cell"], 0.5);
        assert_eq!(tf["wall"], 0.25);
        assert!((tf.values().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_identical_and_disjoint() {
        let a = toks(&["heap", "sort", "heap"]);
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&a, &toks(&["queue"])), 0.0);
    }

    #[test]
    fn cosine_empty_guard() {
        assert_eq!(cosine_similarity(&[], &toks(&["x1"])), 0.0);
        assert_eq!(cosine_similarity(&toks(&["x1"]), &[]), 0.0);
    }

    #[test]
    fn overlap_edge_cases() {
        assert_eq!(overlap_ratio(&[], &[]), 1.0);
        assert_eq!(overlap_ratio(&toks(&["cell"]), &[]), 1.0);
        assert_eq!(overlap_ratio(&[], &toks(&["cell"])), 0.0);
        assert_eq!(
            overlap_ratio(&toks(&["cell", "nucleus"]), &toks(&["cell", "wall"])),
            0.5
        );
    }

    #[test]
    fn overlap_floor_lifts_short_answers() {
        // One of three model stems: cosine = 1/sqrt(3), overlap = 1/3.
        let s = similarity("mitochondria", "The mitochondria is the powerhouse of the cell");
        assert!((s - 1.0 / 3f64.sqrt()).abs() < 1e-9, "got {s}");

        // Every model stem present, but padded with extra words.
        let s = similarity(
            "mitochondria powerhouse cell energy respiration glucose oxygen",
            "mitochondria powerhouse cell",
        );
        assert!((s - OVERLAP_FLOOR).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn similarity_uses_stems() {
        let s = similarity("sorting algorithms", "sorted algorithm");
        assert!((s - 1.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn similarity_degenerate_texts() {
        assert_eq!(similarity("", "photosynthesis in plants"), 0.0);
        assert_eq!(similarity("!!!", "photosynthesis"), 0.0);
        // A model answer made only of stop words leaves the floor at 0.95.
        assert!((similarity("anything", "it is what it is") - OVERLAP_FLOOR).abs() < 1e-12);
    }

    #[test]
    fn similarity_is_bounded() {
        let s = similarity("cell cell cell", "cell");
        assert!((0.0..=1.0).contains(&s));
    }
}
