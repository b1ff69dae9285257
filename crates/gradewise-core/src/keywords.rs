//! Keyword coverage.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::policy::KeywordMatching;
use crate::text::{literal_words, stemmed_tokens};

/// Which keywords an answer covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordReport {
    /// `matched.len() / keywords.len()`, or 1.0 when there are no keywords.
    pub score: f64,
    pub matched: Vec<String>,
    pub missed: Vec<String>,
}

impl KeywordReport {
    fn vacuous() -> Self {
        Self {
            score: 1.0,
            matched: Vec::new(),
            missed: Vec::new(),
        }
    }
}

/// Keyword coverage using the default stemmed-or-literal rule.
pub fn keyword_score<S: AsRef<str>>(student_text: &str, keywords: &[S]) -> KeywordReport {
    match_keywords(student_text, keywords, KeywordMatching::StemmedOrLiteral)
}

/// Split `keywords` into matched and missed for `student_text`.
///
/// Both output lists keep the input order, and every input keyword lands in
/// exactly one of them. A keyword with no words at all is always missed.
pub fn match_keywords<S: AsRef<str>>(
    student_text: &str,
    keywords: &[S],
    rule: KeywordMatching,
) -> KeywordReport {
    if keywords.is_empty() {
        return KeywordReport::vacuous();
    }

    let student_stems: BTreeSet<String> = stemmed_tokens(student_text).into_iter().collect();
    let student_words: BTreeSet<String> = literal_words(student_text).into_iter().collect();

    let mut matched = Vec::new();
    let mut missed = Vec::new();

    for keyword in keywords {
        let keyword = keyword.as_ref();
        let stem_hit = stemmed_tokens(keyword)
            .iter()
            .any(|s| student_stems.contains(s));
        let literal_hit = rule == KeywordMatching::StemmedOrLiteral
            && literal_words(keyword)
                .iter()
                .any(|w| student_words.contains(w));

        if stem_hit || literal_hit {
            matched.push(keyword.to_string());
        } else {
            missed.push(keyword.to_string());
        }
    }

    let score = matched.len() as f64 / keywords.len() as f64;
    KeywordReport {
        score,
        matched,
        missed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keywords_is_vacuously_satisfied() {
        let report = keyword_score::<&str>("anything at all", &[]);
        assert_eq!(report.score, 1.0);
        assert!(report.matched.is_empty());
        assert!(report.missed.is_empty());
    }

    #[test]
    fn stemmed_match() {
        let report = keyword_score(
            "Merge sort recursively splits the array before merging.",
            &["merges", "sorting", "heap"],
        );
        assert_eq!(report.matched, vec!["merges", "sorting"]);
        assert_eq!(report.missed, vec!["heap"]);
        assert!((report.score - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn multi_word_keyword_needs_any_word() {
        let report = keyword_score("Plants capture light energy.", &["light reaction"]);
        assert_eq!(report.matched, vec!["light reaction"]);
    }

    #[test]
    fn literal_fallback_matches_stop_words_and_short_tokens() {
        let report = keyword_score("A is the first letter, and it is a vowel.", &["A", "it"]);
        assert_eq!(report.matched, vec!["A", "it"]);
        assert_eq!(report.score, 1.0);
    }

    #[test]
    fn stemmed_only_rule_ignores_literal_words() {
        let report = match_keywords(
            "A is the first letter, and it is a vowel.",
            &["A", "it", "vowels"],
            KeywordMatching::StemmedOnly,
        );
        assert_eq!(report.matched, vec!["vowels"]);
        assert_eq!(report.missed, vec!["A", "it"]);
    }

    #[test]
    fn keyword_matching_is_case_and_punctuation_insensitive() {
        let report = keyword_score("the tcp/ip stack", &["TCP", "IP", "UDP"]);
        assert_eq!(report.matched, vec!["TCP", "IP"]);
        assert_eq!(report.missed, vec!["UDP"]);
    }

    #[test]
    fn empty_keyword_is_missed() {
        let report = keyword_score("some answer", &["", "answer", "?!"]);
        assert_eq!(report.matched, vec!["answer"]);
        assert_eq!(report.missed, vec!["", "?!"]);
    }

    #[test]
    fn duplicates_are_preserved() {
        let report = keyword_score("cells divide", &["cell", "cell", "mitosis"]);
        assert_eq!(report.matched, vec!["cell", "cell"]);
        assert_eq!(report.missed, vec!["mitosis"]);
    }

    #[test]
    fn empty_answer_misses_everything() {
        let report = keyword_score("", &["osmosis", "membrane"]);
        assert_eq!(report.score, 0.0);
        assert_eq!(report.missed, vec!["osmosis", "membrane"]);
    }
}
