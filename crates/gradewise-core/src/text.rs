//! Text normalization, tokenization, and stemming.
//!
//! Everything here is a pure function over `&str`. The stop-word and suffix
//! tables are plain statics, so they can be read from any thread.

/// Function words removed before similarity and keyword matching.
///
/// Kept sorted so lookups can use binary search.
pub static STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "all", "also", "although", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "between", "both", "but", "by", "can",
    "could", "did", "do", "does", "during", "each", "for", "from", "had", "has", "have", "he",
    "her", "his", "how", "i", "if", "in", "into", "is", "it", "its", "may", "me", "might", "more",
    "most", "my", "no", "not", "of", "on", "only", "or", "other", "our", "out", "same", "shall",
    "she", "should", "since", "so", "some", "such", "than", "that", "the", "their", "then",
    "there", "these", "they", "this", "those", "through", "to", "up", "us", "was", "we", "were",
    "what", "when", "where", "which", "while", "who", "will", "with", "would", "you", "your",
];

/// Suffixes tried by [`stem`], in order. The first applicable one wins.
pub static SUFFIXES: &[&str] = &[
    "ation", "ations", "ing", "ings", "tion", "tions", "ness", "ment", "ments", "ers", "ies", "es",
    "ed", "ly", "s",
];

/// A suffix is only stripped if at least this many characters remain.
pub const MIN_STEM_LEN: usize = 3;

/// Characters removed before the exact-match comparison.
const EXACT_MATCH_STRIP: &[char] = &['.', ',', '!', '?', ';', ':', '\'', '"'];

/// Returns `true` if `word` (already lowercased) is a stop word.
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Lowercase `text`, turn every non-word character into a separator, and
/// split on whitespace. No stop-word or length filtering.
pub fn literal_words(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if is_word_char(c) || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned.split_whitespace().map(str::to_owned).collect()
}

/// Normalize and tokenize `text`: lowercase word tokens with stop words and
/// single-character tokens removed.
pub fn tokenize(text: &str) -> Vec<String> {
    literal_words(text)
        .into_iter()
        .filter(|t| t.len() > 1 && !is_stop_word(t))
        .collect()
}

/// Strip the first applicable suffix from [`SUFFIXES`].
///
/// Only one suffix is ever removed. Tokens whose stem would be shorter than
/// [`MIN_STEM_LEN`] characters are returned unchanged.
pub fn stem(token: &str) -> String {
    for suffix in SUFFIXES {
        if let Some(root) = token.strip_suffix(suffix) {
            if root.chars().count() >= MIN_STEM_LEN {
                return root.to_string();
            }
        }
    }
    token.to_string()
}

/// Stem every token in order.
pub fn stem_tokens(tokens: &[String]) -> Vec<String> {
    tokens.iter().map(|t| stem(t)).collect()
}

/// Tokenize then stem.
pub fn stemmed_tokens(text: &str) -> Vec<String> {
    stem_tokens(&tokenize(text))
}

/// Raw whitespace-separated word count. Stop words count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Normalization used for the exact-match shortcut: lowercase, drop
/// `.,!?;:'"`, collapse runs of whitespace.
pub fn normalize_for_exact_match(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !EXACT_MATCH_STRIP.contains(c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_words_are_sorted_and_unique() {
        assert!(STOP_WORDS.windows(2).all(|w| w[0] < w[1]));
        assert!(is_stop_word("the"));
        assert!(is_stop_word("although"));
        assert!(!is_stop_word("mitochondria"));
    }

    #[test]
    fn tokenize_strips_punctuation_and_stop_words() {
        let tokens = tokenize("The Mitochondria is the powerhouse of the cell!");
        assert_eq!(tokens, vec!["mitochondria", "powerhouse", "cell"]);
    }

    #[test]
    fn tokenize_drops_single_characters() {
        assert_eq!(tokenize("x = y + 2"), Vec::<String>::new());
        assert_eq!(tokenize("e.g. DNA-based"), vec!["dna", "based"]);
    }

    #[test]
    fn tokenize_keeps_underscores_and_digits() {
        assert_eq!(tokenize("snake_case vs 42 bits"), vec!["snake_case", "vs", "42", "bits"]);
    }

    #[test]
    fn tokenize_treats_non_ascii_as_separator() {
        assert_eq!(tokenize("café—naïve"), vec!["caf", "na", "ve"]);
    }

    #[test]
    fn tokenize_degenerate_inputs() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
        assert!(tokenize("?!... ---").is_empty());
    }

    #[test]
    fn literal_words_keep_stop_words() {
        assert_eq!(literal_words("It is, a TEST."), vec!["it", "is", "a", "test"]);
    }

    #[test]
    fn stem_common_suffixes() {
        assert_eq!(stem("sorting"), "sort");
        assert_eq!(stem("sorted"), "sort");
        assert_eq!(stem("algorithms"), "algorithm");
        assert_eq!(stem("quickly"), "quick");
        assert_eq!(stem("payments"), "pay");
        assert_eq!(stem("darkness"), "dark");
        assert_eq!(stem("studies"), "stud");
    }

    #[test]
    fn stem_respects_minimum_length() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("bed"), "bed");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("cats"), "cat");
    }

    #[test]
    fn stem_applies_first_matching_suffix_only() {
        // "ation" is listed before "s", "tion", and "ations".
        assert_eq!(stem("information"), "inform");
        // "ations" does not end in "ation", so "ations" is the first hit.
        assert_eq!(stem("relations"), "rel");
        // "ers" wins over "s"; no second pass.
        assert_eq!(stem("controllers"), "controll");
    }

    #[test]
    fn stem_is_stable_on_suffix_table() {
        for suffix in SUFFIXES {
            let once = stem(suffix);
            assert_eq!(stem(&once), once, "suffix {suffix} re-stems");
        }
    }

    #[test]
    fn word_count_is_whitespace_based() {
        assert_eq!(word_count("the cat  sat\non the mat"), 6);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("  "), 0);
    }

    #[test]
    fn exact_match_normalization() {
        assert_eq!(
            normalize_for_exact_match("  Paris is the CAPITAL of France. "),
            "paris is the capital of france"
        );
        assert_eq!(normalize_for_exact_match("\"Don't\" stop!"), "dont stop");
        assert_eq!(normalize_for_exact_match("a . b"), "a b");
    }
}
