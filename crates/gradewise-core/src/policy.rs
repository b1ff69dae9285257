//! Scoring policy: weights, matching rules, and feedback thresholds.
//!
//! Two scoring revisions exist. [`ScoringPolicy::default`] is the lenient one
//! (model-relative coherence, stemmed-or-literal keywords);
//! [`ScoringPolicy::legacy`] reproduces the earlier fixed-bucket scoring so
//! both can be selected and compared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::results::Signals;

/// Tolerance used when checking that weights sum to 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Relative weight of each signal in the final fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weights {
    pub semantic: f64,
    pub keyword: f64,
    pub coherence: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            semantic: 0.50,
            keyword: 0.30,
            coherence: 0.20,
        }
    }
}

impl Weights {
    pub fn new(semantic: f64, keyword: f64, coherence: f64) -> Self {
        Self {
            semantic,
            keyword,
            coherence,
        }
    }

    pub fn sum(&self) -> f64 {
        self.semantic + self.keyword + self.coherence
    }

    /// Weighted sum of the signals. Not clamped.
    pub fn combine(&self, signals: &Signals) -> f64 {
        self.semantic * signals.similarity
            + self.keyword * signals.keyword_score
            + self.coherence * signals.coherence
    }

    /// Check that every weight is a finite non-negative number and that they
    /// sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("semantic", self.semantic),
            ("keyword", self.keyword),
            ("coherence", self.coherence),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigError::WeightSum { sum });
        }
        Ok(())
    }
}

impl FromStr for Weights {
    type Err = ConfigError;

    /// Parse `"0.5,0.3,0.2"` (semantic, keyword, coherence). Only the shape is
    /// checked here; call [`Weights::validate`] for the sum.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::MalformedWeights(s.to_string()))?;

        match parts.as_slice() {
            [semantic, keyword, coherence] => Ok(Self::new(*semantic, *keyword, *coherence)),
            _ => Err(ConfigError::MalformedWeights(s.to_string())),
        }
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.semantic, self.keyword, self.coherence)
    }
}

/// How a keyword is recognised in the student's answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatching {
    /// Stem overlap, or overlap of the literal (unfiltered) words.
    #[default]
    StemmedOrLiteral,
    /// Stem overlap only. Stop-word keywords can never match.
    StemmedOnly,
}

/// How answer length is turned into a coherence signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoherenceRule {
    /// Linear credit up to a minimum capped by the model answer's length.
    #[default]
    ModelRelative,
    /// 0.0 below `max(5, min_words / 2)`, 0.5 below `min_words`, else 1.0.
    FixedBuckets,
}

/// Cut-offs used to pick feedback clauses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    /// Final fraction at or above which the answer is "excellent".
    pub excellent: f64,
    /// Final fraction at or above which the answer is "good".
    pub good: f64,
    /// Final fraction at or above which the answer earns partial credit.
    pub partial: f64,
    /// Similarity below which the answer is flagged off-topic.
    pub off_topic: f64,
    /// Similarity below which the answer is flagged imprecise.
    pub imprecise: f64,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            excellent: 0.90,
            good: 0.70,
            partial: 0.45,
            off_topic: 0.30,
            imprecise: 0.50,
        }
    }
}

impl FeedbackThresholds {
    pub fn legacy() -> Self {
        Self {
            excellent: 0.85,
            good: 0.65,
            partial: 0.40,
            off_topic: 0.35,
            imprecise: 0.55,
        }
    }
}

/// Everything that decides how an answer is scored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: Weights,
    pub keyword_matching: KeywordMatching,
    pub coherence_rule: CoherenceRule,
    pub thresholds: FeedbackThresholds,
}

impl ScoringPolicy {
    /// The earlier scoring revision.
    pub fn legacy() -> Self {
        Self {
            weights: Weights::default(),
            keyword_matching: KeywordMatching::StemmedOnly,
            coherence_rule: CoherenceRule::FixedBuckets,
            thresholds: FeedbackThresholds::legacy(),
        }
    }

    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }
}

/// Named starting points for a [`ScoringPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyPreset {
    #[default]
    Default,
    Legacy,
}

impl PolicyPreset {
    pub fn policy(self) -> ScoringPolicy {
        match self {
            PolicyPreset::Default => ScoringPolicy::default(),
            PolicyPreset::Legacy => ScoringPolicy::legacy(),
        }
    }
}

impl fmt::Display for PolicyPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyPreset::Default => write!(f, "default"),
            PolicyPreset::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for PolicyPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" | "lenient" => Ok(PolicyPreset::Default),
            "legacy" | "strict" => Ok(PolicyPreset::Legacy),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let w = Weights::default();
        assert!((w.sum() - 1.0).abs() < 1e-12);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn weights_parse_and_display() {
        let w: Weights = "0.6, 0.3, 0.1".parse().unwrap();
        assert_eq!(w, Weights::new(0.6, 0.3, 0.1));
        assert_eq!(w.to_string(), "0.6,0.3,0.1");
        assert!("0.5,0.5".parse::<Weights>().is_err());
        assert!("a,b,c".parse::<Weights>().is_err());
    }

    #[test]
    fn weights_validation() {
        assert_eq!(
            Weights::new(0.5, 0.5, 0.5).validate(),
            Err(ConfigError::WeightSum { sum: 1.5 })
        );
        assert!(matches!(
            Weights::new(-0.1, 0.6, 0.5).validate(),
            Err(ConfigError::InvalidWeight { name: "semantic", .. })
        ));
        assert!(Weights::new(0.333, 0.333, 0.333).validate().is_ok());
    }

    #[test]
    fn combine_is_weighted_sum() {
        let signals = Signals {
            similarity: 1.0,
            keyword_score: 0.5,
            coherence: 0.0,
        };
        let combined = Weights::default().combine(&signals);
        assert!((combined - 0.65).abs() < 1e-12);
    }

    #[test]
    fn presets() {
        assert_eq!("legacy".parse::<PolicyPreset>().unwrap(), PolicyPreset::Legacy);
        assert_eq!("Default".parse::<PolicyPreset>().unwrap(), PolicyPreset::Default);
        assert!("fuzzy".parse::<PolicyPreset>().is_err());

        let legacy = PolicyPreset::Legacy.policy();
        assert_eq!(legacy.coherence_rule, CoherenceRule::FixedBuckets);
        assert_eq!(legacy.keyword_matching, KeywordMatching::StemmedOnly);
        assert_eq!(legacy.thresholds.excellent, 0.85);
    }

    #[test]
    fn policy_from_toml_with_partial_thresholds() {
        let policy: ScoringPolicy = toml::from_str(
            r#"
keyword_matching = "stemmed_only"
coherence_rule = "model_relative"

[weights]
semantic = 0.6
keyword = 0.2
coherence = 0.2

[thresholds]
excellent = 0.95
"#,
        )
        .unwrap();
        assert_eq!(policy.keyword_matching, KeywordMatching::StemmedOnly);
        assert_eq!(policy.weights.semantic, 0.6);
        assert_eq!(policy.thresholds.excellent, 0.95);
        assert_eq!(policy.thresholds.good, 0.70);
    }
}
