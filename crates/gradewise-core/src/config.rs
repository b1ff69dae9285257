//! `gradewise.toml` configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::{
    CoherenceRule, FeedbackThresholds, KeywordMatching, PolicyPreset, ScoringPolicy, Weights,
};

/// File name searched for in the current directory.
pub const CONFIG_FILE_NAME: &str = "gradewise.toml";

/// Top-level gradewise configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradewiseConfig {
    /// Scoring policy selection and overrides.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Max answer sheets graded concurrently.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Output directory for submission files and reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_parallelism() -> usize {
    4
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./gradewise-results")
}

impl Default for GradewiseConfig {
    fn default() -> Self {
        Self {
            policy: PolicyConfig::default(),
            parallelism: default_parallelism(),
            output_dir: default_output_dir(),
        }
    }
}

impl GradewiseConfig {
    /// Check the settings and build the scoring policy they describe.
    pub fn validate(&self) -> Result<ScoringPolicy, ConfigError> {
        if self.parallelism == 0 {
            return Err(ConfigError::InvalidParallelism);
        }
        self.policy.resolve()
    }
}

/// The `[policy]` table. Every field except `preset` overrides the preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub preset: PolicyPreset,
    #[serde(default)]
    pub weights: Option<Weights>,
    #[serde(default)]
    pub keyword_matching: Option<KeywordMatching>,
    #[serde(default)]
    pub coherence_rule: Option<CoherenceRule>,
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

/// Individual feedback thresholds to replace in the preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdOverrides {
    pub excellent: Option<f64>,
    pub good: Option<f64>,
    pub partial: Option<f64>,
    pub off_topic: Option<f64>,
    pub imprecise: Option<f64>,
}

impl ThresholdOverrides {
    fn apply(&self, base: FeedbackThresholds) -> FeedbackThresholds {
        FeedbackThresholds {
            excellent: self.excellent.unwrap_or(base.excellent),
            good: self.good.unwrap_or(base.good),
            partial: self.partial.unwrap_or(base.partial),
            off_topic: self.off_topic.unwrap_or(base.off_topic),
            imprecise: self.imprecise.unwrap_or(base.imprecise),
        }
    }
}

impl PolicyConfig {
    /// Start from the preset, apply the overrides, and validate the weights.
    pub fn resolve(&self) -> Result<ScoringPolicy, ConfigError> {
        let mut policy = self.preset.policy();
        if let Some(weights) = self.weights {
            policy.weights = weights;
        }
        if let Some(rule) = self.keyword_matching {
            policy.keyword_matching = rule;
        }
        if let Some(rule) = self.coherence_rule {
            policy.coherence_rule = rule;
        }
        policy.thresholds = self.thresholds.apply(policy.thresholds);

        policy.weights.validate()?;
        Ok(policy)
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `gradewise.toml` in the current directory
/// 2. `~/.config/gradewise/config.toml`
///
/// Environment variable overrides: `GRADEWISE_PARALLELISM`, `GRADEWISE_OUTPUT_DIR`.
pub fn load_config() -> Result<GradewiseConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<GradewiseConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match &config_path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => GradewiseConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    config
        .validate()
        .context("invalid gradewise configuration")?;

    tracing::debug!(path = ?config_path, ?config, "loaded configuration");
    Ok(config)
}

/// Parse a configuration document.
pub fn parse_config_str(content: &str) -> Result<GradewiseConfig> {
    Ok(toml::from_str(content)?)
}

/// Apply `GRADEWISE_*` overrides using `lookup` to read variables.
fn apply_env_overrides(
    config: &mut GradewiseConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    if let Some(value) = lookup("GRADEWISE_PARALLELISM") {
        config.parallelism = value
            .trim()
            .parse()
            .with_context(|| format!("invalid GRADEWISE_PARALLELISM: {value}"))?;
    }
    if let Some(dir) = lookup("GRADEWISE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }
    Ok(())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("gradewise"))
}

/// Starter configuration written by `gradewise init`.
pub const DEFAULT_CONFIG_TOML: &str = r#"# gradewise configuration

# Max answer sheets graded concurrently.
parallelism = 4

# Where submission files and reports are written.
output_dir = "./gradewise-results"

[policy]
# "default" or "legacy"
preset = "default"

# Must sum to 1.0.
# weights = { semantic = 0.5, keyword = 0.3, coherence = 0.2 }

# "stemmed_or_literal" or "stemmed_only"
# keyword_matching = "stemmed_or_literal"

# "model_relative" or "fixed_buckets"
# coherence_rule = "model_relative"

# [policy.thresholds]
# excellent = 0.90
# good = 0.70
# partial = 0.45
# off_topic = 0.30
# imprecise = 0.50
"#;
