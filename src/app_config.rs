use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::evaluation::feedback::DEFAULT_SUGGESTION_THRESHOLD;
use crate::evaluation::lexicon::Lexicon;
use crate::evaluation::model::{
    WeightConfig, default_domain, default_source_language, default_target_language,
};
use crate::evaluation::terminology::TerminologyMode;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Domain tag used for glossary lookup
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Glossary file (JSON), optional
    #[serde(default)]
    pub glossary_path: Option<PathBuf>,

    /// Evaluation settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Text-completion provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Scoring settings shared by every evaluation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvaluationConfig {
    /// Sub-score weights
    #[serde(default)]
    pub weights: WeightConfig,

    /// How term pairs are acquired
    #[serde(default)]
    pub terminology_mode: TerminologyMode,

    /// Sub-scores below this produce suggestions
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: f32,

    /// Upper bound on a term extraction call, in seconds
    #[serde(default = "default_extraction_timeout_secs")]
    pub extraction_timeout_secs: u64,

    /// Word lists used by the heuristics
    #[serde(default)]
    pub lexicon: Lexicon,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            terminology_mode: TerminologyMode::default(),
            suggestion_threshold: default_suggestion_threshold(),
            extraction_timeout_secs: default_extraction_timeout_secs(),
            lexicon: Lexicon::default(),
        }
    }
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Whether model-based term extraction may call the provider
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Service URL without the version segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API version path segment
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// API key
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Temperature for generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Request timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_base_url(),
            api_version: default_api_version(),
            api_key: String::new(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    /// Whether the provider can be used at all
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_suggestion_threshold() -> f32 {
    DEFAULT_SUGGESTION_THRESHOLD
}

fn default_extraction_timeout_secs() -> u64 {
    60
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_temperature() -> f32 {
    0.3
}

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_api_version() -> String {
    "v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

impl Config {
    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Load the configuration, creating a default file if none exists
    ///
    /// Returns the configuration and whether it was freshly created.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::from_file(path)?, false))
        } else {
            let config = Self::default();
            config.save(path)?;
            Ok((config, true))
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Validate languages
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        if self.domain.trim().is_empty() {
            return Err(anyhow!("Domain must not be empty"));
        }

        for (name, weight) in self.evaluation.weights.named() {
            if !weight.is_finite() || weight < 0.0 {
                return Err(anyhow!("Weight '{}' must be a non-negative number, got {}", name, weight));
            }
        }
        if self.evaluation.weights.total() <= 0.0 {
            return Err(anyhow!("At least one score weight must be positive"));
        }

        let threshold = self.evaluation.suggestion_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(anyhow!("Suggestion threshold must be within [0, 1], got {}", threshold));
        }

        if self.evaluation.extraction_timeout_secs == 0 {
            return Err(anyhow!("Extraction timeout must be at least one second"));
        }

        url::Url::parse(&self.provider.base_url)
            .with_context(|| format!("Invalid provider base URL: {}", self.provider.base_url))?;

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(anyhow!(
                "Provider temperature must be within [0, 2], got {}",
                self.provider.temperature
            ));
        }

        if self.evaluation.terminology_mode == TerminologyMode::ExternalModel && !self.provider.is_usable() {
            log::warn!(
                "Terminology mode is {} but no usable provider is configured; terminology will score 0.5",
                self.evaluation.terminology_mode
            );
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            domain: default_domain(),
            glossary_path: None,
            evaluation: EvaluationConfig::default(),
            provider: ProviderConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
