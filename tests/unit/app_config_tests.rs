/*!
 * Tests for app configuration functionality
 */

use anyhow::Result;
use transeval::app_config::{Config, LogLevel};
use transeval::TerminologyMode;

use crate::common;

/// Test that a full configuration file round-trips through disk
#[test]
fn test_config_fromFile_withAllSections_shouldLoad() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let json = r#"{
        "source_language": "zh",
        "target_language": "en",
        "domain": "materials_science",
        "glossary_path": "glossary.json",
        "log_level": "debug",
        "evaluation": {
            "weights": {"bleu": 0.25, "terminology": 0.25, "sentence_structure": 0.25, "discourse": 0.25},
            "terminology_mode": "ai_extraction",
            "suggestion_threshold": 0.6,
            "extraction_timeout_secs": 10
        },
        "provider": {
            "base_url": "https://example.com",
            "api_version": "v2",
            "api_key": "secret",
            "model": "gpt-4o-mini"
        }
    }"#;
    let path = common::create_test_file(dir.path(), "conf.json", json)?;

    let config = Config::from_file(&path)?;
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.evaluation.terminology_mode, TerminologyMode::ExternalModel);
    assert_eq!(config.evaluation.weights.total(), 1.0);
    assert_eq!(config.evaluation.extraction_timeout_secs, 10);
    assert_eq!(config.provider.api_version, "v2");
    assert_eq!(config.provider.temperature, 0.3);
    assert!(config.provider.is_usable());
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that custom connective lists override the defaults category by category
#[test]
fn test_config_withCustomLexicon_shouldKeepOtherCategories() -> Result<()> {
    let json = r#"{"evaluation": {"lexicon": {"connectives": {"causal": ["hence"]}}}}"#;
    let config: Config = serde_json::from_str(json)?;
    let connectives = &config.evaluation.lexicon.connectives;
    assert_eq!(connectives.causal, vec!["hence".to_string()]);
    assert!(connectives.contrastive.iter().any(|c| c == "however"));
    assert!(!config.evaluation.lexicon.agentive_indicators.is_empty());
    Ok(())
}

/// Test that a malformed file reports the path
#[test]
fn test_config_fromFile_withInvalidJson_shouldFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "broken.json", "{ not json")?;
    let error = Config::from_file(&path).unwrap_err();
    assert!(error.to_string().contains("Failed to parse config file"));
    Ok(())
}

/// Test that an unknown language code fails validation
#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let config = Config {
        source_language: "xx".to_string(),
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

/// Test that all-zero weights are rejected
#[test]
fn test_validate_withZeroWeights_shouldFail() {
    let mut config = Config::default();
    config.evaluation.weights.bleu = 0.0;
    config.evaluation.weights.terminology = 0.0;
    config.evaluation.weights.sentence_structure = 0.0;
    config.evaluation.weights.discourse = 0.0;
    assert!(config.validate().is_err());
}

/// Test that the provider is unusable without an API key
#[test]
fn test_providerConfig_withoutKey_shouldBeUnusable() {
    let config = Config::default();
    assert!(!config.provider.is_usable());
}
