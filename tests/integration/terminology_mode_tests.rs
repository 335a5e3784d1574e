/*!
 * Tests for the three terminology acquisition modes
 */

use anyhow::Result;
use std::sync::Arc;

use transeval::app_config::EvaluationConfig;
use transeval::providers::mock::MockProvider;
use transeval::{Evaluator, InMemoryGlossary, TermExtractionRequest, TerminologyMode};

use crate::common;

fn config(mode: TerminologyMode) -> EvaluationConfig {
    EvaluationConfig {
        terminology_mode: mode,
        extraction_timeout_secs: 1,
        ..EvaluationConfig::default()
    }
}

fn glossary() -> Result<Arc<InMemoryGlossary>> {
    Ok(Arc::new(InMemoryGlossary::from_json_str(
        common::GLOSSARY_JSON,
        "materials_science",
        "zh",
        "en",
    )?))
}

#[tokio::test]
async fn test_referenceMode_withReference_shouldReportExtractedTerms() {
    common::init_logging();
    let evaluator = Evaluator::new(config(TerminologyMode::ReferenceAlignment));
    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]))
        .await;

    assert!(result.extracted_terms.is_some());
    assert!((0.0..=1.0).contains(&result.terminology.score));
}

#[tokio::test]
async fn test_referenceMode_withoutReference_shouldFallBackToGlossary() -> Result<()> {
    let evaluator = Evaluator::new(config(TerminologyMode::ReferenceAlignment)).with_glossary(glossary()?);
    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[]))
        .await;

    assert!(result.extracted_terms.is_none());
    assert_eq!(result.terminology.score, 1.0);
    Ok(())
}

#[tokio::test]
async fn test_glossaryMode_withoutGlossary_shouldDegradeToNeutral() {
    let evaluator = Evaluator::new(config(TerminologyMode::Glossary));
    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]))
        .await;

    assert_eq!(result.terminology.score, 0.5);
    assert!(result.terminology.description.contains("materials_science"));
}

#[tokio::test]
async fn test_externalMode_withThreeTerms_shouldScoreByCount() {
    let provider = MockProvider::replying(r#"Terms: {"纳米材料": "nanomaterials", "合金": "alloy", "力学性能": "mechanical properties"}"#);
    let evaluator = Evaluator::new(config(TerminologyMode::ExternalModel)).with_completion(Arc::new(provider.clone()));

    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[]))
        .await;

    assert!((result.terminology.score - 0.3).abs() < 1e-6);
    assert_eq!(result.extracted_terms.as_ref().map(|t| t.len()), Some(3));
    assert_eq!(provider.request_count(), 1);
}

#[tokio::test]
async fn test_externalMode_withSlowProvider_shouldTimeOutToNeutral() {
    let evaluator = Evaluator::new(config(TerminologyMode::ExternalModel))
        .with_completion(Arc::new(MockProvider::slow(1500)));

    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[]))
        .await;

    assert_eq!(result.terminology.score, 0.5);
    assert!(result.extracted_terms.is_none());
}

#[tokio::test]
async fn test_externalMode_withoutProvider_shouldDegradeToNeutral() {
    let evaluator = Evaluator::new(config(TerminologyMode::ExternalModel));
    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[]))
        .await;
    assert_eq!(result.terminology.score, 0.5);
}

#[tokio::test]
async fn test_externalMode_withIntermittentProvider_shouldRecoverPerCall() {
    let provider = MockProvider::intermittent(2);
    let evaluator = Evaluator::new(config(TerminologyMode::ExternalModel)).with_completion(Arc::new(provider.clone()));
    let input = common::sample_input(common::GOOD_TRANSLATION, &[]);

    let first = evaluator.evaluate(&input).await;
    let second = evaluator.evaluate(&input).await;

    // default mock reply carries two pairs
    assert!((first.terminology.score - 0.2).abs() < 1e-6);
    assert_eq!(second.terminology.score, 0.5);
    assert_eq!(provider.request_count(), 2);
}

#[tokio::test]
async fn test_extractTerms_withoutGlossary_shouldReturnEmptyMap() {
    let evaluator = Evaluator::new(config(TerminologyMode::Glossary));
    let request = TermExtractionRequest::from_input(&common::sample_input(common::GOOD_TRANSLATION, &[]));

    let terms = evaluator.extract_terms(&request, TerminologyMode::Glossary).await;
    assert!(terms.is_empty());
}

#[tokio::test]
async fn test_extractTerms_withGlossary_shouldIgnoreConfiguredMode() -> Result<()> {
    let evaluator = Evaluator::new(config(TerminologyMode::ExternalModel)).with_glossary(glossary()?);
    let request = TermExtractionRequest::from_input(&common::sample_input(common::GOOD_TRANSLATION, &[]));

    let terms = evaluator.extract_terms(&request, TerminologyMode::Glossary).await;
    assert_eq!(terms.len(), 3);
    assert_eq!(terms.get("力学性能").map(String::as_str), Some("mechanical properties"));
    Ok(())
}
