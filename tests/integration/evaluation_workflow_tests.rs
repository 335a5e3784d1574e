/*!
 * End-to-end evaluation tests
 */

use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;

use transeval::app_config::EvaluationConfig;
use transeval::evaluation::feedback::AFFIRMATIVE_SUGGESTION;
use transeval::{EvaluationInput, Evaluator, InMemoryGlossary};

use crate::common;

fn evaluator_with_glossary() -> Result<Evaluator> {
    let glossary =
        InMemoryGlossary::from_json_str(common::GLOSSARY_JSON, "materials_science", "zh", "en")?;
    Ok(Evaluator::new(EvaluationConfig::default()).with_glossary(Arc::new(glossary)))
}

#[tokio::test]
async fn test_evaluate_goodTranslation_shouldOutscoreWeakTranslation() -> Result<()> {
    common::init_logging();
    let evaluator = evaluator_with_glossary()?;

    let good = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]))
        .await;
    let weak = evaluator
        .evaluate(&common::sample_input(common::WEAK_TRANSLATION, &[common::REFERENCE_TEXT]))
        .await;

    assert!(good.overall.score > weak.overall.score);
    assert_eq!(good.terminology.score, 1.0);
    assert_eq!(weak.terminology.score, 0.0);
    assert_eq!(good.sentence_structure.score, 1.0);
    assert_eq!(weak.sentence_structure.score, 0.0);
    assert!(good.bleu.score > weak.bleu.score);
    Ok(())
}

#[tokio::test]
async fn test_evaluate_weakTranslation_shouldNameEachMissingTerm() -> Result<()> {
    let evaluator = evaluator_with_glossary()?;
    let result = evaluator
        .evaluate(&common::sample_input(common::WEAK_TRANSLATION, &[]))
        .await;

    for (source, target) in [("纳米材料", "nanomaterials"), ("合金", "alloy"), ("力学性能", "mechanical properties")] {
        let line = format!("'{}' should be translated as '{}'", source, target);
        assert!(
            result.suggestions.iter().any(|s| s.contains(&line)),
            "missing suggestion for {}",
            source
        );
    }
    assert!(!result.suggestions.iter().any(|s| s == AFFIRMATIVE_SUGGESTION));
    Ok(())
}

#[tokio::test]
async fn test_evaluate_withoutReferences_shouldExplainNeutralBleu() -> Result<()> {
    let evaluator = evaluator_with_glossary()?;
    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &["", "  "]))
        .await;

    assert_eq!(result.bleu.score, 0.5);
    assert!(result.detailed_feedback["bleu"].contains("No valid reference"));
    Ok(())
}

#[tokio::test]
async fn test_evaluate_withOtherLanguagePair_shouldSkipStructureHeuristic() {
    let evaluator = Evaluator::new(EvaluationConfig::default());
    let input = EvaluationInput::new(
        "Die Probe wurde getestet.",
        "The sample was tested.",
        vec!["The sample was tested.".to_string()],
        "de",
        "en",
    );
    let result = evaluator.evaluate(&input).await;
    assert_eq!(result.sentence_structure.score, 0.7);
}

#[tokio::test]
async fn test_evaluate_withEmptyCandidate_shouldStayInRange() -> Result<()> {
    let evaluator = evaluator_with_glossary()?;
    let result = evaluator
        .evaluate(&common::sample_input("", &[common::REFERENCE_TEXT]))
        .await;

    for (name, component) in result.components() {
        assert!((0.0..=1.0).contains(&component.score), "{} out of range", name);
        assert_eq!(component.max_score, 1.0);
    }
    assert!(result.bleu.score <= 0.1 + f32::EPSILON);
    Ok(())
}

#[tokio::test]
async fn test_evaluate_resultJson_shouldExposeAllSections() -> Result<()> {
    let evaluator = evaluator_with_glossary()?;
    let result = evaluator
        .evaluate(&common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]))
        .await;

    let json = serde_json::to_value(&result)?;
    for key in ["overall", "bleu", "terminology", "sentence_structure", "discourse", "detailed_feedback", "suggestions"] {
        assert!(json.get(key).is_some(), "missing key {}", key);
    }
    // glossary mode reports no extracted terms
    assert!(json.get("extracted_terms").is_none());
    assert_eq!(json["bleu"]["max_score"], 1.0);
    Ok(())
}

#[tokio::test]
async fn test_evaluate_concurrentCalls_shouldMatchSequentialResult() -> Result<()> {
    let evaluator = evaluator_with_glossary()?;
    let input = common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]);

    let sequential = evaluator.evaluate(&input).await;
    let concurrent = join_all((0..5).map(|_| evaluator.evaluate(&input))).await;

    for result in concurrent {
        assert_eq!(result.components(), sequential.components());
        assert_eq!(result.suggestions, sequential.suggestions);
    }
    Ok(())
}

#[test]
fn test_evaluate_fromBlockingContext_shouldComplete() -> Result<()> {
    let evaluator = evaluator_with_glossary()?;
    let input = common::sample_input(common::GOOD_TRANSLATION, &[common::REFERENCE_TEXT]);
    let result = tokio_test::block_on(evaluator.evaluate(&input));
    assert!(result.overall.score > 0.5);
    Ok(())
}
