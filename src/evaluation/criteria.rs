/*!
 * Published scoring criteria: how each score is computed and how to read it.
 */

use std::collections::BTreeMap;

use serde::Serialize;

use crate::evaluation::model::WeightConfig;

/// Description of one score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringCriterion {
    /// Display name
    pub name: String,
    /// What the score measures
    pub description: String,
    /// How it is calculated
    pub calculation: String,
    /// Configured weight as a percentage
    pub weight: String,
    /// Score range -> interpretation
    pub interpretation: BTreeMap<String, String>,
}

fn bands(excellent: &str, good: &str, fair: &str, poor: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("0.8-1.0".to_string(), excellent.to_string()),
        ("0.6-0.8".to_string(), good.to_string()),
        ("0.4-0.6".to_string(), fair.to_string()),
        ("0.0-0.4".to_string(), poor.to_string()),
    ])
}

fn percent(weight: f32) -> String {
    format!("{:.0}%", weight * 100.0)
}

/// Criteria for the overall score and each sub-score, keyed by score name
pub fn scoring_criteria(weights: &WeightConfig) -> BTreeMap<String, ScoringCriterion> {
    let mut criteria = BTreeMap::new();

    criteria.insert(
        "overall".to_string(),
        ScoringCriterion {
            name: "Overall score".to_string(),
            description: "Overall translation quality, combining BLEU, terminology accuracy, \
                          sentence structure and discourse coherence."
                .to_string(),
            calculation: "Weighted sum of the four sub-scores; the weights are configurable.".to_string(),
            weight: percent(weights.total()),
            interpretation: bands("excellent", "good", "fair", "poor"),
        },
    );
    criteria.insert(
        "bleu".to_string(),
        ScoringCriterion {
            name: "BLEU score".to_string(),
            description: "Similarity between the translation and the reference translations, \
                          the most common automatic metric for machine translation."
                .to_string(),
            calculation: "N-gram precision with smoothing; corpus-level and sentence-level BLEU \
                          are blended with more sentence-level weight for short texts."
                .to_string(),
            weight: percent(weights.bleu),
            interpretation: bands(
                "closely matches the reference",
                "matches the reference well",
                "matches the reference moderately",
                "differs substantially from the reference",
            ),
        },
    );
    criteria.insert(
        "terminology".to_string(),
        ScoringCriterion {
            name: "Terminology accuracy".to_string(),
            description: "How accurately domain-specific terms are translated.".to_string(),
            calculation: "Share of expected target terms found in the translation, using glossary \
                          terms, terms aligned with the reference, or terms extracted by a model."
                .to_string(),
            weight: percent(weights.terminology),
            interpretation: bands(
                "terminology is highly accurate",
                "terminology is mostly accurate",
                "terminology is partly accurate",
                "terminology accuracy is low",
            ),
        },
    );
    criteria.insert(
        "sentence_structure".to_string(),
        ScoringCriterion {
            name: "Sentence structure".to_string(),
            description: "Whether sentence structure is converted appropriately, in particular \
                          active Chinese sentences rendered in the English passive voice."
                .to_string(),
            calculation: "Ratio of passive target sentences to agentive source sentences.".to_string(),
            weight: percent(weights.sentence_structure),
            interpretation: bands(
                "conversion is appropriate",
                "conversion is mostly reasonable",
                "conversion has problems",
                "conversion is inappropriate",
            ),
        },
    );
    criteria.insert(
        "discourse".to_string(),
        ScoringCriterion {
            name: "Discourse coherence".to_string(),
            description: "Logical coherence, transitions between sentences and overall fluency.".to_string(),
            calculation: "Combination of connective usage, sentence length variation, word \
                          repetition and pronoun reference."
                .to_string(),
            weight: percent(weights.discourse),
            interpretation: bands(
                "coherence is excellent",
                "coherence is good",
                "coherence is fair",
                "coherence is poor",
            ),
        },
    );

    criteria
}
