/*!
 * Data model shared by every scorer.
 */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from source-language term to its expected target-language rendering.
///
/// Ordered so that feedback and suggestions come out in the same order on
/// every run.
pub type TermMap = BTreeMap<String, String>;

/// Score for one evaluation dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    /// Score value (0.0 - 1.0)
    pub score: f32,
    /// Maximum attainable score, always 1.0
    pub max_score: f32,
    /// Human-readable explanation
    pub description: String,
}

impl ScoreComponent {
    /// Create a component, clamping the score into [0, 1].
    pub fn new(score: f32, description: impl Into<String>) -> Self {
        Self {
            score: clamp_unit(score),
            max_score: 1.0,
            description: description.into(),
        }
    }
}

/// Clamp a score into [0, 1]; non-finite values become 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Qualitative band for a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    /// 0.8 and above
    Excellent,
    /// 0.6 - 0.8
    Good,
    /// 0.4 - 0.6
    Fair,
    /// below 0.4
    Poor,
}

impl ScoreBand {
    /// Band a score falls into.
    pub fn of(score: f32) -> Self {
        match score {
            s if s >= 0.8 => Self::Excellent,
            s if s >= 0.6 => Self::Good,
            s if s >= 0.4 => Self::Fair,
            _ => Self::Poor,
        }
    }

    /// Lowercase label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

/// One evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// Text in the source language
    pub source_text: String,

    /// Machine translation under evaluation
    pub translated_text: String,

    /// Human reference translations, in priority order
    #[serde(default)]
    pub reference_texts: Vec<String>,

    /// Source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Domain tag used for glossary lookup
    #[serde(default = "default_domain", alias = "domain_tag")]
    pub domain: String,
}

impl EvaluationInput {
    /// Create an input for the default domain.
    pub fn new(
        source_text: impl Into<String>,
        translated_text: impl Into<String>,
        reference_texts: Vec<String>,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            translated_text: translated_text.into(),
            reference_texts,
            source_language: source_language.into(),
            target_language: target_language.into(),
            domain: default_domain(),
        }
    }

    /// Set the domain tag.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Reference texts that contain something other than whitespace.
    pub fn usable_references(&self) -> Vec<&str> {
        usable_references(&self.reference_texts)
    }
}

/// Filter out blank references.
pub fn usable_references(references: &[String]) -> Vec<&str> {
    references
        .iter()
        .map(String::as_str)
        .filter(|r| !r.trim().is_empty())
        .collect()
}

pub(crate) fn default_source_language() -> String {
    "zh".to_string()
}

pub(crate) fn default_target_language() -> String {
    "en".to_string()
}

pub(crate) fn default_domain() -> String {
    "materials_science".to_string()
}

/// A source term and its expected rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPair {
    /// Term in the source language
    pub source_term: String,
    /// Expected translation
    pub target_term: String,
}

impl TermPair {
    /// Create a new term pair.
    pub fn new(source_term: impl Into<String>, target_term: impl Into<String>) -> Self {
        Self {
            source_term: source_term.into(),
            target_term: target_term.into(),
        }
    }
}

/// Weights of the four sub-scores in the overall score.
///
/// Conventionally sums to 1.0; this is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Weight of the BLEU score
    #[serde(default = "default_bleu_weight")]
    pub bleu: f32,
    /// Weight of terminology accuracy
    #[serde(default = "default_minor_weight")]
    pub terminology: f32,
    /// Weight of sentence structure
    #[serde(default = "default_minor_weight")]
    pub sentence_structure: f32,
    /// Weight of discourse coherence
    #[serde(default = "default_minor_weight")]
    pub discourse: f32,
}

fn default_bleu_weight() -> f32 {
    0.4
}

fn default_minor_weight() -> f32 {
    0.2
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            bleu: default_bleu_weight(),
            terminology: default_minor_weight(),
            sentence_structure: default_minor_weight(),
            discourse: default_minor_weight(),
        }
    }
}

impl WeightConfig {
    /// Sum of all weights
    pub fn total(&self) -> f32 {
        self.bleu + self.terminology + self.sentence_structure + self.discourse
    }

    /// Each weight with its sub-score name
    pub fn named(&self) -> [(&'static str, f32); 4] {
        [
            ("bleu", self.bleu),
            ("terminology", self.terminology),
            ("sentence_structure", self.sentence_structure),
            ("discourse", self.discourse),
        ]
    }

    /// Weighted sum of sub-scores, clamped into [0, 1]
    pub fn combine(&self, bleu: f32, terminology: f32, sentence_structure: f32, discourse: f32) -> f32 {
        clamp_unit(
            self.bleu * bleu
                + self.terminology * terminology
                + self.sentence_structure * sentence_structure
                + self.discourse * discourse,
        )
    }
}

/// Complete result of one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Weighted overall score
    pub overall: ScoreComponent,
    /// N-gram overlap with the references
    pub bleu: ScoreComponent,
    /// Terminology accuracy
    pub terminology: ScoreComponent,
    /// Active/passive voice conversion
    pub sentence_structure: ScoreComponent,
    /// Discourse coherence
    pub discourse: ScoreComponent,
    /// Detailed feedback keyed by sub-score name
    pub detailed_feedback: BTreeMap<String, String>,
    /// Improvement suggestions, never empty
    pub suggestions: Vec<String>,
    /// Term pairs extracted during evaluation, when an extraction strategy ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_terms: Option<TermMap>,
}

impl EvaluationResult {
    /// All five components in a fixed order.
    pub fn components(&self) -> [(&'static str, &ScoreComponent); 5] {
        [
            ("overall", &self.overall),
            ("bleu", &self.bleu),
            ("terminology", &self.terminology),
            ("sentence_structure", &self.sentence_structure),
            ("discourse", &self.discourse),
        ]
    }
}
