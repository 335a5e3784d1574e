/*!
 * Terminology scoring.
 *
 * Term pairs come from exactly one acquisition strategy per call:
 * - Glossary: curated entries whose source term occurs in the source text
 * - Reference alignment: pairs aligned between the source and a reference
 * - External model: pairs extracted by a text-completion model
 *
 * Glossary and reference pairs are checked against the candidate by the
 * matcher. Model-extracted pairs have no independent ground truth, so their
 * score reflects how many terms were found instead.
 */

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::ExtractionError;
use crate::evaluation::model::{EvaluationInput, TermMap};
use crate::providers::TextCompletion;

pub mod alignment;
pub mod external;
pub mod glossary;
pub mod matcher;

pub use glossary::{GlossaryEntry, GlossaryProvider, InMemoryGlossary};
pub use matcher::{TermCheck, TermMatch, TerminologyReport};

/// Score used when term pairs could not be acquired
pub const DEGRADED_SCORE: f32 = 0.5;

/// Term acquisition mode selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerminologyMode {
    /// Curated glossary lookup
    #[default]
    #[serde(rename = "database", alias = "glossary")]
    Glossary,
    /// Alignment against the first usable reference translation
    #[serde(rename = "reference", alias = "reference_alignment")]
    ReferenceAlignment,
    /// Extraction by an external text-completion model
    #[serde(rename = "ai_extraction", alias = "external")]
    ExternalModel,
}

impl FromStr for TerminologyMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "database" | "glossary" => Ok(Self::Glossary),
            "reference" | "reference_alignment" => Ok(Self::ReferenceAlignment),
            "ai_extraction" | "external" => Ok(Self::ExternalModel),
            _ => Err(anyhow!("Invalid terminology mode: {}", s)),
        }
    }
}

impl fmt::Display for TerminologyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Glossary => write!(f, "database"),
            Self::ReferenceAlignment => write!(f, "reference"),
            Self::ExternalModel => write!(f, "ai_extraction"),
        }
    }
}

/// Inputs needed to acquire term pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermExtractionRequest {
    /// Text in the source language
    pub source_text: String,
    /// Translation under evaluation
    pub translated_text: String,
    /// Reference translation used by the alignment strategy
    #[serde(default)]
    pub reference_text: Option<String>,
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// Domain tag for glossary lookup
    pub domain: String,
}

impl TermExtractionRequest {
    /// Build a request from an evaluation input, using its first usable reference
    pub fn from_input(input: &EvaluationInput) -> Self {
        Self {
            source_text: input.source_text.clone(),
            translated_text: input.translated_text.clone(),
            reference_text: input.usable_references().first().map(|r| r.to_string()),
            source_language: input.source_language.clone(),
            target_language: input.target_language.clone(),
            domain: input.domain.clone(),
        }
    }
}

/// Terminology score with the pairs that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct TerminologyAssessment {
    /// Score, feedback and per-pair outcomes
    pub report: TerminologyReport,
    /// Pairs extracted by the alignment or model strategies
    pub extracted: Option<TermMap>,
}

/// One term acquisition strategy with the collaborators it needs
#[derive(Debug, Clone, Copy)]
pub enum TermStrategy<'a> {
    /// Look terms up in a curated glossary
    Glossary {
        /// Glossary snapshot, if one is configured
        provider: Option<&'a dyn GlossaryProvider>,
    },
    /// Align terms between source and reference text
    ReferenceAlignment,
    /// Ask a text-completion model for term pairs
    ExternalModel {
        /// Model client, if one is configured
        completion: Option<&'a dyn TextCompletion>,
        /// Upper bound on the model call
        timeout: Duration,
    },
}

impl<'a> TermStrategy<'a> {
    /// Pick the strategy for `mode`
    ///
    /// Reference alignment without a usable reference falls back to the glossary.
    pub fn select(
        mode: TerminologyMode,
        request: &TermExtractionRequest,
        glossary: Option<&'a dyn GlossaryProvider>,
        completion: Option<&'a dyn TextCompletion>,
        timeout: Duration,
    ) -> Self {
        match mode {
            TerminologyMode::Glossary => Self::Glossary { provider: glossary },
            TerminologyMode::ReferenceAlignment if request.reference_text.is_some() => {
                Self::ReferenceAlignment
            }
            TerminologyMode::ReferenceAlignment => {
                warn!("No usable reference for term alignment, falling back to glossary lookup");
                Self::Glossary { provider: glossary }
            }
            TerminologyMode::ExternalModel => Self::ExternalModel { completion, timeout },
        }
    }

    /// Mode this strategy implements
    pub fn mode(&self) -> TerminologyMode {
        match self {
            Self::Glossary { .. } => TerminologyMode::Glossary,
            Self::ReferenceAlignment => TerminologyMode::ReferenceAlignment,
            Self::ExternalModel { .. } => TerminologyMode::ExternalModel,
        }
    }

    /// Acquire term pairs
    pub async fn extract(&self, request: &TermExtractionRequest) -> Result<TermMap, ExtractionError> {
        match self {
            Self::Glossary { provider } => {
                let pairs = provider
                    .map(|p| p.lookup(&request.domain, &request.source_language, &request.target_language))
                    .unwrap_or_default();
                if pairs.is_empty() {
                    return Err(ExtractionError::GlossaryUnavailable {
                        domain: request.domain.clone(),
                        source_language: request.source_language.clone(),
                        target_language: request.target_language.clone(),
                    });
                }
                let found = glossary::find_terms_in_source(&request.source_text, &pairs, &request.source_language);
                debug!("{} of {} glossary terms occur in the source", found.len(), pairs.len());
                Ok(found)
            }
            Self::ReferenceAlignment => Ok(request
                .reference_text
                .as_deref()
                .map(|reference| {
                    alignment::align_terms(
                        &request.source_text,
                        reference,
                        &request.source_language,
                        &request.target_language,
                    )
                })
                .unwrap_or_default()),
            Self::ExternalModel { completion, timeout } => {
                let completion = completion.ok_or(ExtractionError::ProviderUnavailable)?;
                external::extract_with_model(
                    completion,
                    &request.source_text,
                    &request.translated_text,
                    &request.source_language,
                    &request.target_language,
                    *timeout,
                )
                .await
            }
        }
    }

    /// Acquire term pairs and score the candidate with them; never fails
    pub async fn assess(&self, request: &TermExtractionRequest) -> TerminologyAssessment {
        let extracted = self.extract(request).await;

        match (self, extracted) {
            (_, Err(e)) => {
                warn!("Terminology degraded to neutral score: {}", e);
                TerminologyAssessment {
                    report: TerminologyReport::neutral(DEGRADED_SCORE, degraded_message(&e)),
                    extracted: None,
                }
            }
            (Self::Glossary { .. }, Ok(terms)) => TerminologyAssessment {
                report: matcher::match_terms(&request.translated_text, &terms, &request.target_language),
                extracted: None,
            },
            (Self::ReferenceAlignment, Ok(terms)) if terms.is_empty() => TerminologyAssessment {
                report: TerminologyReport::neutral(
                    DEGRADED_SCORE,
                    "No term pairs could be extracted from the reference translation, \
                     so terminology accuracy cannot be assessed.",
                ),
                extracted: Some(terms),
            },
            (Self::ReferenceAlignment, Ok(terms)) => TerminologyAssessment {
                report: matcher::match_terms(&request.translated_text, &terms, &request.target_language),
                extracted: Some(terms),
            },
            (Self::ExternalModel { .. }, Ok(terms)) => TerminologyAssessment {
                report: TerminologyReport::neutral(
                    external::confidence_score(terms.len()),
                    external::describe_extraction(terms.len()),
                ),
                extracted: Some(terms),
            },
        }
    }
}

/// Explanation attached to a degraded terminology score
fn degraded_message(error: &ExtractionError) -> String {
    match error {
        ExtractionError::GlossaryUnavailable { domain, .. } => format!(
            "No glossary was found for the domain '{}', so terminology accuracy cannot be assessed.",
            domain
        ),
        ExtractionError::ProviderUnavailable => {
            "No text-completion provider is configured, so terms cannot be extracted.".to_string()
        }
        ExtractionError::Timeout(_) | ExtractionError::Provider(_) => format!(
            "Term extraction through the text-completion provider failed ({}), \
             so terminology accuracy cannot be assessed.",
            error
        ),
        ExtractionError::MissingJson | ExtractionError::InvalidJson(_) => format!(
            "The extracted terms could not be parsed ({}), so terminology accuracy cannot be assessed.",
            error
        ),
    }
}
