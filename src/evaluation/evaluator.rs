/*!
 * Composite scorer.
 *
 * Runs the four sub-scorers for one input, combines them with the configured
 * weights and assembles feedback. The terminology scorer is the only one that
 * may wait on I/O; it is joined with the CPU-bound scorers so a slow model
 * call never holds them up.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::app_config::EvaluationConfig;
use crate::evaluation::model::{
    EvaluationInput, EvaluationResult, ScoreBand, ScoreComponent, TermMap,
};
use crate::evaluation::terminology::{
    GlossaryProvider, TermExtractionRequest, TermStrategy, TerminologyMode,
};
use crate::evaluation::{bleu, discourse, feedback, structure};
use crate::providers::TextCompletion;

/// Allowed deviation of the weight sum from 1.0 before a warning is logged
pub const WEIGHT_SUM_TOLERANCE: f32 = 0.01;

/// Translation quality evaluator
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluationConfig,
    glossary: Option<Arc<dyn GlossaryProvider>>,
    completion: Option<Arc<dyn TextCompletion>>,
}

impl Evaluator {
    /// Create an evaluator without glossary or text-completion provider
    pub fn new(config: EvaluationConfig) -> Self {
        let total = config.weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            warn!(
                "Score weights sum to {:.3} instead of 1.0; the overall score may be misleading",
                total
            );
        }
        Self {
            config,
            glossary: None,
            completion: None,
        }
    }

    /// Attach a glossary snapshot
    pub fn with_glossary(mut self, glossary: Arc<dyn GlossaryProvider>) -> Self {
        self.glossary = Some(glossary);
        self
    }

    /// Attach a text-completion provider for model-based term extraction
    pub fn with_completion(mut self, completion: Arc<dyn TextCompletion>) -> Self {
        self.completion = Some(completion);
        self
    }

    /// Active configuration
    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    fn strategy<'a>(&'a self, mode: TerminologyMode, request: &TermExtractionRequest) -> TermStrategy<'a> {
        TermStrategy::select(
            mode,
            request,
            self.glossary.as_deref(),
            self.completion.as_deref(),
            Duration::from_secs(self.config.extraction_timeout_secs),
        )
    }

    /// Evaluate one translation
    ///
    /// Never fails: missing references, glossaries or providers degrade the
    /// affected sub-score to a documented neutral value.
    pub async fn evaluate(&self, input: &EvaluationInput) -> EvaluationResult {
        let request = TermExtractionRequest::from_input(input);
        let strategy = self.strategy(self.config.terminology_mode, &request);
        let references = input.usable_references();
        let lexicon = &self.config.lexicon;

        let local_scores = async {
            let bleu = bleu::score(&input.translated_text, &input.reference_texts, &input.target_language);
            let structure = structure::score(
                &input.source_text,
                &input.translated_text,
                &input.source_language,
                &input.target_language,
                lexicon,
            );
            let discourse = discourse::score(&input.translated_text, &references, &input.target_language, lexicon);
            (bleu, structure, discourse)
        };

        let (terminology, (bleu, structure, discourse)) =
            tokio::join!(strategy.assess(&request), local_scores);

        let weights = &self.config.weights;
        let overall_score = weights.combine(
            bleu.score,
            terminology.report.score,
            structure.score,
            discourse.score,
        );
        debug!(
            "Scores: bleu={:.3} terminology={:.3} structure={:.3} discourse={:.3} overall={:.3}",
            bleu.score, terminology.report.score, structure.score, discourse.score, overall_score
        );

        let suggestions = feedback::build_suggestions(
            &bleu,
            &terminology.report,
            &structure,
            &discourse,
            self.config.suggestion_threshold,
        );
        let detailed_feedback = feedback::detailed_feedback(&bleu, &terminology.report, &structure, &discourse);

        EvaluationResult {
            overall: ScoreComponent::new(
                overall_score,
                format!(
                    "Overall translation quality is {} ({:.2}), weighted from BLEU, terminology, \
                     sentence structure and discourse coherence.",
                    ScoreBand::of(overall_score).label(),
                    overall_score
                ),
            ),
            bleu: bleu.to_component(),
            terminology: terminology.report.to_component(),
            sentence_structure: structure.to_component(),
            discourse: discourse.to_component(),
            detailed_feedback,
            suggestions,
            extracted_terms: terminology.extracted,
        }
    }

    /// Acquire term pairs with one strategy
    ///
    /// Fails closed: any error is logged and yields an empty mapping.
    pub async fn extract_terms(&self, request: &TermExtractionRequest, mode: TerminologyMode) -> TermMap {
        let strategy = self.strategy(mode, request);
        match strategy.extract(request).await {
            Ok(terms) => {
                info!("Extracted {} term pairs using {} mode", terms.len(), strategy.mode());
                terms
            }
            Err(e) => {
                warn!("Term extraction failed, returning no terms: {}", e);
                TermMap::new()
            }
        }
    }
}
