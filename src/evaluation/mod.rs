/*!
 * Translation quality evaluation.
 *
 * Four sub-scores, each in [0, 1]:
 * - `bleu`: n-gram overlap with reference translations
 * - `terminology`: accuracy of domain terms
 * - `structure`: active to passive voice conversion
 * - `discourse`: coherence of the translated text
 *
 * `Evaluator` runs them for one input and combines them into the overall score.
 */

pub mod bleu;
pub mod criteria;
pub mod discourse;
pub mod evaluator;
pub mod feedback;
pub mod lexicon;
pub mod model;
pub mod structure;
pub mod terminology;
pub mod tokenizer;

pub use criteria::{ScoringCriterion, scoring_criteria};
pub use evaluator::Evaluator;
pub use lexicon::{ConnectiveLexicon, Lexicon};
pub use model::{
    EvaluationInput, EvaluationResult, ScoreBand, ScoreComponent, TermMap, TermPair, WeightConfig,
};
pub use terminology::{
    GlossaryProvider, InMemoryGlossary, TermExtractionRequest, TerminologyMode,
};
