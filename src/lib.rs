/*!
 * # transeval - Translation quality evaluation
 *
 * A Rust library that scores machine translations of materials science text,
 * primarily Chinese to English.
 *
 * ## Features
 *
 * - Four sub-scores combined into a weighted overall score:
 *   - BLEU against one or more reference translations
 *   - Terminology accuracy from a glossary, reference alignment or a language model
 *   - Active to passive voice conversion
 *   - Discourse coherence (connectives, sentence length, repetition, pronouns)
 * - Detailed feedback and improvement suggestions
 * - Graceful degradation when references, glossaries or providers are missing
 * - ISO 639-1 and ISO 639-3 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `evaluation`: Scoring:
 *   - `evaluation::bleu`: N-gram overlap scoring
 *   - `evaluation::terminology`: Term acquisition strategies and matching
 *   - `evaluation::structure`: Voice conversion heuristic
 *   - `evaluation::discourse`: Coherence heuristics
 *   - `evaluation::evaluator`: Composite scorer
 * - `language_utils`: ISO language code utilities
 * - `providers`: Text-completion clients used for term extraction
 * - `errors`: Custom error types for the library
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod evaluation;
pub mod language_utils;
pub mod providers;

// Re-export main types for easier usage
pub use app_config::{Config, EvaluationConfig, LogLevel, ProviderConfig};
pub use errors::{ExtractionError, ProviderError};
pub use evaluation::{
    EvaluationInput, EvaluationResult, Evaluator, GlossaryProvider, InMemoryGlossary, ScoreComponent,
    TermExtractionRequest, TermMap, TermPair, TerminologyMode, WeightConfig,
};
pub use language_utils::{get_language_name, language_codes_match};
pub use providers::TextCompletion;
