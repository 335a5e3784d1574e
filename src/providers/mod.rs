/*!
 * Text-completion providers.
 *
 * The evaluator only needs one capability from a language model: turn a
 * prompt into text. This module defines that seam and its implementations:
 * - OpenAI-compatible chat completion endpoints
 * - A configurable mock used by tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for text-completion providers
///
/// Implementations must be shareable across concurrent evaluations.
#[async_trait]
pub trait TextCompletion: Send + Sync + Debug {
    /// Complete a prompt
    ///
    /// # Arguments
    /// * `prompt` - The user prompt to send
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The completion text or an error
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    /// Short provider name for logs
    fn name(&self) -> &str;
}

pub mod mock;
pub mod openai;
