/*!
 * Error types for the transeval library.
 *
 * Scorers never fail on well-typed input; they degrade to documented neutral
 * scores instead. The errors below cover the external text-completion
 * collaborator and the term extraction strategies built on it.
 */

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to a text-completion provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors raised while acquiring term pairs.
///
/// The evaluator turns every variant into a neutral terminology score with
/// an explanatory message; callers of `extract_terms` get an empty mapping.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The text-completion provider failed
    #[error("Text-completion provider failed: {0}")]
    Provider(#[from] ProviderError),

    /// The provider did not answer in time
    #[error("Text-completion provider did not answer within {0:?}")]
    Timeout(Duration),

    /// External extraction was requested but no provider is configured
    #[error("No text-completion provider is configured")]
    ProviderUnavailable,

    /// The response contained no brace-delimited block
    #[error("Response contains no JSON object")]
    MissingJson,

    /// The brace-delimited block was not a valid term mapping
    #[error("Response JSON is not a valid term mapping: {0}")]
    InvalidJson(String),

    /// The glossary holds no entries for the requested domain and language pair
    #[error("No glossary entries for domain '{domain}' ({source_language} -> {target_language})")]
    GlossaryUnavailable {
        /// Requested domain
        domain: String,
        /// Source language code
        source_language: String,
        /// Target language code
        target_language: String,
    },
}

impl From<serde_json::Error> for ExtractionError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidJson(error.to_string())
    }
}
