/*!
 * Term pair extraction through an external text-completion model.
 */

use std::time::Duration;

use log::{error, info, warn};

use crate::errors::ExtractionError;
use crate::evaluation::model::TermMap;
use crate::language_utils::display_name;
use crate::providers::TextCompletion;

/// Extracted term count that earns a full terminology score
pub const FULL_CONFIDENCE_TERMS: usize = 10;

/// Score when the model found no terms
pub const NO_TERMS_SCORE: f32 = 0.5;

/// Build the prompt asking the model for a JSON term mapping
pub fn build_extraction_prompt(
    source_text: &str,
    translated_text: &str,
    source_language: &str,
    target_language: &str,
) -> String {
    let source_name = display_name(source_language);
    let target_name = display_name(target_language);
    format!(
        "Extract the domain-specific technical terms from the {source_name} source text below \
         together with their translations in the {target_name} text.\n\
         Answer with a single JSON object of the form {{\"source term\": \"target term\", ...}}.\n\
         Return only the JSON object, without any explanation.\n\n\
         Source text ({source_name}):\n{source_text}\n\n\
         Translation ({target_name}):\n{translated_text}\n"
    )
}

/// Parse the first brace-delimited block of a model response into a term map
///
/// Prose around the block is ignored, as are entries whose value is not a
/// non-empty string.
pub fn parse_term_json(response: &str) -> Result<TermMap, ExtractionError> {
    let start = response.find('{').ok_or(ExtractionError::MissingJson)?;
    let end = response.rfind('}').ok_or(ExtractionError::MissingJson)?;
    if end < start {
        return Err(ExtractionError::MissingJson);
    }

    let value: serde_json::Value = serde_json::from_str(&response[start..=end])?;
    let object = value
        .as_object()
        .ok_or_else(|| ExtractionError::InvalidJson("expected a JSON object".to_string()))?;

    Ok(object
        .iter()
        .filter_map(|(source, target)| {
            let target = target.as_str()?.trim();
            let source = source.trim();
            (!source.is_empty() && !target.is_empty()).then(|| (source.to_string(), target.to_string()))
        })
        .collect())
}

/// Ask the model for term pairs, bounded by `timeout`
pub async fn extract_with_model(
    completion: &dyn TextCompletion,
    source_text: &str,
    translated_text: &str,
    source_language: &str,
    target_language: &str,
    timeout: Duration,
) -> Result<TermMap, ExtractionError> {
    let prompt = build_extraction_prompt(source_text, translated_text, source_language, target_language);

    info!("Requesting term extraction from the text-completion provider");
    let response = match tokio::time::timeout(timeout, completion.complete(&prompt)).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            error!("Term extraction request failed: {}", e);
            return Err(e.into());
        }
        Err(_) => {
            warn!("Term extraction timed out after {:?}", timeout);
            return Err(ExtractionError::Timeout(timeout));
        }
    };

    let terms = parse_term_json(&response).inspect_err(|e| {
        error!("Could not parse extracted terms: {}", e);
        log::debug!("Raw extraction response: {}", response);
    })?;
    info!("Model extracted {} term pairs", terms.len());
    Ok(terms)
}

/// Terminology score derived from the number of extracted terms
pub fn confidence_score(term_count: usize) -> f32 {
    if term_count == 0 {
        NO_TERMS_SCORE
    } else {
        (term_count as f32 / FULL_CONFIDENCE_TERMS as f32).min(1.0)
    }
}

/// Feedback for a successful extraction
pub fn describe_extraction(term_count: usize) -> String {
    match term_count {
        0 => "The model extracted no term pairs; the text may contain no technical terms, \
              or extraction failed."
            .to_string(),
        1..=5 => format!(
            "The model extracted {} term pairs. The text contains some technical terms and \
             their translation looks sound.",
            term_count
        ),
        _ => format!(
            "The model extracted {} term pairs. The text is rich in technical terms and \
             their translation looks accurate.",
            term_count
        ),
    }
}
