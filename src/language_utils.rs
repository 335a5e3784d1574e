//! Language utilities for ISO language code handling
//!
//! Evaluation inputs carry free-form language codes ("zh", "zho", "chi",
//! "zh-CN", "EN"). Everything downstream compares normalized codes and asks
//! whether a language is written without whitespace word boundaries.

use anyhow::{Result, anyhow};
use isolang::Language;

/// How words are delimited in a language's writing system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// No whitespace between words (Chinese, Japanese)
    Logographic,
    /// Words separated by whitespace
    SpaceDelimited,
}

impl ScriptKind {
    /// Whether text in this script needs a segmenter to find words
    pub fn is_logographic(self) -> bool {
        matches!(self, Self::Logographic)
    }
}

/// ISO 639-2/B codes that differ from their 639-2/T counterparts
fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    let mapped = match code {
        "fre" => "fra",
        "ger" => "deu",
        "dut" => "nld",
        "gre" => "ell",
        "chi" => "zho",
        "cze" => "ces",
        "ice" => "isl",
        "alb" => "sqi",
        "arm" => "hye",
        "baq" => "eus",
        "bur" => "mya",
        "per" => "fas",
        "geo" => "kat",
        "may" => "msa",
        "mac" => "mkd",
        "rum" => "ron",
        "slo" => "slk",
        "wel" => "cym",
        _ => return None,
    };
    Some(mapped)
}

/// Strip a region or script subtag ("zh-CN", "zh_Hant") and lowercase
fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-3 if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part3(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code);

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
    } else if normalized_code.len() == 3 {
        let part3 = bibliographic_to_terminology(&normalized_code).unwrap_or(&normalized_code);

        if let Some(lang) = Language::from_639_3(part3) {
            if let Some(code_639_1) = lang.to_639_1() {
                return Ok(code_639_1.to_string());
            }
            return Ok(part3.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize leniently: unknown codes fall back to their lowercased primary subtag
pub fn canonical_code(code: &str) -> String {
    normalize_to_part1_or_part3(code).unwrap_or_else(|_| primary_subtag(code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part1_or_part3(code1), normalize_to_part1_or_part3(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Classify the writing system of a language code
pub fn script_kind(code: &str) -> ScriptKind {
    match canonical_code(code).as_str() {
        "zh" | "ja" | "yue" | "lzh" | "wuu" | "hak" | "nan" => ScriptKind::Logographic,
        _ => ScriptKind::SpaceDelimited,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part1_or_part3(code)?;
    let lang = if normalized.len() == 2 {
        Language::from_639_1(&normalized)
    } else {
        Language::from_639_3(&normalized)
    }
    .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Language name for prompts and messages, falling back to the raw code
pub fn display_name(code: &str) -> String {
    get_language_name(code).unwrap_or_else(|_| code.trim().to_string())
}
