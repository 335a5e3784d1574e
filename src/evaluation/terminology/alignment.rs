/*!
 * Term pair extraction by aligning a source text with a reference translation.
 *
 * Candidate terms are pulled from both sides by script: noun runs and short
 * CJK runs for logographic text, capitalized runs, hyphenated compounds and
 * technical suffix words for alphabetic text. Source candidates are then
 * paired with reference candidates at a similar relative position and of a
 * similar normalized length.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::evaluation::model::TermMap;
use crate::evaluation::tokenizer::{char_positions, is_word, noun_phrases, tokenize_script};
use crate::language_utils::{ScriptKind, script_kind};

/// Minimum combined score for a pair to be accepted
pub const ALIGNMENT_THRESHOLD: f64 = 0.5;

/// Weight of positional similarity in the combined score
pub const POSITION_WEIGHT: f64 = 0.7;

/// Weight of length similarity in the combined score
pub const LENGTH_WEIGHT: f64 = 0.3;

/// Below this many pairs the proximity fallback runs
pub const MIN_ALIGNED_PAIRS: usize = 2;

/// Largest relative offset difference accepted by the fallback
pub const FALLBACK_MAX_DISTANCE: f64 = 0.2;

static CJK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{4e00}-\x{9fa5}]{2,5}").expect("valid CJK regex"));

static CAPITALIZED_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]*(?:\s+[a-z]+){0,3}\b").expect("valid capitalized regex"));

static HYPHENATED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+(?:-\w+)+\b").expect("valid hyphenated regex"));

static TECHNICAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"\b[a-z]+(?:ics|ity|tion|sion|ment|logy|graphy|meter)\b")
        .case_insensitive(true)
        .build()
        .expect("valid suffix regex")
});

/// Which side of the pair a text is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Source,
    Reference,
}

fn min_term_chars(script: ScriptKind) -> usize {
    if script.is_logographic() { 2 } else { 3 }
}

/// Characters per "unit" when comparing lengths across scripts
fn length_unit(script: ScriptKind) -> f64 {
    if script.is_logographic() { 2.0 } else { 3.0 }
}

fn push_unique(candidates: &mut Vec<String>, candidate: &str) {
    if !candidates.iter().any(|c| c == candidate) {
        candidates.push(candidate.to_string());
    }
}

/// Term candidates of one text, deduplicated, in discovery order
fn term_candidates(text: &str, script: ScriptKind, side: Side) -> Vec<String> {
    let mut candidates = Vec::new();
    match script {
        ScriptKind::Logographic => {
            for phrase in noun_phrases(text) {
                push_unique(&mut candidates, &phrase);
            }
            for run in CJK_RUN.find_iter(text) {
                push_unique(&mut candidates, run.as_str());
            }
        }
        ScriptKind::SpaceDelimited => {
            for run in CAPITALIZED_RUN.find_iter(text) {
                push_unique(&mut candidates, run.as_str());
            }
            for word in HYPHENATED.find_iter(text) {
                push_unique(&mut candidates, word.as_str());
            }
            if side == Side::Source {
                for word in TECHNICAL_SUFFIX.find_iter(text) {
                    push_unique(&mut candidates, word.as_str());
                }
            }
        }
    }
    let min_chars = min_term_chars(script);
    candidates.retain(|c| c.chars().count() >= min_chars);
    candidates
}

/// A candidate with its occurrences as relative offsets in [0, 1)
#[derive(Debug, Clone)]
struct Located {
    term: String,
    offsets: Vec<f64>,
    normalized_len: f64,
}

fn locate(text: &str, term: String, script: ScriptKind) -> Option<Located> {
    let length = text.chars().count();
    if length == 0 {
        return None;
    }
    let offsets: Vec<f64> = char_positions(text, &term, script)
        .into_iter()
        .map(|pos| pos as f64 / length as f64)
        .collect();
    if offsets.is_empty() {
        return None;
    }
    let normalized_len = term.chars().count() as f64 / length_unit(script);
    Some(Located {
        term,
        offsets,
        normalized_len,
    })
}

/// Best positional agreement over every pair of occurrences
fn position_similarity(source: &Located, reference: &Located) -> f64 {
    source
        .offsets
        .iter()
        .flat_map(|s| reference.offsets.iter().map(move |r| (1.0 - 2.0 * (s - r).abs()).max(0.0)))
        .fold(0.0, f64::max)
}

fn length_ratio(source: &Located, reference: &Located) -> f64 {
    let (a, b) = (source.normalized_len, reference.normalized_len);
    let longer = a.max(b);
    if longer <= 0.0 { 0.0 } else { a.min(b) / longer }
}

/// Combined alignment score of a source and a reference candidate
fn alignment_score(source: &Located, reference: &Located) -> f64 {
    POSITION_WEIGHT * position_similarity(source, reference) + LENGTH_WEIGHT * length_ratio(source, reference)
}

/// Extract term pairs from a source text and its reference translation
pub fn align_terms(
    source_text: &str,
    reference_text: &str,
    source_language: &str,
    target_language: &str,
) -> TermMap {
    let source_script = script_kind(source_language);
    let reference_script = script_kind(target_language);

    let mut sources: Vec<Located> = term_candidates(source_text, source_script, Side::Source)
        .into_iter()
        .filter_map(|term| locate(source_text, term, source_script))
        .collect();
    // longest first, so specific terms claim their partner before generic ones
    sources.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));

    let reference_candidates: Vec<Located> =
        term_candidates(reference_text, reference_script, Side::Reference)
            .into_iter()
            .filter_map(|term| locate(reference_text, term, reference_script))
            .collect();

    let mut pool = reference_candidates.clone();
    let mut pairs = TermMap::new();

    for source in &sources {
        let best = pool
            .iter()
            .enumerate()
            .map(|(idx, reference)| (idx, alignment_score(source, reference)))
            .filter(|(_, score)| *score > ALIGNMENT_THRESHOLD)
            .fold(None, |best: Option<(usize, f64)>, candidate| match best {
                Some((_, best_score)) if best_score >= candidate.1 => best,
                _ => Some(candidate),
            });

        if let Some((idx, score)) = best {
            let reference = pool.remove(idx);
            debug!("Aligned '{}' -> '{}' ({:.2})", source.term, reference.term, score);
            pairs.insert(source.term.clone(), reference.term);
        }
    }

    if pairs.len() < MIN_ALIGNED_PAIRS {
        proximity_fallback(
            source_text,
            source_script,
            &reference_candidates,
            &mut pairs,
        );
    }

    pairs
}

/// Looser pass: pair source words with the first reference candidate close in position
fn proximity_fallback(
    source_text: &str,
    source_script: ScriptKind,
    reference_candidates: &[Located],
    pairs: &mut TermMap,
) {
    let length = source_text.chars().count();
    if length == 0 {
        return;
    }
    let min_chars = min_term_chars(source_script);

    let mut references: Vec<&Located> = reference_candidates.iter().collect();
    references.sort_by(|a, b| a.offsets[0].total_cmp(&b.offsets[0]));
    let mut used: Vec<String> = pairs.values().cloned().collect();

    for word in tokenize_script(source_text, source_script) {
        if !is_word(word) || word.chars().count() < min_chars || pairs.contains_key(word) {
            continue;
        }
        let Some(first) = char_positions(source_text, word, source_script).first().copied() else {
            continue;
        };
        let offset = first as f64 / length as f64;

        let partner = references.iter().find(|reference| {
            !used.contains(&reference.term) && (offset - reference.offsets[0]).abs() < FALLBACK_MAX_DISTANCE
        });
        if let Some(reference) = partner {
            debug!("Fallback aligned '{}' -> '{}'", word, reference.term);
            pairs.insert(word.to_string(), reference.term.clone());
            used.push(reference.term.clone());
        }
    }
}
