/*!
 * Voice conversion heuristic for Chinese -> English.
 *
 * Chinese academic prose often names the agent ("我们发现…", "本文研究…")
 * where English academic prose prefers the passive voice. The score compares
 * agentive source sentences with passive target sentences.
 */

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::evaluation::lexicon::Lexicon;
use crate::evaluation::model::ScoreComponent;
use crate::evaluation::tokenizer::split_sentences;
use crate::language_utils::language_codes_match;

/// Score for language pairs the heuristic does not cover
pub const INAPPLICABLE_SCORE: f32 = 0.7;

/// Score when sentence counts diverge too much to compare
pub const UNRELIABLE_SCORE: f32 = 0.5;

/// Score when the source has no agentive sentences
pub const NO_SIGNAL_SCORE: f32 = 0.8;

/// Allowed sentence count divergence, as a share of the source count
pub const MAX_SENTENCE_DIVERGENCE: f32 = 0.3;

static PASSIVE_VOICE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(
        r"\b(?:is|are|was|were|be|been|being)\s+(?:\w+ed|made|done|shown|found|given|known|taken|seen|written|built|grown|drawn|chosen|held|kept|left|lost|brought|bought|caught|taught|thought|sought|set|put|cut|spread|split|run|begun|won|understood|undergone|withdrawn|frozen|broken|spun|struck|laid|paid|said|sent|spent|told|sold|meant|led|fed|fit|hit|let|shut|bound|wound|ground|forgotten|gotten|proven|driven|hidden|risen|shaken|spoken|stolen|sworn|torn|worn|woven|thrown|blown|flown|sunk|shrunk|dug|hung|stuck|swept|slept|felt|dealt|burnt|learnt)\b",
    )
    .case_insensitive(true)
    .build()
    .expect("valid passive voice regex")
});

/// Counts behind the structure score
#[derive(Debug, Clone, PartialEq)]
pub struct StructureReport {
    /// Score in [0, 1]
    pub score: f32,
    /// Source sentences containing an agentive indicator
    pub agentive_sentences: usize,
    /// Target sentences in the passive voice
    pub passive_sentences: usize,
    /// Whether the heuristic applied to this language pair and text
    pub applicable: bool,
    /// Human-readable explanation
    pub description: String,
}

impl StructureReport {
    fn neutral(score: f32, description: &str) -> Self {
        Self {
            score,
            agentive_sentences: 0,
            passive_sentences: 0,
            applicable: false,
            description: description.to_string(),
        }
    }

    /// Convert into a score component
    pub fn to_component(&self) -> ScoreComponent {
        ScoreComponent::new(self.score, self.description.clone())
    }
}

/// Whether a sentence is in the passive voice
pub fn is_passive(sentence: &str) -> bool {
    PASSIVE_VOICE.is_match(sentence)
}

/// Score active -> passive voice conversion
pub fn score(
    source_text: &str,
    translated_text: &str,
    source_language: &str,
    target_language: &str,
    lexicon: &Lexicon,
) -> StructureReport {
    if !language_codes_match(source_language, "zh") || !language_codes_match(target_language, "en") {
        return StructureReport::neutral(
            INAPPLICABLE_SCORE,
            "Sentence structure conversion is only assessed for Chinese to English translation.",
        );
    }

    let source_sentences = split_sentences(source_text);
    let target_sentences = split_sentences(translated_text);

    let divergence = source_sentences.len().abs_diff(target_sentences.len()) as f32;
    if divergence > source_sentences.len() as f32 * MAX_SENTENCE_DIVERGENCE {
        return StructureReport::neutral(
            UNRELIABLE_SCORE,
            "The source and the translation differ too much in sentence count to compare sentence structure reliably.",
        );
    }

    let agentive_sentences = source_sentences
        .iter()
        .filter(|sentence| {
            lexicon
                .agentive_indicators
                .iter()
                .any(|indicator| sentence.contains(indicator.as_str()))
        })
        .count();
    let passive_sentences = target_sentences.iter().filter(|s| is_passive(s)).count();

    let score = if agentive_sentences > 0 {
        (passive_sentences as f32 / agentive_sentences as f32).min(1.0)
    } else {
        NO_SIGNAL_SCORE
    };

    let verdict = if score >= 0.8 {
        "Sentence structure is converted well: active Chinese sentences are appropriately rendered in the English passive voice."
    } else if score >= 0.5 {
        "Sentence structure conversion has some issues: part of the active Chinese sentences were not rendered in the passive voice."
    } else {
        "Sentence structure conversion is poor: most active Chinese sentences keep the active voice, which does not suit English academic writing."
    };

    StructureReport {
        score,
        agentive_sentences,
        passive_sentences,
        applicable: true,
        description: format!(
            "{}\nThe source has {} agentive sentences; the translation has {} passive sentences.",
            verdict, agentive_sentences, passive_sentences
        ),
    }
}
