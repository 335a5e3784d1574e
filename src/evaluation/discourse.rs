/*!
 * Discourse coherence scoring.
 *
 * Four independent heuristics over the candidate text:
 * - Cohesion: connective usage, calibrated against the references when they use any
 * - Length variation: how evenly sentence lengths are distributed
 * - Repetition: content words used three times or more
 * - Pronoun reference: pronouns without a nearby article as antecedent proxy
 */

use std::collections::HashMap;
use std::fmt::Write as _;

use log::debug;

use crate::evaluation::lexicon::{ConnectiveLexicon, Lexicon};
use crate::evaluation::model::{ScoreBand, ScoreComponent};
use crate::evaluation::tokenizer::{count_whole_word, split_sentences, whole_word_positions, words};

/// Weights of the four sub-scores
pub const COHESION_WEIGHT: f32 = 0.4;
/// Weight of sentence length variation
pub const LENGTH_VARIATION_WEIGHT: f32 = 0.2;
/// Weight of lexical repetition
pub const REPETITION_WEIGHT: f32 = 0.2;
/// Weight of pronoun reference
pub const PRONOUN_WEIGHT: f32 = 0.2;

/// Share of connective count in the cohesion score; diversity gets the rest
pub const CONNECTIVE_COUNT_WEIGHT: f32 = 0.7;

/// Expected connectives per this many words when no reference calibrates density
pub const WORDS_PER_CONNECTIVE: f32 = 100.0;

/// Length variation score for texts with at most one sentence
pub const SINGLE_SENTENCE_SCORE: f32 = 0.7;

/// Words shorter than or equal to this are never counted as repeated
pub const MIN_CONTENT_WORD_CHARS: usize = 3;

/// Occurrences that make a content word "repeated"
pub const REPETITION_MIN_OCCURRENCES: usize = 3;

/// Penalty multiplier on the repetition ratio
pub const REPETITION_PENALTY: f32 = 3.0;

/// Characters inspected before a pronoun for an antecedent
pub const PRONOUN_WINDOW_CHARS: usize = 50;

/// Minimum denominator of the pronoun issue ratio
pub const PRONOUN_MIN_DENOMINATOR: usize = 10;

/// Repeated words reported in feedback
pub const MAX_REPORTED_WORDS: usize = 3;

/// Connective usage of one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectiveUsage {
    /// Occurrences per category, in lexicon order
    pub per_category: Vec<(&'static str, usize)>,
    /// Total occurrences
    pub total: usize,
    /// Distinct connectives used
    pub distinct: usize,
}

impl ConnectiveUsage {
    /// Count connectives in `text`
    pub fn measure(text: &str, connectives: &ConnectiveLexicon) -> Self {
        let mut usage = Self::default();
        for (category, list) in connectives.categories() {
            let mut category_total = 0;
            for connective in list {
                let count = count_whole_word(text, connective);
                if count > 0 {
                    usage.distinct += 1;
                }
                category_total += count;
            }
            usage.total += category_total;
            usage.per_category.push((category, category_total));
        }
        usage
    }

    /// Distinct connectives per occurrence
    pub fn diversity(&self) -> f32 {
        self.distinct as f32 / self.total.max(1) as f32
    }

    /// Categories with no occurrence at all
    pub fn absent_categories(&self) -> Vec<&'static str> {
        self.per_category
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(category, _)| *category)
            .collect()
    }
}

/// Sub-scores and findings of the discourse scorer
#[derive(Debug, Clone, PartialEq)]
pub struct DiscourseReport {
    /// Composite score in [0, 1]
    pub score: f32,
    /// Connective usage score
    pub cohesion: f32,
    /// Sentence length variation score
    pub length_variation: f32,
    /// Lexical repetition score
    pub repetition: f32,
    /// Pronoun reference score
    pub pronoun: f32,
    /// Connective usage of the candidate
    pub connectives: ConnectiveUsage,
    /// Connective categories the candidate never uses
    pub absent_categories: Vec<&'static str>,
    /// Most repeated content words, most frequent first
    pub repeated_words: Vec<String>,
    /// Pronouns without an article in the preceding window
    pub pronoun_issues: usize,
    /// Mean sentence length in words
    pub mean_sentence_length: f32,
    /// Human-readable explanation
    pub description: String,
}

impl DiscourseReport {
    /// Convert into a score component
    pub fn to_component(&self) -> ScoreComponent {
        ScoreComponent::new(self.score, self.description.clone())
    }
}

fn clamp(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

fn cohesion_score(candidate: &ConnectiveUsage, references: &[&str], word_total: usize, lexicon: &Lexicon) -> f32 {
    let reference_usage: Vec<ConnectiveUsage> = references
        .iter()
        .map(|reference| ConnectiveUsage::measure(reference, &lexicon.connectives))
        .collect();
    let (avg_count, avg_diversity) = if reference_usage.is_empty() {
        (0.0, 0.0)
    } else {
        let n = reference_usage.len() as f32;
        (
            reference_usage.iter().map(|u| u.total as f32).sum::<f32>() / n,
            reference_usage.iter().map(ConnectiveUsage::diversity).sum::<f32>() / n,
        )
    };

    let count_score = if avg_count > 0.0 {
        (candidate.total as f32 / avg_count).min(1.0)
    } else {
        let expected = (word_total as f32 / WORDS_PER_CONNECTIVE).max(1.0);
        (candidate.total as f32 / expected).min(1.0)
    };
    let diversity_score = if avg_diversity > 0.0 {
        (candidate.diversity() / avg_diversity).min(1.0)
    } else {
        candidate.diversity().min(1.0)
    };

    CONNECTIVE_COUNT_WEIGHT * count_score + (1.0 - CONNECTIVE_COUNT_WEIGHT) * diversity_score
}

/// Score and mean sentence length
fn length_variation(sentences: &[&str], language: &str) -> (f32, f32) {
    let lengths: Vec<f32> = sentences
        .iter()
        .map(|sentence| words(sentence, language).len() as f32)
        .collect();
    let mean = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<f32>() / lengths.len() as f32
    };
    if lengths.len() <= 1 {
        return (SINGLE_SENTENCE_SCORE, mean);
    }

    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f32>() / lengths.len() as f32;
    let cv = if mean > 0.0 { variance.sqrt() / mean } else { 0.0 };
    (clamp(1.0 - cv), mean)
}

/// Score and repeated words ordered by count, then alphabetically
fn repetition(tokens: &[String], lexicon: &Lexicon) -> (f32, Vec<String>) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in tokens {
        if token.chars().count() > MIN_CONTENT_WORD_CHARS && !lexicon.is_stop_word(token) {
            *counts.entry(token.as_str()).or_insert(0) += 1;
        }
    }

    let mut repeated: Vec<(&str, usize)> = counts
        .into_iter()
        .filter(|(_, count)| *count >= REPETITION_MIN_OCCURRENCES)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let repeated_total: usize = repeated.iter().map(|(_, count)| count).sum();
    let ratio = if tokens.is_empty() {
        0.0
    } else {
        repeated_total as f32 / tokens.len() as f32
    };

    (
        clamp(1.0 - REPETITION_PENALTY * ratio),
        repeated.into_iter().map(|(word, _)| word.to_string()).collect(),
    )
}

/// Number of pronouns with no article in the preceding window
fn pronoun_issues(text: &str, lexicon: &Lexicon) -> usize {
    let mut issues = 0;
    for pronoun in &lexicon.pronouns {
        for position in whole_word_positions(text, pronoun) {
            let preceding: Vec<char> = text[..position].chars().collect();
            let window: String = preceding[preceding.len().saturating_sub(PRONOUN_WINDOW_CHARS)..]
                .iter()
                .collect();
            let has_article = lexicon
                .articles
                .iter()
                .any(|article| count_whole_word(&window, article) > 0);
            if !has_article {
                issues += 1;
            }
        }
    }
    issues
}

/// Score the discourse coherence of a candidate
pub fn score(candidate: &str, references: &[&str], language: &str, lexicon: &Lexicon) -> DiscourseReport {
    let tokens: Vec<String> = words(candidate, language)
        .into_iter()
        .map(str::to_lowercase)
        .collect();
    let sentences = split_sentences(candidate);

    let connectives = ConnectiveUsage::measure(candidate, &lexicon.connectives);
    let cohesion = clamp(cohesion_score(&connectives, references, tokens.len(), lexicon));
    let (length_variation, mean_sentence_length) = length_variation(&sentences, language);
    let (repetition, repeated) = repetition(&tokens, lexicon);
    let pronoun_issues = pronoun_issues(candidate, lexicon);
    let pronoun = clamp(
        1.0 - pronoun_issues as f32 / sentences.len().max(PRONOUN_MIN_DENOMINATOR) as f32,
    );

    let score = clamp(
        COHESION_WEIGHT * cohesion
            + LENGTH_VARIATION_WEIGHT * length_variation
            + REPETITION_WEIGHT * repetition
            + PRONOUN_WEIGHT * pronoun,
    );

    debug!(
        "Discourse: cohesion={:.2} length={:.2} repetition={:.2} pronoun={:.2} final={:.2}",
        cohesion, length_variation, repetition, pronoun, score
    );

    let mut report = DiscourseReport {
        score,
        cohesion,
        length_variation,
        repetition,
        pronoun,
        absent_categories: connectives.absent_categories(),
        connectives,
        repeated_words: repeated.into_iter().take(MAX_REPORTED_WORDS).collect(),
        pronoun_issues,
        mean_sentence_length,
        description: String::new(),
    };
    report.description = describe(&report);
    report
}

fn describe(report: &DiscourseReport) -> String {
    let mut text = format!("Discourse coherence score: {:.2}.", report.score);

    let cohesion = if report.cohesion < 0.6 {
        if report.connectives.total == 0 {
            "Almost no connectives are used, which seriously weakens the logical flow."
        } else if report.connectives.diversity() < 0.5 {
            "Connectives lack variety; the same connectives are used repeatedly."
        } else {
            "Connectives are used too sparingly, which weakens the logical flow."
        }
    } else if report.cohesion < 0.8 {
        "Connective use is reasonable but could be richer."
    } else {
        "Connectives are used appropriately and with variety."
    };
    let _ = write!(text, "\n- Connectives: {}", cohesion);
    if !report.absent_categories.is_empty() {
        let _ = write!(
            text,
            " No {} connectives are used.",
            report.absent_categories.join(", ")
        );
    }

    if report.length_variation < 0.6 {
        let _ = write!(
            text,
            "\n- Sentence length: Sentence lengths vary too much (mean {:.1} words), which hurts readability.",
            report.mean_sentence_length
        );
    } else {
        text.push_str("\n- Sentence length: Sentence lengths are well balanced.");
    }

    if report.repetition < 0.7 && !report.repeated_words.is_empty() {
        let _ = write!(
            text,
            "\n- Repetition: Some words are repeated too often, for example: {}.",
            report.repeated_words.join(", ")
        );
    } else {
        text.push_str("\n- Repetition: No noticeable word repetition.");
    }

    if report.pronoun < 0.7 && report.pronoun_issues > 0 {
        let _ = write!(
            text,
            "\n- Pronoun reference: {} pronouns have no clear antecedent nearby.",
            report.pronoun_issues
        );
    } else {
        text.push_str("\n- Pronoun reference: Pronouns are used clearly.");
    }

    let overall = match ScoreBand::of(report.score) {
        ScoreBand::Excellent => "Overall, the translation reads coherently and naturally.",
        ScoreBand::Good => "Overall, coherence is good with minor issues.",
        ScoreBand::Fair => "Overall, coherence is fair with clear room for improvement.",
        ScoreBand::Poor => "Overall, coherence is poor and needs work in several areas.",
    };
    let _ = write!(text, "\n{}", overall);
    text
}
