/*!
 * N-gram overlap (BLEU) scoring.
 *
 * Blends two views of the same overlap:
 * - Corpus level: the whole candidate against all references at once
 * - Sentence level: each candidate sentence against its best reference
 *   sentence, under several smoothing policies for zero-count n-grams
 *
 * Short candidates lean on the sentence-level score, long ones on the
 * corpus-level score.
 */

use std::collections::HashMap;

use log::debug;

use super::model::{ScoreBand, ScoreComponent, usable_references};
use super::tokenizer::{split_sentences, tokenize, word_count};

/// Highest n-gram order
pub const MAX_ORDER: usize = 4;

/// Score returned when no usable reference exists
pub const NO_REFERENCE_SCORE: f32 = 0.5;

/// Sentence counts diverging by more than this share of the smaller count
/// switch the sentence-level pass to whole-text comparison
pub const SENTENCE_DIVERGENCE_RATIO: f64 = 0.5;

/// Corpus weight for the shortest candidates
pub const CORPUS_WEIGHT_BASE: f64 = 0.3;

/// Extra corpus weight gained as the candidate approaches saturation length
pub const CORPUS_WEIGHT_SPAN: f64 = 0.4;

/// Word count at which the corpus weight stops growing
pub const LENGTH_SATURATION_WORDS: f64 = 100.0;

/// Candidates shorter than this get the score floor
pub const SHORT_TEXT_WORDS: usize = 20;

/// Minimum score for short candidates
pub const SHORT_TEXT_FLOOR: f64 = 0.1;

/// Numerator used by add-epsilon smoothing
const EPSILON: f64 = 0.1;

/// Constant of the length-aware smoothing policy
const LENGTH_AWARE_K: f64 = 5.0;

/// Clipped n-gram statistics of one hypothesis against its references
#[derive(Debug, Clone, PartialEq)]
pub struct NgramStats {
    /// Clipped matches per order
    pub matches: [usize; MAX_ORDER],
    /// Hypothesis n-grams per order
    pub totals: [usize; MAX_ORDER],
    /// Hypothesis length in tokens
    pub hyp_len: usize,
    /// Closest reference length in tokens
    pub ref_len: usize,
}

impl NgramStats {
    /// Collect statistics of `hypothesis` against all `references`
    pub fn collect(hypothesis: &[&str], references: &[Vec<&str>]) -> Self {
        let mut matches = [0; MAX_ORDER];
        let mut totals = [0; MAX_ORDER];

        for order in 1..=MAX_ORDER {
            let hyp_counts = ngram_counts(hypothesis, order);
            let mut max_ref_counts: HashMap<&[&str], usize> = HashMap::new();
            for reference in references {
                for (gram, count) in ngram_counts(reference, order) {
                    let entry = max_ref_counts.entry(gram).or_insert(0);
                    *entry = (*entry).max(count);
                }
            }

            matches[order - 1] = hyp_counts
                .iter()
                .map(|(gram, count)| (*count).min(max_ref_counts.get(gram).copied().unwrap_or(0)))
                .sum();
            totals[order - 1] = hypothesis.len().saturating_sub(order - 1);
        }

        Self {
            matches,
            totals,
            hyp_len: hypothesis.len(),
            ref_len: closest_ref_len(hypothesis.len(), references),
        }
    }

    fn denominator(&self, index: usize) -> f64 {
        self.totals[index].max(1) as f64
    }

    /// Brevity penalty
    pub fn brevity_penalty(&self) -> f64 {
        if self.hyp_len == 0 {
            0.0
        } else if self.hyp_len >= self.ref_len {
            1.0
        } else {
            (1.0 - self.ref_len as f64 / self.hyp_len as f64).exp()
        }
    }
}

fn ngram_counts<'a>(tokens: &'a [&'a str], order: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= order {
        for gram in tokens.windows(order) {
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// Reference length closest to the hypothesis length, shorter wins ties
fn closest_ref_len(hyp_len: usize, references: &[Vec<&str>]) -> usize {
    references
        .iter()
        .map(Vec::len)
        .min_by_key(|len| (len.abs_diff(hyp_len), *len))
        .unwrap_or(0)
}

/// Geometric mean of precisions times the brevity penalty; any zero precision gives 0
fn combine(precisions: &[f64], brevity_penalty: f64) -> f64 {
    if precisions.is_empty() || precisions.iter().any(|p| *p <= 0.0) {
        return 0.0;
    }
    let log_sum: f64 = precisions.iter().map(|p| p.ln()).sum();
    brevity_penalty * (log_sum / precisions.len() as f64).exp()
}

/// Corpus-level BLEU with exponential smoothing, in [0, 1]
///
/// Orders longer than the hypothesis are left out of the geometric mean.
pub fn corpus_bleu(hypothesis: &[&str], references: &[Vec<&str>]) -> f64 {
    let stats = NgramStats::collect(hypothesis, references);
    if stats.hyp_len == 0 {
        return 0.0;
    }

    let mut precisions = Vec::with_capacity(MAX_ORDER);
    let mut smoothing = 1.0;
    for index in 0..MAX_ORDER {
        let total = stats.totals[index];
        if total == 0 {
            break;
        }
        let matched = stats.matches[index];
        if matched == 0 {
            smoothing *= 2.0;
            precisions.push(1.0 / (smoothing * total as f64));
        } else {
            precisions.push(matched as f64 / total as f64);
        }
    }

    combine(&precisions, stats.brevity_penalty())
}

/// Per-order precisions under one smoothing policy
pub type SmoothingFn = fn(&NgramStats) -> [f64; MAX_ORDER];

/// Add a small epsilon to zero-count numerators
fn add_epsilon(stats: &NgramStats) -> [f64; MAX_ORDER] {
    std::array::from_fn(|i| {
        let matched = stats.matches[i] as f64;
        let numerator = if matched == 0.0 { EPSILON } else { matched };
        numerator / stats.denominator(i)
    })
}

/// Add one to numerator and denominator of every order above unigrams
fn add_one(stats: &NgramStats) -> [f64; MAX_ORDER] {
    std::array::from_fn(|i| {
        let matched = stats.matches[i] as f64;
        if i == 0 {
            matched / stats.denominator(i)
        } else {
            (matched + 1.0) / (stats.totals[i] as f64 + 1.0)
        }
    })
}

/// Halve the pseudo-count for each successive zero-count order
fn geometric(stats: &NgramStats) -> [f64; MAX_ORDER] {
    let mut inverse = 1.0;
    std::array::from_fn(|i| {
        let matched = stats.matches[i];
        if matched == 0 {
            inverse *= 2.0;
            1.0 / (inverse * stats.denominator(i))
        } else {
            matched as f64 / stats.denominator(i)
        }
    })
}

/// Like `geometric`, but longer hypotheses receive a larger pseudo-count
fn length_aware(stats: &NgramStats) -> [f64; MAX_ORDER] {
    let length_scale = if stats.hyp_len > 1 {
        (stats.hyp_len as f64).ln() / LENGTH_AWARE_K
    } else {
        1.0
    };
    let mut inverse = 1.0;
    std::array::from_fn(|i| {
        let matched = stats.matches[i];
        if matched == 0 {
            inverse *= 2.0;
            length_scale / (inverse * stats.denominator(i))
        } else {
            matched as f64 / stats.denominator(i)
        }
    })
}

/// Smoothing policies applied at sentence level, by name
pub const SMOOTHING_METHODS: [(&str, SmoothingFn); 4] = [
    ("add-epsilon", add_epsilon),
    ("add-one", add_one),
    ("geometric", geometric),
    ("length-aware", length_aware),
];

/// Sentence-level BLEU of `hypothesis` against one reference under `smoothing`
///
/// An empty hypothesis or one without a single unigram match scores 0.
pub fn sentence_bleu(hypothesis: &[&str], reference: &[&str], smoothing: SmoothingFn) -> f64 {
    let stats = NgramStats::collect(hypothesis, &[reference.to_vec()]);
    if stats.hyp_len == 0 || stats.matches[0] == 0 {
        return 0.0;
    }
    combine(&smoothing(&stats), stats.brevity_penalty())
}

/// Mean after dropping the single highest and lowest value, when more than three exist
fn trimmed_mean(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let kept = if values.len() > 3 {
        &values[1..values.len() - 1]
    } else {
        &values[..]
    };
    Some(kept.iter().sum::<f64>() / kept.len() as f64)
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sentence-level score of a candidate against every reference
pub fn sentence_level_score(candidate: &str, references: &[&str], language: &str) -> f64 {
    let candidate_sentences = split_sentences(candidate);
    let candidate_tokens = tokenize(candidate, language);

    let mut sentence_bests = Vec::new();
    let mut method_scores = Vec::new();

    for reference in references {
        let reference_sentences = split_sentences(reference);
        let (c, r) = (candidate_sentences.len(), reference_sentences.len());

        if c.abs_diff(r) as f64 > c.min(r) as f64 * SENTENCE_DIVERGENCE_RATIO {
            let reference_tokens = tokenize(reference, language);
            for (_, method) in SMOOTHING_METHODS {
                method_scores.push(sentence_bleu(&candidate_tokens, &reference_tokens, method));
            }
            continue;
        }

        let tokenized_refs: Vec<Vec<&str>> = reference_sentences
            .iter()
            .map(|sentence| tokenize(sentence, language))
            .collect();
        for sentence in &candidate_sentences {
            let hypothesis = tokenize(sentence, language);
            let best = tokenized_refs
                .iter()
                .flat_map(|reference| {
                    SMOOTHING_METHODS
                        .iter()
                        .map(|(_, method)| sentence_bleu(&hypothesis, reference, *method))
                        .collect::<Vec<_>>()
                })
                .fold(0.0, f64::max);
            sentence_bests.push(best);
        }
    }

    mean(&sentence_bests)
        .or_else(|| trimmed_mean(&mut method_scores))
        .unwrap_or(0.0)
}

/// Result of BLEU scoring with its sub-scores
#[derive(Debug, Clone, PartialEq)]
pub struct BleuReport {
    /// Blended score in [0, 1]
    pub score: f32,
    /// Corpus-level sub-score, absent when no reference was usable
    pub corpus: Option<f64>,
    /// Sentence-level sub-score, absent when no reference was usable
    pub sentence: Option<f64>,
    /// Candidate word count
    pub word_count: usize,
    /// Human-readable explanation
    pub description: String,
}

impl BleuReport {
    /// Whether the score was computed from at least one reference
    pub fn has_reference(&self) -> bool {
        self.corpus.is_some()
    }

    /// Convert into a score component
    pub fn to_component(&self) -> ScoreComponent {
        ScoreComponent::new(self.score, self.description.clone())
    }
}

/// Blend corpus and sentence scores by candidate length and apply the short-text floor
pub fn blend(corpus: f64, sentence: f64, words: usize) -> f64 {
    let length_factor = (words as f64 / LENGTH_SATURATION_WORDS).min(1.0);
    let corpus_weight = CORPUS_WEIGHT_BASE + CORPUS_WEIGHT_SPAN * length_factor;
    let blended = (corpus_weight * corpus + (1.0 - corpus_weight) * sentence).clamp(0.0, 1.0);

    if words < SHORT_TEXT_WORDS && blended < SHORT_TEXT_FLOOR {
        SHORT_TEXT_FLOOR
    } else {
        blended
    }
}

/// Score a candidate against its reference translations
pub fn score(candidate: &str, references: &[String], target_language: &str) -> BleuReport {
    let references = usable_references(references);
    let words = word_count(candidate, target_language);

    if references.is_empty() {
        return BleuReport {
            score: NO_REFERENCE_SCORE,
            corpus: None,
            sentence: None,
            word_count: words,
            description: "No valid reference translation was provided, so BLEU cannot be \
                          computed accurately. A default score of 0.5 is used."
                .to_string(),
        };
    }

    let hypothesis = tokenize(candidate, target_language);
    let tokenized_refs: Vec<Vec<&str>> = references
        .iter()
        .map(|reference| tokenize(reference, target_language))
        .collect();

    let corpus = corpus_bleu(&hypothesis, &tokenized_refs);
    let sentence = sentence_level_score(candidate, &references, target_language);
    let final_score = blend(corpus, sentence, words);

    debug!(
        "BLEU: corpus={:.3} sentence={:.3} words={} final={:.3}",
        corpus, sentence, words, final_score
    );

    let verdict = match ScoreBand::of(final_score as f32) {
        ScoreBand::Excellent => {
            "The translation closely matches the reference translation; quality is excellent."
        }
        ScoreBand::Good => "The translation matches the reference translation well.",
        ScoreBand::Fair => {
            "The translation matches the reference translation only moderately; there is room for improvement."
        }
        ScoreBand::Poor => {
            "The translation differs substantially from the reference translation; review and revise it."
        }
    };

    BleuReport {
        score: final_score as f32,
        corpus: Some(corpus),
        sentence: Some(sentence),
        word_count: words,
        description: format!(
            "{} (corpus BLEU: {:.2}, sentence BLEU: {:.2}, length: {} words)",
            verdict, corpus, sentence, words
        ),
    }
}
