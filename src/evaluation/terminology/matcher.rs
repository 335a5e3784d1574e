/*!
 * Terminology matcher: checks that expected target terms appear in the candidate.
 */

use std::fmt::Write as _;

use crate::evaluation::model::{ScoreBand, ScoreComponent, TermMap};
use crate::evaluation::tokenizer::contains_term;
use crate::language_utils::{ScriptKind, script_kind};

/// Score when there are no in-domain terms to check
pub const EMPTY_MAP_SCORE: f32 = 0.8;

/// Share of constituent words needed for partial credit
pub const PARTIAL_CREDIT_THRESHOLD: f32 = 0.5;

/// Outcome of checking one term pair
#[derive(Debug, Clone, PartialEq)]
pub enum TermMatch {
    /// The target term appears as a whole
    Full,
    /// Only some constituent words of a multi-word term appear
    Partial {
        /// Fraction of words found, also the credit awarded
        ratio: f32,
        /// Words that were found
        found: Vec<String>,
        /// Words that were not found
        missing: Vec<String>,
    },
    /// Not found, or too few words found
    Missing,
}

impl TermMatch {
    /// Credit contributed to the score
    pub fn credit(&self) -> f32 {
        match self {
            Self::Full => 1.0,
            Self::Partial { ratio, .. } => *ratio,
            Self::Missing => 0.0,
        }
    }
}

/// One checked term pair
#[derive(Debug, Clone, PartialEq)]
pub struct TermCheck {
    /// Term in the source text
    pub source_term: String,
    /// Expected rendering
    pub target_term: String,
    /// What was found in the candidate
    pub outcome: TermMatch,
}

/// Result of matching a term map against a candidate
#[derive(Debug, Clone, PartialEq)]
pub struct TerminologyReport {
    /// Score in [0, 1]
    pub score: f32,
    /// Per-pair outcomes, in term map order
    pub checks: Vec<TermCheck>,
    /// Human-readable feedback itemizing every problem
    pub feedback: String,
}

impl TerminologyReport {
    /// A report that carries only a score and an explanation
    pub fn neutral(score: f32, feedback: impl Into<String>) -> Self {
        Self {
            score,
            checks: Vec::new(),
            feedback: feedback.into(),
        }
    }

    /// Pairs whose target term was not found
    pub fn incorrect(&self) -> impl Iterator<Item = &TermCheck> {
        self.checks
            .iter()
            .filter(|check| matches!(check.outcome, TermMatch::Missing))
    }

    /// Pairs that earned partial credit
    pub fn partial(&self) -> impl Iterator<Item = &TermCheck> {
        self.checks
            .iter()
            .filter(|check| matches!(check.outcome, TermMatch::Partial { .. }))
    }

    /// Convert into a score component
    pub fn to_component(&self) -> ScoreComponent {
        ScoreComponent::new(self.score, self.feedback.clone())
    }
}

/// Check one target term against the candidate
pub fn match_term(candidate: &str, target_term: &str, script: ScriptKind) -> TermMatch {
    if contains_term(candidate, target_term, script) {
        return TermMatch::Full;
    }
    if script.is_logographic() {
        return TermMatch::Missing;
    }

    let words: Vec<&str> = target_term.split_whitespace().collect();
    if words.len() < 2 {
        return TermMatch::Missing;
    }

    let (found, missing): (Vec<&str>, Vec<&str>) = words
        .iter()
        .copied()
        .partition(|word| contains_term(candidate, word, script));
    let ratio = found.len() as f32 / words.len() as f32;

    if !found.is_empty() && ratio >= PARTIAL_CREDIT_THRESHOLD {
        TermMatch::Partial {
            ratio,
            found: found.into_iter().map(str::to_string).collect(),
            missing: missing.into_iter().map(str::to_string).collect(),
        }
    } else {
        TermMatch::Missing
    }
}

/// Score how many expected target terms the candidate uses
pub fn match_terms(candidate: &str, terms: &TermMap, target_language: &str) -> TerminologyReport {
    if terms.is_empty() {
        return TerminologyReport::neutral(
            EMPTY_MAP_SCORE,
            "No in-domain terms were found in the source text, so there is no terminology to check.",
        );
    }

    let script = script_kind(target_language);
    let checks: Vec<TermCheck> = terms
        .iter()
        .map(|(source, target)| TermCheck {
            source_term: source.clone(),
            target_term: target.clone(),
            outcome: match_term(candidate, target, script),
        })
        .collect();

    let credits: f32 = checks.iter().map(|check| check.outcome.credit()).sum();
    let score = (credits / checks.len() as f32).clamp(0.0, 1.0);

    let mut report = TerminologyReport {
        score,
        checks,
        feedback: String::new(),
    };
    report.feedback = describe(&report, credits);
    report
}

fn describe(report: &TerminologyReport, credits: f32) -> String {
    let total = report.checks.len();
    let mut feedback = match ScoreBand::of(report.score) {
        ScoreBand::Excellent => format!(
            "Terminology accuracy is high: {:.1} of {} domain terms are rendered as expected.",
            credits, total
        ),
        ScoreBand::Good | ScoreBand::Fair if report.score >= 0.5 => format!(
            "Terminology is partly accurate: {:.1} of {} domain terms are rendered as expected, \
             but there is room for improvement.",
            credits, total
        ),
        _ => format!(
            "Terminology accuracy is low: only {:.1} of {} domain terms are rendered as expected.",
            credits, total
        ),
    };

    let incorrect: Vec<&TermCheck> = report.incorrect().collect();
    if !incorrect.is_empty() {
        feedback.push_str("\nThe following terms may be mistranslated:");
        for check in incorrect {
            let _ = write!(feedback, "\n{}", missing_term_line(check));
        }
    }

    let partial: Vec<&TermCheck> = report.partial().collect();
    if !partial.is_empty() {
        feedback.push_str("\nThe following terms are only partially correct:");
        for check in partial {
            if let TermMatch::Partial { found, missing, .. } = &check.outcome {
                let _ = write!(
                    feedback,
                    "\n- '{}' is usually rendered as '{}'; found: {}; missing: {}.",
                    check.source_term,
                    check.target_term,
                    found.join(", "),
                    missing.join(", ")
                );
            }
        }
    }

    feedback
}

/// Feedback and suggestion line for a term that was not found
pub fn missing_term_line(check: &TermCheck) -> String {
    format!(
        "- '{}' should be translated as '{}', but it was not found in the translation.",
        check.source_term, check.target_term
    )
}
