/*!
 * Suggestion generation from sub-score reports.
 */

use std::collections::BTreeMap;

use crate::evaluation::bleu::BleuReport;
use crate::evaluation::discourse::DiscourseReport;
use crate::evaluation::structure::StructureReport;
use crate::evaluation::terminology::TerminologyReport;
use crate::evaluation::terminology::matcher::missing_term_line;

/// Sub-scores below this trigger suggestions unless configured otherwise
pub const DEFAULT_SUGGESTION_THRESHOLD: f32 = 0.7;

/// Cohesion below this asks for more connectives
const COHESION_TRIGGER: f32 = 0.6;
/// Length variation below this asks for balanced sentences
const LENGTH_TRIGGER: f32 = 0.6;
/// Repetition below this asks for fewer repeated words
const REPETITION_TRIGGER: f32 = 0.7;
/// Pronoun score below this asks for clearer references
const PRONOUN_TRIGGER: f32 = 0.7;

/// Shown when no rule triggers
pub const AFFIRMATIVE_SUGGESTION: &str =
    "The translation is of good overall quality; keep it up.";

/// Ordered suggestion list without duplicates
#[derive(Debug, Default)]
struct Suggestions(Vec<String>);

impl Suggestions {
    fn push(&mut self, suggestion: impl Into<String>) {
        let suggestion = suggestion.into();
        if !self.0.contains(&suggestion) {
            self.0.push(suggestion);
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

/// Build improvement suggestions; the result is never empty
pub fn build_suggestions(
    bleu: &BleuReport,
    terminology: &TerminologyReport,
    structure: &StructureReport,
    discourse: &DiscourseReport,
    threshold: f32,
) -> Vec<String> {
    let mut suggestions = Suggestions::default();

    if terminology.score < threshold {
        suggestions.push(
            "Pay attention to the accurate translation of technical terms; consult the domain glossary or a specialist dictionary.",
        );
        for check in terminology.incorrect() {
            suggestions.push(missing_term_line(check));
        }
    }

    if structure.score < threshold {
        suggestions.push(
            "When translating Chinese into English, convert active Chinese sentences into the passive voice where English academic writing expects it.",
        );
        suggestions.push(
            "Pay particular attention to sentences describing research procedures, methods and results, which usually take the passive voice in English academic writing.",
        );
    }

    if discourse.score < threshold {
        let before = suggestions.len();
        if discourse.cohesion < COHESION_TRIGGER {
            let mut line = "Add transitions and connectives (such as however, therefore, furthermore) to make the logical flow clearer.".to_string();
            if !discourse.absent_categories.is_empty() {
                line.push_str(&format!(
                    " Missing categories: {}.",
                    discourse.absent_categories.join(", ")
                ));
            }
            suggestions.push(line);
        }
        if discourse.length_variation < LENGTH_TRIGGER {
            suggestions.push(
                "Balance long and short sentences to avoid large differences in sentence length.",
            );
        }
        if discourse.repetition < REPETITION_TRIGGER && !discourse.repeated_words.is_empty() {
            suggestions.push(format!(
                "Avoid repeating the same words ({}); use synonyms or rephrase.",
                discourse.repeated_words.join(", ")
            ));
        }
        if discourse.pronoun < PRONOUN_TRIGGER && discourse.pronoun_issues > 0 {
            suggestions.push(
                "Make sure every pronoun has a clear antecedent; repeat the noun where the reference is ambiguous.",
            );
        }
        if suggestions.len() == before {
            suggestions.push("Improve the logical flow and coherence between sentences.");
        }
    }

    if bleu.score < threshold {
        if bleu.has_reference() {
            suggestions.push(
                "The translation differs noticeably from the reference translation; study high-quality reference translations for phrasing and style.",
            );
        } else {
            suggestions.push(
                "Provide at least one reference translation so that n-gram overlap can be measured.",
            );
        }
    }

    let mut suggestions = suggestions.0;
    if suggestions.is_empty() {
        suggestions.push(AFFIRMATIVE_SUGGESTION.to_string());
    }
    suggestions
}

/// Detailed feedback keyed by sub-score name
pub fn detailed_feedback(
    bleu: &BleuReport,
    terminology: &TerminologyReport,
    structure: &StructureReport,
    discourse: &DiscourseReport,
) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("bleu".to_string(), bleu.description.clone()),
        ("terminology".to_string(), terminology.feedback.clone()),
        ("sentence_structure".to_string(), structure.description.clone()),
        ("discourse".to_string(), discourse.description.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::lexicon::Lexicon;
    use crate::evaluation::model::TermMap;
    use crate::evaluation::terminology::matcher::match_terms;
    use crate::evaluation::{bleu, discourse, structure};

    const GOOD_TEXT: &str = "The samples were tested. However, the data were analyzed carefully.";

    fn reports(candidate: &str, terms: &TermMap) -> (BleuReport, TerminologyReport, StructureReport, DiscourseReport) {
        let references = vec![candidate.to_string()];
        (
            bleu::score(candidate, &references, "en"),
            match_terms(candidate, terms, "en"),
            structure::score("我们测试了样品。作者分析了数据。", candidate, "zh", "en", &Lexicon::default()),
            discourse::score(candidate, &[candidate], "en", &Lexicon::default()),
        )
    }

    #[test]
    fn test_buildSuggestions_whenAllPass_shouldBeAffirmative() {
        let (b, t, s, d) = reports(GOOD_TEXT, &TermMap::new());
        let suggestions = build_suggestions(&b, &t, &s, &d, DEFAULT_SUGGESTION_THRESHOLD);
        assert_eq!(suggestions, vec![AFFIRMATIVE_SUGGESTION.to_string()]);
    }

    #[test]
    fn test_buildSuggestions_shouldListEachIncorrectTerm() {
        let terms: TermMap = [("合金", "alloy"), ("陶瓷", "ceramic")]
            .into_iter()
            .map(|(s, t)| (s.to_string(), t.to_string()))
            .collect();
        let (b, t, s, d) = reports(GOOD_TEXT, &terms);
        let suggestions = build_suggestions(&b, &t, &s, &d, DEFAULT_SUGGESTION_THRESHOLD);
        assert!(suggestions.iter().any(|l| l.contains("'合金' should be translated as 'alloy'")));
        assert!(suggestions.iter().any(|l| l.contains("'陶瓷' should be translated as 'ceramic'")));
    }

    #[test]
    fn test_buildSuggestions_shouldNotDuplicate() {
        let (b, t, s, d) = reports("We test it. We test it. We test it.", &TermMap::new());
        let suggestions = build_suggestions(&b, &t, &s, &d, 1.1);
        let mut deduped = suggestions.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), suggestions.len());
        assert!(!suggestions.is_empty());
    }

    #[test]
    fn test_detailedFeedback_shouldHaveFourKeys() {
        let (b, t, s, d) = reports(GOOD_TEXT, &TermMap::new());
        let feedback = detailed_feedback(&b, &t, &s, &d);
        assert_eq!(
            feedback.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["bleu", "discourse", "sentence_structure", "terminology"]
        );
    }
}
