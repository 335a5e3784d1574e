/*!
 * Tests for the individual sub-scorers
 */

use transeval::TermMap;
use transeval::evaluation::lexicon::Lexicon;
use transeval::evaluation::terminology::matcher::{EMPTY_MAP_SCORE, TermMatch, match_terms};
use transeval::evaluation::{bleu, discourse, structure};

fn term_map(pairs: &[(&str, &str)]) -> TermMap {
    pairs
        .iter()
        .map(|(source, target)| (source.to_string(), target.to_string()))
        .collect()
}

#[test]
fn test_bleu_withIdenticalShortText_shouldReportHighMatch() {
    let text = "The alloy was annealed at 500 degrees.";
    let report = bleu::score(text, &[text.to_string()], "en");
    assert!(report.score >= 0.9, "score was {}", report.score);
    assert!(report.description.contains("closely matches"));
}

#[test]
fn test_bleu_withMultipleReferences_shouldUseTheBestOne() {
    let candidate = "The grain size decreases with annealing time.";
    let single = bleu::score(candidate, &["Porosity grew slowly.".to_string()], "en");
    let multiple = bleu::score(
        candidate,
        &[
            "Porosity grew slowly.".to_string(),
            "The grain size decreases with annealing time.".to_string(),
        ],
        "en",
    );
    assert!(multiple.score > single.score);
}

#[test]
fn test_bleu_withoutReference_shouldBeNeutral() {
    let report = bleu::score("Any text.", &[], "en");
    assert_eq!(report.score, bleu::NO_REFERENCE_SCORE);
    assert!(report.description.contains("No valid reference"));
}

#[test]
fn test_terminology_withEmptyMap_shouldScoreHigh() {
    let report = match_terms("Anything at all.", &TermMap::new(), "en");
    assert_eq!(report.score, EMPTY_MAP_SCORE);
}

#[test]
fn test_terminology_withCapitalizedTerm_shouldGiveFullCredit() {
    let terms = term_map(&[("纳米材料", "nanomaterials")]);
    let report = match_terms("Nanomaterials are widely used.", &terms, "en");
    assert_eq!(report.score, 1.0);
    assert_eq!(report.checks[0].outcome, TermMatch::Full);
}

#[test]
fn test_terminology_withHalfOfPhrase_shouldGivePartialCredit() {
    let terms = term_map(&[("力学性能", "mechanical properties")]);
    let report = match_terms("The mechanical strength was measured.", &terms, "en");
    assert!((report.score - 0.5).abs() < 1e-6, "score was {}", report.score);
    assert_eq!(report.partial().count(), 1);
}

#[test]
fn test_structure_withOtherTargetLanguage_shouldBeInapplicable() {
    let report = structure::score("我们测试了样品。", "Nous avons testé.", "zh", "fr", &Lexicon::default());
    assert_eq!(report.score, structure::INAPPLICABLE_SCORE);
}

#[test]
fn test_discourse_withDiverseConnectives_shouldBeatNoConnectives() {
    let lexicon = Lexicon::default();
    let connected = "The alloy was heated. However, cracks formed. Therefore, the rate was lowered. \
                     Furthermore, the samples were polished. Moreover, defects were counted. \
                     Finally, hardness was measured. In conclusion, slow heating is preferred.";
    let plain = "The alloy was heated. Cracks formed. The rate was lowered. \
                 The samples were polished. Defects were counted. \
                 Hardness was measured. Slow heating is preferred.";

    let with = discourse::score(connected, &[], "en", &lexicon);
    let without = discourse::score(plain, &[], "en", &lexicon);

    assert!(with.connectives.distinct >= 6);
    assert!(with.cohesion > without.cohesion);
    assert_eq!(without.connectives.total, 0);
}

#[test]
fn test_discourse_withEmptyCandidate_shouldNotPanic() {
    let report = discourse::score("", &["Reference text."], "en", &Lexicon::default());
    assert!((0.0..=1.0).contains(&report.score));
    assert_eq!(report.connectives.total, 0);
}
