/*!
 * Tests for tokenization and sentence splitting
 */

use transeval::evaluation::tokenizer::{
    char_positions, contains_term, count_whole_word, split_sentences, tokenize, word_count,
};
use transeval::language_utils::ScriptKind;

#[test]
fn test_tokenize_english_shouldKeepHyphenatedWords() {
    let tokens = tokenize("Single-crystal films, grown at 500 K.", "en");
    assert_eq!(tokens, vec!["Single-crystal", "films", ",", "grown", "at", "500", "K", "."]);
    assert_eq!(word_count("Single-crystal films, grown at 500 K.", "en"), 6);
}

#[test]
fn test_tokenize_chinese_shouldSegmentWithoutWhitespace() {
    let tokens = tokenize("我们研究了纳米材料", "zh");
    assert!(tokens.len() > 1);
    assert_eq!(tokens.concat(), "我们研究了纳米材料");
}

#[test]
fn test_splitSentences_withMixedTerminators_shouldSplitEachSentence() {
    let sentences = split_sentences("样品很硬。它很脆！ The film cracked. Why? Values like 3.5 stay.");
    assert_eq!(
        sentences,
        vec!["样品很硬。", "它很脆！", "The film cracked.", "Why?", "Values like 3.5 stay."]
    );
}

#[test]
fn test_splitSentences_withEmptyText_shouldReturnNothing() {
    assert!(split_sentences("").is_empty());
    assert!(split_sentences("   ").is_empty());
}

#[test]
fn test_countWholeWord_shouldIgnoreEmbeddedMatches() {
    let text = "However, the alloy is an alloying element; thus the alloy fails.";
    assert_eq!(count_whole_word(text, "alloy"), 2);
    assert_eq!(count_whole_word(text, "HOWEVER"), 1);
    assert_eq!(count_whole_word("as a result\nof heating", "as a result"), 1);
}

#[test]
fn test_containsTerm_shouldFollowScriptRules() {
    assert!(contains_term("纳米材料的结构", "纳米材料", ScriptKind::Logographic));
    assert!(contains_term("Nanomaterials are small.", "nanomaterials", ScriptKind::SpaceDelimited));
    assert!(!contains_term("nanomaterialsX", "nanomaterials", ScriptKind::SpaceDelimited));
    assert!(!contains_term("anything", "  ", ScriptKind::SpaceDelimited));
}

#[test]
fn test_charPositions_shouldCountCharactersNotBytes() {
    assert_eq!(char_positions("材料和合金和合金", "合金", ScriptKind::Logographic), vec![3, 6]);
    assert_eq!(char_positions("an alloy", "alloy", ScriptKind::SpaceDelimited), vec![3]);
}
