/*!
 * Tokenizer adapter.
 *
 * Every scorer goes through this module so that token and sentence counts are
 * comparable between source, candidate and references. Logographic languages
 * are segmented with jieba; space-delimited languages use a word/punctuation
 * regex.
 */

use jieba_rs::Jieba;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::language_utils::{ScriptKind, script_kind};

static JIEBA: Lazy<Jieba> = Lazy::new(Jieba::new);

/// Words keep internal hyphens and apostrophes; any other symbol is its own token
static WORD_OR_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\w+(?:[-'’]\w+)*|[^\w\s]").expect("valid tokenizer regex"));

/// Sentence terminators that need trailing whitespace to count
const SOFT_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Full-width terminators that always end a sentence
///
/// Semicolons join clauses in both scripts and never end a sentence.
const HARD_TERMINATORS: [char; 3] = ['。', '！', '？'];

/// Split text into tokens according to the language's script
pub fn tokenize<'a>(text: &'a str, language: &str) -> Vec<&'a str> {
    tokenize_script(text, script_kind(language))
}

/// Split text into tokens for an already classified script
pub fn tokenize_script(text: &str, script: ScriptKind) -> Vec<&str> {
    match script {
        ScriptKind::Logographic => JIEBA
            .cut(text, true)
            .into_iter()
            .filter(|token| !token.trim().is_empty())
            .collect(),
        ScriptKind::SpaceDelimited => WORD_OR_PUNCT.find_iter(text).map(|m| m.as_str()).collect(),
    }
}

/// Whether a token carries a word rather than only punctuation
pub fn is_word(token: &str) -> bool {
    token.chars().any(char::is_alphanumeric)
}

/// Word tokens only
pub fn words<'a>(text: &'a str, language: &str) -> Vec<&'a str> {
    tokenize(text, language).into_iter().filter(|t| is_word(t)).collect()
}

/// Number of word tokens, punctuation excluded
pub fn word_count(text: &str, language: &str) -> usize {
    words(text, language).len()
}

/// Split text into trimmed, non-empty sentences
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let boundary = if HARD_TERMINATORS.contains(&ch) {
            true
        } else if SOFT_TERMINATORS.contains(&ch) {
            chars.peek().is_none_or(|(_, next)| next.is_whitespace())
        } else {
            false
        };

        if boundary {
            let end = idx + ch.len_utf8();
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    let trimmed = piece.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed);
    }
}

/// Contiguous runs of noun-tagged tokens, joined, at least two characters long
pub fn noun_phrases(text: &str) -> Vec<String> {
    let mut phrases = Vec::new();
    let mut current = String::new();

    for tag in JIEBA.tag(text, true) {
        if is_noun_tag(tag.tag) {
            current.push_str(tag.word);
        } else {
            flush_phrase(&mut phrases, &mut current);
        }
    }
    flush_phrase(&mut phrases, &mut current);

    phrases
}

fn is_noun_tag(tag: &str) -> bool {
    tag.starts_with('n') || tag == "vn"
}

fn flush_phrase(phrases: &mut Vec<String>, current: &mut String) {
    if current.chars().count() >= 2 {
        phrases.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

/// Case-insensitive pattern for a word or phrase; inner whitespace matches any run of whitespace
fn phrase_regex(term: &str) -> Option<Regex> {
    let pattern = term
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    if pattern.is_empty() {
        return None;
    }
    RegexBuilder::new(&pattern).case_insensitive(true).build().ok()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Byte offsets of case-insensitive whole-word occurrences of `term` in `text`
pub fn whole_word_positions(text: &str, term: &str) -> Vec<usize> {
    let Some(re) = phrase_regex(term) else {
        return Vec::new();
    };

    let mut positions = Vec::new();
    let mut from = 0;
    while from <= text.len() {
        let Some(m) = re.find_at(text, from) else {
            break;
        };
        let before_ok = text[..m.start()].chars().next_back().is_none_or(|c| !is_word_char(c));
        let after_ok = text[m.end()..].chars().next().is_none_or(|c| !is_word_char(c));

        if before_ok && after_ok && !m.as_str().is_empty() {
            positions.push(m.start());
            from = m.end();
        } else {
            // retry one character further on
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
    }
    positions
}

/// Number of case-insensitive whole-word occurrences
pub fn count_whole_word(text: &str, term: &str) -> usize {
    whole_word_positions(text, term).len()
}

/// Whether `term` occurs in `text`: substring for logographic scripts, whole word otherwise
pub fn contains_term(text: &str, term: &str, script: ScriptKind) -> bool {
    let term = term.trim();
    if term.is_empty() {
        return false;
    }
    match script {
        ScriptKind::Logographic => text.contains(term),
        ScriptKind::SpaceDelimited => !whole_word_positions(text, term).is_empty(),
    }
}

/// Character offset of every occurrence of `term`, using the script's matching rule
pub fn char_positions(text: &str, term: &str, script: ScriptKind) -> Vec<usize> {
    let byte_offsets: Vec<usize> = match script {
        ScriptKind::Logographic if !term.is_empty() => {
            text.match_indices(term).map(|(idx, _)| idx).collect()
        }
        ScriptKind::Logographic => Vec::new(),
        ScriptKind::SpaceDelimited => whole_word_positions(text, term),
    };
    byte_offsets
        .into_iter()
        .map(|byte| text[..byte].chars().count())
        .collect()
}
