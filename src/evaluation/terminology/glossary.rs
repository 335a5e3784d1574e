/*!
 * Curated glossary lookup.
 *
 * The glossary itself is owned by an external store; the engine only sees a
 * read-only snapshot through [`GlossaryProvider`]. [`InMemoryGlossary`] is the
 * snapshot used by the command line tool and the tests, loadable from JSON in
 * the simplified `{"source": "target"}` form or as a list of full entries.
 */

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::evaluation::model::{
    TermMap, TermPair, default_domain, default_source_language, default_target_language,
};
use crate::evaluation::tokenizer::contains_term;
use crate::language_utils::{canonical_code, script_kind};

/// Read-only access to curated term pairs
pub trait GlossaryProvider: Send + Sync + Debug {
    /// All term pairs for a domain and language direction
    fn lookup(&self, domain: &str, source_language: &str, target_language: &str) -> Vec<TermPair>;
}

/// One glossary entry as stored in the full JSON form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryEntry {
    /// Term in the source language
    pub source_term: String,

    /// Expected translation
    pub target_term: String,

    /// Domain the entry belongs to
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Source language code
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Optional definition of the term
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
}

/// Either accepted glossary file layout
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GlossaryFile {
    Simplified(BTreeMap<String, String>),
    Entries(Vec<PartialEntry>),
}

/// List entry before defaults are applied; invalid entries are skipped, not rejected
#[derive(Debug, Deserialize)]
struct PartialEntry {
    source_term: Option<String>,
    target_term: Option<String>,
    domain: Option<String>,
    source_language: Option<String>,
    target_language: Option<String>,
    definition: Option<String>,
}

/// Glossary snapshot held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryGlossary {
    entries: Vec<GlossaryEntry>,
}

impl InMemoryGlossary {
    /// Create a glossary from entries
    pub fn new(entries: Vec<GlossaryEntry>) -> Self {
        Self { entries }
    }

    /// Create a glossary from `(source, target)` pairs for one domain and direction
    pub fn from_pairs<S, T>(
        domain: &str,
        source_language: &str,
        target_language: &str,
        pairs: impl IntoIterator<Item = (S, T)>,
    ) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(source, target)| GlossaryEntry {
                source_term: source.into(),
                target_term: target.into(),
                domain: domain.to_string(),
                source_language: source_language.to_string(),
                target_language: target_language.to_string(),
                definition: None,
            })
            .collect();
        Self { entries }
    }

    /// Parse glossary JSON; the defaults apply to the simplified form and to list
    /// entries that omit them
    pub fn from_json_str(
        json: &str,
        domain: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Self> {
        let file: GlossaryFile =
            serde_json::from_str(json).context("Glossary JSON is neither a term map nor a list of entries")?;

        let entries: Vec<GlossaryEntry> = match file {
            GlossaryFile::Simplified(map) => map
                .into_iter()
                .filter(|(source, target)| !source.trim().is_empty() && !target.trim().is_empty())
                .map(|(source, target)| GlossaryEntry {
                    source_term: source,
                    target_term: target,
                    domain: domain.to_string(),
                    source_language: source_language.to_string(),
                    target_language: target_language.to_string(),
                    definition: None,
                })
                .collect(),
            GlossaryFile::Entries(items) => items
                .into_iter()
                .filter_map(|item| {
                    let source_term = item.source_term.filter(|s| !s.trim().is_empty());
                    let target_term = item.target_term.filter(|t| !t.trim().is_empty());
                    let (Some(source_term), Some(target_term)) = (source_term, target_term) else {
                        warn!("Skipping glossary entry without source or target term");
                        return None;
                    };
                    Some(GlossaryEntry {
                        source_term,
                        target_term,
                        domain: item.domain.unwrap_or_else(|| domain.to_string()),
                        source_language: item
                            .source_language
                            .unwrap_or_else(|| source_language.to_string()),
                        target_language: item
                            .target_language
                            .unwrap_or_else(|| target_language.to_string()),
                        definition: item.definition,
                    })
                })
                .collect(),
        };

        info!("Loaded {} glossary entries", entries.len());
        Ok(Self { entries })
    }

    /// Load a glossary file
    pub fn from_json_file<P: AsRef<Path>>(
        path: P,
        domain: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read glossary file: {}", path.display()))?;
        Self::from_json_str(&content, domain, source_language, target_language)
            .with_context(|| format!("Failed to parse glossary file: {}", path.display()))
    }

    /// All entries
    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the glossary has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl GlossaryProvider for InMemoryGlossary {
    fn lookup(&self, domain: &str, source_language: &str, target_language: &str) -> Vec<TermPair> {
        let source = canonical_code(source_language);
        let target = canonical_code(target_language);
        self.entries
            .iter()
            .filter(|entry| {
                entry.domain.eq_ignore_ascii_case(domain)
                    && canonical_code(&entry.source_language) == source
                    && canonical_code(&entry.target_language) == target
            })
            .map(|entry| TermPair::new(entry.source_term.clone(), entry.target_term.clone()))
            .collect()
    }
}

/// Keep the glossary pairs whose source term occurs in the source text
pub fn find_terms_in_source(source_text: &str, pairs: &[TermPair], source_language: &str) -> TermMap {
    let script = script_kind(source_language);
    pairs
        .iter()
        .filter(|pair| contains_term(source_text, &pair.source_term, script))
        .map(|pair| (pair.source_term.clone(), pair.target_term.clone()))
        .collect()
}
