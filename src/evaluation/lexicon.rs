/*!
 * Tunable word lists used by the structural and discourse heuristics.
 *
 * The lists are hand-curated for zh -> en materials-science text. They are
 * loaded from the `evaluation.lexicon` section of the configuration file and
 * fall back to the built-in lists for any field that is omitted.
 */

use serde::{Deserialize, Serialize};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

/// Connective words grouped by the logical relation they signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectiveLexicon {
    /// Cause and effect (because, therefore, ...)
    #[serde(default = "default_causal")]
    pub causal: Vec<String>,

    /// Contrast and concession (however, although, ...)
    #[serde(default = "default_contrastive")]
    pub contrastive: Vec<String>,

    /// Addition (furthermore, moreover, ...)
    #[serde(default = "default_additive")]
    pub additive: Vec<String>,

    /// Ordering of steps (first, then, finally, ...)
    #[serde(default = "default_sequential")]
    pub sequential: Vec<String>,

    /// Summary and conclusion (in conclusion, overall, ...)
    #[serde(default = "default_concluding")]
    pub concluding: Vec<String>,
}

impl Default for ConnectiveLexicon {
    fn default() -> Self {
        Self {
            causal: default_causal(),
            contrastive: default_contrastive(),
            additive: default_additive(),
            sequential: default_sequential(),
            concluding: default_concluding(),
        }
    }
}

impl ConnectiveLexicon {
    /// Category name and word list, in reporting order
    pub fn categories(&self) -> [(&'static str, &[String]); 5] {
        [
            ("causal", self.causal.as_slice()),
            ("contrastive", self.contrastive.as_slice()),
            ("additive", self.additive.as_slice()),
            ("sequential", self.sequential.as_slice()),
            ("concluding", self.concluding.as_slice()),
        ]
    }
}

fn default_causal() -> Vec<String> {
    words(&[
        "because",
        "since",
        "therefore",
        "thus",
        "consequently",
        "as a result",
        "hence",
        "so",
        "accordingly",
        "due to",
        "owing to",
        "for this reason",
    ])
}

fn default_contrastive() -> Vec<String> {
    words(&[
        "however",
        "nevertheless",
        "yet",
        "although",
        "though",
        "but",
        "despite",
        "in contrast",
        "on the other hand",
        "conversely",
        "whereas",
        "while",
        "on the contrary",
        "nonetheless",
    ])
}

fn default_additive() -> Vec<String> {
    words(&[
        "furthermore",
        "moreover",
        "in addition",
        "additionally",
        "besides",
        "also",
        "what's more",
        "as well as",
        "similarly",
    ])
}

fn default_sequential() -> Vec<String> {
    words(&[
        "first",
        "firstly",
        "second",
        "secondly",
        "third",
        "thirdly",
        "then",
        "next",
        "finally",
        "lastly",
        "subsequently",
        "afterward",
        "previously",
    ])
}

fn default_concluding() -> Vec<String> {
    words(&[
        "in conclusion",
        "to conclude",
        "in summary",
        "to summarize",
        "overall",
        "ultimately",
        "in brief",
        "in short",
        "to sum up",
    ])
}

/// All word lists consulted by the heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Source-side markers of an agentive (active voice) sentence
    #[serde(default = "default_agentive_indicators")]
    pub agentive_indicators: Vec<String>,

    /// Connectives by category
    #[serde(default)]
    pub connectives: ConnectiveLexicon,

    /// Function words ignored by the repetition check
    #[serde(default = "default_stop_words")]
    pub stop_words: Vec<String>,

    /// Pronouns checked for a nearby antecedent
    #[serde(default = "default_pronouns")]
    pub pronouns: Vec<String>,

    /// Articles taken as evidence of a preceding noun phrase
    #[serde(default = "default_articles")]
    pub articles: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            agentive_indicators: default_agentive_indicators(),
            connectives: ConnectiveLexicon::default(),
            stop_words: default_stop_words(),
            pronouns: default_pronouns(),
            articles: default_articles(),
        }
    }
}

impl Lexicon {
    /// Whether a lowercase word is a stop word
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.iter().any(|w| w == word)
    }
}

fn default_agentive_indicators() -> Vec<String> {
    words(&[
        "我们", "作者", "研究者", "科学家", "本文", "本研究", "实验", "分析", "测试", "发现",
    ])
}

fn default_stop_words() -> Vec<String> {
    words(&[
        "the", "a", "an", "and", "in", "on", "at", "to", "for", "with", "by", "of", "is", "are",
        "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "can",
        "could", "will", "would", "should", "may", "might", "must", "that", "this", "these",
        "those", "it", "they", "them", "their", "there", "here", "where", "when", "how", "why",
        "what", "who", "whom", "which",
    ])
}

fn default_pronouns() -> Vec<String> {
    words(&["he", "she", "it", "they", "his", "her", "its", "their", "him", "them"])
}

fn default_articles() -> Vec<String> {
    words(&["the", "a", "an"])
}
