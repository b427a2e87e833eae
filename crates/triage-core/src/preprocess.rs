//! Embedding-path preprocessing for clustering similarity.
//!
//! This is the second, independent normalization path: it feeds the
//! embedding provider, never the display layer. Compared with
//! [`crate::normalize::clean_display_text`] it is far more aggressive —
//! punctuation and stop words carry no signal for semantic similarity, and
//! stemming folds inflected forms together so "failing" and "failed" land in
//! the same cluster.

use std::collections::HashSet;
use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};

/// NLTK-style English stop-word list. Adjusted per configuration before use.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such",
    "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
    "will", "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain",
    "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn",
    "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Words dropped from the default stop-word set: negation and direction carry
/// real signal in incident text ("cannot connect to", "no response").
const DEFAULT_KEEP_WORDS: &[&str] = &["to", "not", "no"];

/// Words added to the default stop-word set: "error" appears in nearly every
/// incident and would otherwise dominate similarity.
const DEFAULT_EXTRA_STOP_WORDS: &[&str] = &["error"];

/// Configuration for the embedding preprocessing path.
///
/// Owns the stop-word set and the stemmer; construct once per pipeline and
/// pass it in wherever preprocessing happens (no process-wide singletons).
pub struct PreprocessConfig {
    stop_words: HashSet<String>,
    stemmer: Stemmer,
}

impl PreprocessConfig {
    /// English stop words with `keep` removed and `extra` added.
    pub fn new<'a>(
        keep: impl IntoIterator<Item = &'a str>,
        extra: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let mut stop_words: HashSet<String> =
            ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect();
        for word in keep {
            stop_words.remove(word);
        }
        for word in extra {
            stop_words.insert(word.to_string());
        }
        Self {
            stop_words,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Whether `word` is filtered out before embedding.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Reduce a cleaned string to the token stream fed to the embedding
    /// provider: non-word characters become spaces, single-letter tokens and
    /// stop words are dropped, everything is lowercased and stemmed.
    pub fn preprocess_for_embedding(&self, text: &str) -> String {
        let spaced: String = text
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '_' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        spaced
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .filter(|t| !(t.chars().count() == 1 && t.chars().all(|c| c.is_alphabetic())))
            .filter(|t| !self.is_stop_word(t))
            .map(|t| self.stemmer.stem(&t).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_KEEP_WORDS.iter().copied(),
            DEFAULT_EXTRA_STOP_WORDS.iter().copied(),
        )
    }
}

impl fmt::Debug for PreprocessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreprocessConfig")
            .field("stop_words", &self.stop_words.len())
            .field("stemmer", &"snowball/english")
            .finish()
    }
}

/// Convenience wrapper over [`PreprocessConfig::preprocess_for_embedding`].
pub fn preprocess_for_embedding(config: &PreprocessConfig, text: &str) -> String {
    config.preprocess_for_embedding(text)
}
