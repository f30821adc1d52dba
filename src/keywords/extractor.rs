use super::tokenizer::tokenize;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

pub const DEFAULT_MAX_KEYWORDS: usize = 10;
pub const MIN_KEYWORD_LEN: usize = 3;

/// English function words plus generic academic-writing vocabulary.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "up", "about", "into", "through", "during", "is", "are", "was", "were", "be", "been",
    "being", "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may",
    "might", "can", "this", "that", "these", "those", "we", "our", "use", "using", "based",
    "approach", "method", "paper", "propose", "proposed", "show",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    pub max_keywords: usize,
    pub stopwords: HashSet<String>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            max_keywords: DEFAULT_MAX_KEYWORDS,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl KeywordConfig {
    pub fn with_max_keywords(mut self, max_keywords: usize) -> Self {
        self.max_keywords = max_keywords;
        self
    }

    /// Adds stopwords from a file with one word per line. Blank lines and lines starting
    /// with `#` are ignored.
    pub fn extend_stopwords_from_file(&mut self, path: &Path) -> std::io::Result<usize> {
        let contents = std::fs::read_to_string(path)?;
        let before = self.stopwords.len();
        self.stopwords.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_lowercase),
        );
        Ok(self.stopwords.len() - before)
    }
}

/// Derives the top-K keywords of a text.
#[derive(Debug, Clone, Default)]
pub struct KeywordExtractor {
    config: KeywordConfig,
}

impl KeywordExtractor {
    pub fn new(config: KeywordConfig) -> Self {
        Self { config }
    }

    /// Returns up to `max_keywords` distinct tokens ordered by descending frequency.
    /// Equal counts keep the order in which the tokens first appeared.
    pub fn extract(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() || self.config.max_keywords == 0 {
            return Vec::new();
        }

        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();

        for token in tokenize(text) {
            if token.len() < MIN_KEYWORD_LEN || self.config.stopwords.contains(&token) {
                continue;
            }
            match positions.get(&token) {
                Some(&idx) => counts[idx].1 += 1,
                None => {
                    positions.insert(token.clone(), counts.len());
                    counts.push((token, 1));
                }
            }
        }

        // Stable sort: ties stay in first-seen order.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(self.config.max_keywords)
            .map(|(token, _)| token)
            .collect()
    }
}
