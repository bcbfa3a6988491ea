use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

static PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[[:punct:]]").unwrap());

const ENGLISH: &str = include_str!("../resources/stopwords_english.txt");

/// Dropped whatever the stop-word configuration says.
const NOISE_TOKENS: &[&str] = &["applause", "\u{2013}", "\u{2014}"];

/// Words removed during normalization.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn english() -> Self {
        let mut sw = StopWords::default();
        sw.extend_lines(ENGLISH);
        sw
    }

    /// Add one word per line from a user file.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stop words from {:?}", path))?;
        Ok(self.extend_lines(&raw))
    }

    pub fn extend_lines(&mut self, raw: &str) -> usize {
        let before = self.words.len();
        self.words.extend(
            raw.lines()
                .map(|l| l.trim().to_lowercase())
                .filter(|l| !l.is_empty()),
        );
        self.words.len() - before
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }
}

impl<S: Into<String>> FromIterator<S> for StopWords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        StopWords {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Fixed transform sequence applied to every extracted text.
pub struct Normalizer {
    stop_words: StopWords,
}

impl Normalizer {
    pub fn new(stop_words: StopWords) -> Self {
        Normalizer { stop_words }
    }

    /// lowercase -> strip punctuation -> drop stop words and noise -> rejoin.
    pub fn normalize(&self, text: &str) -> String {
        let lowered = to_lowercase(text);
        let stripped = strip_punctuation(&lowered);
        self.remove_stop_words(&stripped)
    }

    pub fn remove_stop_words(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|w| {
                let lw = w.to_lowercase();
                !self.stop_words.contains(&lw) && !NOISE_TOKENS.contains(&lw.as_str())
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn to_lowercase(text: &str) -> String {
    text.to_lowercase()
}

/// Removes ASCII punctuation only. Hyphens go too; typographic dashes stay.
pub fn strip_punctuation(text: &str) -> String {
    PUNCT_RE.replace_all(text, "").into_owned()
}

// ── Tests ──
