use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

/// Scores text polarity in [-1, 1].
pub trait SentimentModel {
    fn polarity(&self, text: &str) -> f64;
}

static ANALYZER: LazyLock<SentimentIntensityAnalyzer<'static>> =
    LazyLock::new(SentimentIntensityAnalyzer::new);

/// VADER compound score.
pub struct Vader;

impl SentimentModel for Vader {
    fn polarity(&self, text: &str) -> f64 {
        ANALYZER
            .polarity_scores(text)
            .get("compound")
            .copied()
            .unwrap_or(0.0)
    }
}

/// Statistics computed for one normalized document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsBundle {
    pub word_count: HashMap<String, usize>,
    pub num_words: usize,
    pub word_length: f64,
    pub sentiment: f64,
}

impl StatsBundle {
    /// Most frequent words, count descending then word ascending.
    pub fn top_words(&self, n: usize) -> Vec<(&str, usize)> {
        let mut words: Vec<(&str, usize)> = self
            .word_count
            .iter()
            .map(|(w, c)| (w.as_str(), *c))
            .collect();
        words.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        words.truncate(n);
        words
    }
}

pub struct StatsEngine<M: SentimentModel = Vader> {
    model: M,
}

impl StatsEngine<Vader> {
    pub fn new() -> Self {
        StatsEngine { model: Vader }
    }
}

impl Default for StatsEngine<Vader> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: SentimentModel> StatsEngine<M> {
    #[cfg(test)]
    pub fn with_model(model: M) -> Self {
        StatsEngine { model }
    }

    /// Expects text that has already been normalized; sentiment is scored
    /// on exactly what is passed in.
    pub fn compute(&self, text: &str) -> StatsBundle {
        StatsBundle {
            word_count: count_words(text),
            num_words: total_words(text),
            word_length: mean_word_length(text),
            sentiment: self.sentiment(text),
        }
    }

    pub fn sentiment(&self, text: &str) -> f64 {
        if text.trim().is_empty() {
            return 0.0;
        }
        let score = self.model.polarity(text);
        if score.is_nan() {
            0.0
        } else {
            score.clamp(-1.0, 1.0)
        }
    }
}

pub fn count_words(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

pub fn total_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Mean length in characters; 0 for empty text.
pub fn mean_word_length(text: &str) -> f64 {
    let (chars, words) = text
        .split_whitespace()
        .fold((0usize, 0usize), |(c, n), w| (c + w.chars().count(), n + 1));
    if words == 0 {
        0.0
    } else {
        chars as f64 / words as f64
    }
}

// ── Tests ──
