use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::{Outcome, RunReport};
use crate::registry::Registry;

const BAR_WIDTH: usize = 30;

/// Where the comparison goes.
#[derive(Debug, Clone)]
pub enum Directive {
    /// Summary table and top-word bars on stdout.
    Display,
    /// Chart datasets as pretty JSON.
    Export(PathBuf),
}

/// One bubble: x = token count, y = sentiment, size = mean token length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub label: String,
    pub num_words: usize,
    pub sentiment: f64,
    pub word_length: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub label: String,
    pub words: Vec<WordCount>,
}

/// Document -> word edge, weighted by the word's count in that document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowLink {
    pub source: String,
    pub target: String,
    pub value: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub generated_at: DateTime<Utc>,
    pub scatter: Vec<ScatterPoint>,
    pub bars: Vec<BarChart>,
    pub flow: Vec<FlowLink>,
}

pub fn chart_data(registry: &Registry, top_n: usize, flow_words: usize) -> ChartData {
    ChartData {
        generated_at: Utc::now(),
        scatter: scatter(registry),
        bars: bars(registry, top_n),
        flow: flow_links(registry, flow_words),
    }
}

pub fn scatter(registry: &Registry) -> Vec<ScatterPoint> {
    registry
        .iter()
        .map(|(label, s)| ScatterPoint {
            label: label.to_string(),
            num_words: s.num_words,
            sentiment: s.sentiment,
            word_length: s.word_length,
        })
        .collect()
}

pub fn bars(registry: &Registry, top_n: usize) -> Vec<BarChart> {
    registry
        .iter()
        .map(|(label, s)| BarChart {
            label: label.to_string(),
            words: s
                .top_words(top_n)
                .into_iter()
                .map(|(word, count)| WordCount {
                    word: word.to_string(),
                    count,
                })
                .collect(),
        })
        .collect()
}

/// Candidate words are every document's top `k`. With two or more
/// documents only words used by at least two of them are linked.
pub fn flow_links(registry: &Registry, k: usize) -> Vec<FlowLink> {
    let mut seen = HashSet::new();
    let mut candidates: Vec<String> = Vec::new();
    for (_, s) in registry.iter() {
        for (word, _) in s.top_words(k) {
            if seen.insert(word.to_string()) {
                candidates.push(word.to_string());
            }
        }
    }

    if registry.len() >= 2 {
        candidates.retain(|w| {
            registry
                .iter()
                .filter(|(_, s)| s.word_count.contains_key(w))
                .count()
                >= 2
        });
    }

    let mut links = Vec::new();
    for (label, s) in registry.iter() {
        for word in &candidates {
            if let Some(&count) = s.word_count.get(word) {
                links.push(FlowLink {
                    source: label.to_string(),
                    target: word.clone(),
                    value: count,
                });
            }
        }
    }
    links
}

pub fn present(registry: &Registry, top_n: usize, flow_words: usize, directive: &Directive) -> Result<()> {
    match directive {
        Directive::Display => {
            print_table(registry);
            print_bars(registry, top_n);
            Ok(())
        }
        Directive::Export(path) => export(&chart_data(registry, top_n, flow_words), path),
    }
}

pub fn export(data: &ChartData, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json).with_context(|| format!("Failed to write charts to {:?}", path))?;
    Ok(())
}

/// Per-document result lines, in configured order.
pub fn print_outcomes(report: &RunReport) {
    for d in &report.outcomes {
        match &d.outcome {
            Outcome::Saved => println!("  ok      {} -> {}", d.label, d.filename),
            Outcome::Unsaved(e) => println!("  unsaved {} ({})", d.label, e),
            Outcome::Failed(e) => println!("  failed  {} ({})", d.label, e),
        }
    }
    println!(
        "\n{} saved, {} unsaved, {} failed.",
        report.saved(),
        report.unsaved(),
        report.failed()
    );
}

pub fn print_table(registry: &Registry) {
    if registry.is_empty() {
        println!("No documents to compare.");
        return;
    }

    println!(
        "\n{:>3} | {:<28} | {:>7} | {:>8} | {:>9} | {:<16}",
        "#", "Document", "Words", "Avg len", "Sentiment", "Top word"
    );
    println!("{}", "-".repeat(88));

    for (i, (label, s)) in registry.iter().enumerate() {
        let top = s
            .top_words(1)
            .first()
            .map(|(w, c)| format!("{} ({})", w, c))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:>3} | {:<28} | {:>7} | {:>8.2} | {:>9.3} | {:<16}",
            i + 1,
            truncate(label, 28),
            s.num_words,
            s.word_length,
            s.sentiment,
            truncate(&top, 16)
        );
    }
}

pub fn print_bars(registry: &Registry, top_n: usize) {
    for chart in bars(registry, top_n) {
        println!("\n--- {} ---", chart.label);
        let max = chart.words.first().map(|w| w.count).unwrap_or(0);
        for w in &chart.words {
            println!("  {:<16} {:>5} {}", truncate(&w.word, 16), w.count, bar(w.count, max));
        }
    }
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    "#".repeat((count * BAR_WIDTH).div_ceil(max))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──
