use std::collections::HashMap;

use crate::stats::StatsBundle;

/// Statistics for every document processed in the current run, keyed by
/// label. Written only by the pipeline; read once the run is complete.
#[derive(Debug, Default)]
pub struct Registry {
    index: HashMap<String, usize>,
    entries: Vec<(String, StatsBundle)>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, or replace the bundle of an existing label in place.
    pub fn put(&mut self, label: &str, bundle: StatsBundle) {
        match self.index.get(label) {
            Some(&i) => self.entries[i].1 = bundle,
            None => {
                self.index.insert(label.to_string(), self.entries.len());
                self.entries.push((label.to_string(), bundle));
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, label: &str) -> Option<&StatsBundle> {
        self.index.get(label).map(|&i| &self.entries[i].1)
    }

    /// Entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatsBundle)> {
        self.entries.iter().map(|(l, b)| (l.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ──
