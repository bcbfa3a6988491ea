use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

use crate::extract::ExtractorKind;

const DEFAULT_RUN: &str = include_str!("../config/speeches.toml");

/// One document to ingest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DocumentDescriptor {
    pub url: String,
    /// Storage name for the normalized text.
    pub filename: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub strategy: Option<ExtractorKind>,
    #[serde(default)]
    pub pdf: bool,
}

#[cfg(test)]
impl DocumentDescriptor {
    pub fn new(url: &str, filename: &str) -> Self {
        DocumentDescriptor {
            url: url.to_string(),
            filename: filename.to_string(),
            label: None,
            strategy: None,
            pdf: false,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn with_strategy(mut self, kind: ExtractorKind) -> Self {
        self.strategy = Some(kind);
        self
    }

    pub fn as_pdf(mut self) -> Self {
        self.pdf = true;
        self
    }
}

impl DocumentDescriptor {
    /// Registry key: the label, or the filename when there is none.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.filename)
    }

    /// The `pdf` flag wins over an explicit strategy.
    pub fn extractor(&self) -> ExtractorKind {
        if self.pdf {
            ExtractorKind::PdfPages
        } else {
            self.strategy.clone().unwrap_or(ExtractorKind::Generic)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub stopword_file: Option<PathBuf>,
    #[serde(default = "default_timeout")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_flow_words")]
    pub flow_words: usize,
    #[serde(default)]
    pub documents: Vec<DocumentDescriptor>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("speech_transcripts")
}

fn default_timeout() -> u64 {
    30
}

fn default_top_n() -> usize {
    10
}

fn default_flow_words() -> usize {
    5
}

impl Settings {
    /// Run file (user file, or the built-in speech list), then `SPEECH_*`
    /// environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder();
        let builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::from_str(DEFAULT_RUN, FileFormat::Toml)),
        };
        let settings: Settings = builder
            .add_source(Environment::with_prefix("SPEECH").try_parsing(true))
            .build()
            .context("Failed to load configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    #[cfg(test)]
    pub fn from_toml(raw: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.documents.is_empty() {
            bail!("No documents configured");
        }
        for (i, doc) in self.documents.iter().enumerate() {
            if doc.url.trim().is_empty() {
                bail!("Document {} has an empty url", i + 1);
            }
            if doc.filename.trim().is_empty() {
                bail!("Document {} ({}) has an empty filename", i + 1, doc.url);
            }
            if let Some(ExtractorKind::Scoped { selector }) = &doc.strategy {
                if selector.trim().is_empty() {
                    bail!("Document {} ({}) has an empty selector", i + 1, doc.filename);
                }
            }
        }
        if self.top_n == 0 || self.flow_words == 0 {
            bail!("top_n and flow_words must be greater than zero");
        }
        Ok(())
    }
}

// ── Tests ──
