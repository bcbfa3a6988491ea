use thiserror::Error;

/// Per-document failures. None of these abort a run.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("could not parse markup: {0}")]
    Parse(String),

    #[error("corrupt document: {0}")]
    CorruptDocument(String),

    #[error("storage failed for {name}: {source}")]
    Storage {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl IngestError {
    /// Short stage name used in log lines and the run summary.
    pub fn stage(&self) -> &'static str {
        match self {
            IngestError::Fetch { .. } => "fetch",
            IngestError::Parse(_) => "parse",
            IngestError::CorruptDocument(_) => "pdf",
            IngestError::Storage { .. } => "storage",
        }
    }
}
