pub mod html;
pub mod pdf;

use serde::Deserialize;

use crate::error::IngestError;

/// How a payload is turned into plain text. Chosen per document by
/// configuration, never by looking at the payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Every `<p>` in the document.
    Generic,
    /// Every `<p>` inside the first element matching `selector`.
    Scoped { selector: String },
    /// Text of each PDF page, in page order.
    PdfPages,
}

impl ExtractorKind {
    pub fn describe(&self) -> String {
        match self {
            ExtractorKind::Generic => "generic".to_string(),
            ExtractorKind::Scoped { selector } => format!("scoped({})", selector),
            ExtractorKind::PdfPages => "pdf".to_string(),
        }
    }
}

/// Run the extractor for `kind` over a raw payload.
pub fn extract(kind: &ExtractorKind, payload: &[u8]) -> Result<String, IngestError> {
    match kind {
        ExtractorKind::Generic => html::paragraphs(payload),
        ExtractorKind::Scoped { selector } => html::scoped_paragraphs(payload, selector),
        ExtractorKind::PdfPages => pdf::pages(payload),
    }
}

// ── Tests ──
