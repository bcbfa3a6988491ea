use std::panic;

use crate::error::IngestError;

/// Text of every page in page order, concatenated without separator.
pub fn pages(payload: &[u8]) -> Result<String, IngestError> {
    let head = &payload[..payload.len().min(1024)];
    if !head.windows(4).any(|w| w == b"%PDF") {
        return Err(IngestError::CorruptDocument("missing %PDF header".into()));
    }

    // pdf-extract panics on some malformed files instead of returning Err.
    let pages = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(payload))
        .map_err(|_| IngestError::CorruptDocument("pdf reader panicked".into()))?
        .map_err(|e| IngestError::CorruptDocument(e.to_string()))?;

    tracing::debug!("Read {} pdf pages", pages.len());
    Ok(pages.concat())
}

// ── Tests ──
