use scraper::{ElementRef, Html, Selector};

use crate::error::IngestError;

fn selector(css: &str) -> Result<Selector, IngestError> {
    Selector::parse(css).map_err(|e| IngestError::Parse(format!("selector {:?}: {}", css, e)))
}

/// Text of every `<p>` in the document, in document order, joined by spaces.
pub fn paragraphs(payload: &[u8]) -> Result<String, IngestError> {
    let doc = parse(payload);
    let p = selector("p")?;
    Ok(join_paragraphs(doc.root_element(), &p))
}

/// Like [`paragraphs`], but only inside the first element matching
/// `container`. A page without that element is read as a whole.
pub fn scoped_paragraphs(payload: &[u8], container: &str) -> Result<String, IngestError> {
    let scope = selector(container)?;
    let p = selector("p")?;
    let doc = parse(payload);

    let root = match doc.select(&scope).next() {
        Some(el) => el,
        None => {
            tracing::debug!("No {} container, reading whole page", container);
            doc.root_element()
        }
    };
    Ok(join_paragraphs(root, &p))
}

fn parse(payload: &[u8]) -> Html {
    Html::parse_document(&String::from_utf8_lossy(payload))
}

fn join_paragraphs(root: ElementRef, p: &Selector) -> String {
    root.select(p)
        .map(|el| el.text().collect::<String>())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ──
