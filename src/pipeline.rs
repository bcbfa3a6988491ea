use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::error::IngestError;
use crate::extract;
use crate::fetch::Fetch;
use crate::normalize::Normalizer;
use crate::registry::Registry;
use crate::settings::DocumentDescriptor;
use crate::stats::{SentimentModel, StatsBundle, StatsEngine, Vader};
use crate::store::Store;

#[derive(Debug)]
pub enum Outcome {
    /// Statistics registered and text written.
    Saved,
    /// Statistics registered, but the text could not be written.
    Unsaved(IngestError),
    /// Nothing registered.
    Failed(IngestError),
}

#[derive(Debug)]
pub struct DocumentOutcome {
    pub label: String,
    pub filename: String,
    pub outcome: Outcome,
}

/// Everything a run produced: the registry plus one outcome per document,
/// in configured order.
#[derive(Debug)]
pub struct RunReport {
    pub registry: Registry,
    pub outcomes: Vec<DocumentOutcome>,
}

impl RunReport {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Saved))
    }

    pub fn unsaved(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unsaved(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|d| f(&d.outcome)).count()
    }
}

/// fetch -> extract -> normalize -> stats -> register -> store, one
/// document at a time.
pub struct Pipeline<F: Fetch, S: Store, M: SentimentModel = Vader> {
    fetcher: F,
    store: S,
    normalizer: Normalizer,
    engine: StatsEngine<M>,
}

impl<F: Fetch, S: Store, M: SentimentModel> Pipeline<F, S, M> {
    pub fn new(fetcher: F, store: S, normalizer: Normalizer, engine: StatsEngine<M>) -> Self {
        Pipeline {
            fetcher,
            store,
            normalizer,
            engine,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn run(&self, documents: &[DocumentDescriptor]) -> RunReport {
        let pb = ProgressBar::new(documents.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );

        let mut registry = Registry::new();
        let mut outcomes = Vec::with_capacity(documents.len());

        for doc in documents {
            pb.set_message(doc.label().to_string());
            let outcome = self.process(doc, &mut registry);
            match &outcome {
                Outcome::Saved => info!("Saved {} as {}", doc.label(), doc.filename),
                Outcome::Unsaved(e) => warn!("Registered {} but not saved: {}", doc.label(), e),
                Outcome::Failed(e) => warn!("Failed {} at {}: {}", doc.label(), e.stage(), e),
            }
            outcomes.push(DocumentOutcome {
                label: doc.label().to_string(),
                filename: doc.filename.clone(),
                outcome,
            });
            pb.inc(1);
        }

        pb.finish_and_clear();
        let report = RunReport { registry, outcomes };
        info!(
            "Processed {} documents ({} saved, {} unsaved, {} failed)",
            documents.len(),
            report.saved(),
            report.unsaved(),
            report.failed()
        );
        report
    }

    /// Statistics are registered before the text is stored, so a storage
    /// failure still leaves them available for presentation.
    fn process(&self, doc: &DocumentDescriptor, registry: &mut Registry) -> Outcome {
        let (text, stats) = match self.analyze(doc) {
            Ok(v) => v,
            Err(e) => return Outcome::Failed(e),
        };
        registry.put(doc.label(), stats);

        match self.store.store(&doc.filename, &text) {
            Ok(()) => Outcome::Saved,
            Err(e) => Outcome::Unsaved(e),
        }
    }

    fn analyze(&self, doc: &DocumentDescriptor) -> Result<(String, StatsBundle), IngestError> {
        let payload = self.fetcher.fetch(&doc.url)?;
        let extracted = extract::extract(&doc.extractor(), &payload)?;
        let text = self.normalizer.normalize(&extracted);
        let stats = self.engine.compute(&text);
        Ok((text, stats))
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::*;
    use crate::extract::ExtractorKind;
    use crate::normalize::StopWords;
    use crate::store::DirStore;

    /// Serves canned pages; every other URL is a 404.
    #[derive(Default)]
    struct FakeWeb {
        pages: HashMap<String, Vec<u8>>,
        requested: RefCell<Vec<String>>,
    }

    impl FakeWeb {
        fn with(mut self, url: &str, body: &[u8]) -> Self {
            self.pages.insert(url.to_string(), body.to_vec());
            self
        }
    }

    impl Fetch for FakeWeb {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, IngestError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| IngestError::Fetch {
                url: url.to_string(),
                reason: "HTTP status client error (404 Not Found)".to_string(),
            })
        }
    }

    #[derive(Default)]
    struct MemStore {
        files: RefCell<HashMap<String, String>>,
    }

    impl Store for MemStore {
        fn store(&self, name: &str, content: &str) -> Result<(), IngestError> {
            self.files
                .borrow_mut()
                .insert(name.to_string(), content.to_string());
            Ok(())
        }

        fn load(&self, name: &str) -> Result<String, IngestError> {
            self.files.borrow().get(name).cloned().ok_or_else(|| IngestError::Storage {
                name: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    struct BrokenStore;

    impl Store for BrokenStore {
        fn store(&self, name: &str, _content: &str) -> Result<(), IngestError> {
            Err(IngestError::Storage {
                name: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        }

        fn load(&self, name: &str) -> Result<String, IngestError> {
            Err(IngestError::Storage {
                name: name.to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        }
    }

    struct Neutral;

    impl SentimentModel for Neutral {
        fn polarity(&self, _text: &str) -> f64 {
            0.0
        }
    }

    fn pipeline<S: Store>(web: FakeWeb, store: S) -> Pipeline<FakeWeb, S, Neutral> {
        let stop_words: StopWords = ["the", "over"].into_iter().collect();
        Pipeline::new(
            web,
            store,
            Normalizer::new(stop_words),
            StatsEngine::with_model(Neutral),
        )
    }

    const HELLO: &[u8] = b"<div class=\"content\"><p>Hello World.</p><p>Bye!</p></div>";

    #[test]
    fn single_document_end_to_end() {
        let web = FakeWeb::default().with("https://a.example/hello", HELLO);
        let p = pipeline(web, MemStore::default());
        let docs = [DocumentDescriptor::new("https://a.example/hello", "hello.txt").with_label("Hello")];

        let report = p.run(&docs);
        assert_eq!(report.saved(), 1);
        let stats = report.registry.get("Hello").unwrap();
        assert_eq!(stats.num_words, 3);
        assert_eq!(stats.word_count["bye"], 1);
        assert_eq!(p.store().load("hello.txt").unwrap(), "hello world bye");
    }

    #[test]
    fn failed_fetch_does_not_stop_the_run() {
        let web = FakeWeb::default().with("https://a.example/ok", HELLO);
        let p = pipeline(web, MemStore::default());
        let docs = [
            DocumentDescriptor::new("https://a.example/missing", "missing.txt").with_label("Missing"),
            DocumentDescriptor::new("https://a.example/ok", "ok.txt").with_label("Ok"),
        ];

        let report = p.run(&docs);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.saved(), 1);
        assert!(report.registry.get("Missing").is_none());
        assert!(report.registry.get("Ok").is_some());
        assert!(matches!(
            report.outcomes[0].outcome,
            Outcome::Failed(IngestError::Fetch { .. })
        ));
        assert!(p.store().load("missing.txt").is_err());
        assert_eq!(p.fetcher.requested.borrow().len(), 2);
    }

    #[test]
    fn later_duplicate_label_wins() {
        let web = FakeWeb::default()
            .with("https://a.example/1", b"<p>one two three</p>")
            .with("https://a.example/2", b"<p>four five</p>");
        let p = pipeline(web, MemStore::default());
        let docs = [
            DocumentDescriptor::new("https://a.example/1", "first.txt").with_label("Same"),
            DocumentDescriptor::new("https://a.example/2", "second.txt").with_label("Same"),
        ];

        let report = p.run(&docs);
        assert_eq!(report.registry.len(), 1);
        let stats = report.registry.get("Same").unwrap();
        assert_eq!(stats.num_words, 2);
        assert!(stats.word_count.contains_key("four"));
    }

    #[test]
    fn statistics_survive_storage_failure() {
        let web = FakeWeb::default().with("https://a.example/hello", HELLO);
        let p = pipeline(web, BrokenStore);
        let docs = [DocumentDescriptor::new("https://a.example/hello", "hello.txt")];

        let report = p.run(&docs);
        assert_eq!(report.unsaved(), 1);
        assert_eq!(report.saved(), 0);
        assert_eq!(report.registry.get("hello.txt").unwrap().num_words, 3);
    }

    #[test]
    fn corrupt_pdf_is_reported_and_skipped() {
        let web = FakeWeb::default()
            .with("https://a.example/s.pdf", b"<html>moved</html>")
            .with("https://a.example/hello", HELLO);
        let p = pipeline(web, MemStore::default());
        let docs = [
            DocumentDescriptor::new("https://a.example/s.pdf", "s.txt").as_pdf(),
            DocumentDescriptor::new("https://a.example/hello", "hello.txt"),
        ];

        let report = p.run(&docs);
        assert!(matches!(
            report.outcomes[0].outcome,
            Outcome::Failed(IngestError::CorruptDocument(_))
        ));
        assert_eq!(report.registry.len(), 1);
    }

    #[test]
    fn pdf_document_is_stored_and_registered() {
        let payload = std::fs::read("tests/fixtures/two_pages.pdf").unwrap();
        let web = FakeWeb::default().with("https://sona.example/speech.pdf", &payload);
        let p = pipeline(web, MemStore::default());
        let docs = [DocumentDescriptor::new("https://sona.example/speech.pdf", "sona.txt")
            .with_label("SONA")
            .as_pdf()];

        let report = p.run(&docs);
        assert_eq!(report.saved(), 1);
        let text = p.store().load("sona.txt").unwrap();
        assert!(text.starts_with("hello lords"));
        assert!(text.ends_with("page"));
        assert!(text.find("lords").unwrap() < text.find("second").unwrap());

        let stats = report.registry.get("SONA").unwrap();
        assert_eq!(stats.num_words, text.split(' ').count());
        assert_eq!(stats.word_count["hello"], 1);
    }

    #[test]
    fn scoped_strategy_reads_container() {
        let page = std::fs::read("tests/fixtures/uk_speech.html").unwrap();
        let web = FakeWeb::default().with("https://gov.example/kings-speech", &page);
        let p = pipeline(web, MemStore::default());
        let docs = [DocumentDescriptor::new("https://gov.example/kings-speech", "uk.txt")
            .with_strategy(ExtractorKind::Scoped {
                selector: "div.govspeak".to_string(),
            })];

        let report = p.run(&docs);
        let text = p.store().load("uk.txt").unwrap();
        assert!(text.starts_with("my lords and members of house of commons"));
        assert!(!text.contains("cookies"));
        assert!(!text.contains("applause"));
        assert_eq!(report.registry.get("uk.txt").unwrap().num_words, text.split(' ').count());
    }

    #[test]
    fn stored_text_reads_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let page = std::fs::read("tests/fixtures/plain_speech.html").unwrap();
        let web = FakeWeb::default().with("https://nation.example/address", &page);
        let p = pipeline(web, DirStore::new(dir.path()));
        let docs = [DocumentDescriptor::new("https://nation.example/address", "address.txt")];

        let report = p.run(&docs);
        assert_eq!(report.saved(), 1);
        let stored = std::fs::read(dir.path().join("address.txt")).unwrap();
        let expected = "good evening fellow citizens tonight i want to speak plainly about \
                        cost of living and what we will do about it thank you and good night";
        assert_eq!(String::from_utf8(stored).unwrap(), expected);
    }
}
