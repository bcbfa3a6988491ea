use std::fs;
use std::path::{Path, PathBuf};

use crate::error::IngestError;

/// Named text storage for normalized transcripts.
pub trait Store {
    fn store(&self, name: &str, content: &str) -> Result<(), IngestError>;
    #[cfg(test)]
    fn load(&self, name: &str) -> Result<String, IngestError>;
}

/// One UTF-8 file per name under a fixed directory. Writes overwrite.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl Store for DirStore {
    fn store(&self, name: &str, content: &str) -> Result<(), IngestError> {
        let err = |source| IngestError::Storage {
            name: name.to_string(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(err)?;
        fs::write(self.path(name), content).map_err(err)
    }

    #[cfg(test)]
    fn load(&self, name: &str) -> Result<String, IngestError> {
        fs::read_to_string(self.path(name)).map_err(|source| IngestError::Storage {
            name: name.to_string(),
            source,
        })
    }
}

// ── Tests ──
