//! Document sources supply the raw bytes of a message file.
//!
//! A source answers `None` when it has nothing for a filename. That is the
//! normal outcome for a language without translations, not an error.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::warn;

/// Supplies raw document bytes by filename.
pub trait DocumentSource: Send + Sync {
    /// Fetch the bytes stored under `filename`, or `None` if there are none.
    fn fetch(&self, filename: &str) -> Option<Vec<u8>>;
}

impl<F> DocumentSource for F
where
    F: Fn(&str) -> Option<Vec<u8>> + Send + Sync,
{
    fn fetch(&self, filename: &str) -> Option<Vec<u8>> {
        self(filename)
    }
}

/// Reads documents from files under a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirectorySource { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSource for DirectorySource {
    fn fetch(&self, filename: &str) -> Option<Vec<u8>> {
        let path = self.root.join(filename);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read message file");
                None
            }
        }
    }
}

/// Serves documents from memory.
///
/// Useful for embedded translations (`include_bytes!`) and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, filename: &str, content: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(filename.to_owned(), content.into());
        self
    }

    pub fn insert(&mut self, filename: &str, content: impl Into<Vec<u8>>) -> &mut Self {
        self.documents.insert(filename.to_owned(), content.into());
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSource for MemorySource {
    fn fetch(&self, filename: &str) -> Option<Vec<u8>> {
        self.documents.get(filename).cloned()
    }
}
