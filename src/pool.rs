//! Lazily populated cache of documents keyed by filename.
//!
//! # Caching Strategy
//!
//! ```text
//! DocumentPool
//! └── RwLock<FxHashMap<filename, Slot>>
//!     └── Slot = Arc<OnceCell<Arc<Document>>>
//!         ├── empty   -> source.fetch() + loader.load() on next lookup
//!         └── filled  -> returned as-is, never reloaded
//! ```
//!
//! The map lock is only held to find or create a slot. Loading happens on the
//! slot's once-cell, so concurrent lookups of one filename load it once while
//! lookups of other filenames proceed independently.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::document::Document;
use crate::error::{MessageError, Result};
use crate::loader::DocumentLoader;
use crate::source::DocumentSource;

type Slot = Arc<OnceCell<Arc<Document>>>;

/// Why a slot could not be filled.
enum Miss {
    /// The source has nothing for the filename.
    Absent,
    Failed(MessageError),
}

/// A process-wide document cache. Grows monotonically, no eviction.
pub struct DocumentPool {
    source: Box<dyn DocumentSource>,
    loader: Box<dyn DocumentLoader>,
    slots: RwLock<FxHashMap<String, Slot>>,
}

impl DocumentPool {
    pub fn new(
        source: impl DocumentSource + 'static,
        loader: impl DocumentLoader + 'static,
    ) -> Self {
        Self::from_boxed(Box::new(source), Box::new(loader))
    }

    pub(crate) fn from_boxed(
        source: Box<dyn DocumentSource>,
        loader: Box<dyn DocumentLoader>,
    ) -> Self {
        DocumentPool {
            source,
            loader,
            slots: RwLock::new(FxHashMap::default()),
        }
    }

    /// Find the document stored under `filename`, loading it on first use.
    ///
    /// # Returns
    /// * `Ok(Some(doc))` - the cached or freshly loaded document
    /// * `Ok(None)` - the source has no such file; a later call retries
    /// * `Err(MessageError::Parse)` - the file exists but is malformed; not cached
    pub fn find(&self, filename: &str) -> Result<Option<Arc<Document>>> {
        let slot = self.slot(filename);
        if let Some(document) = slot.get() {
            trace!(filename, "Document cache hit");
            return Ok(Some(Arc::clone(document)));
        }

        match slot.get_or_try_init(|| self.materialize(filename)) {
            Ok(document) => Ok(Some(Arc::clone(document))),
            Err(Miss::Absent) => Ok(None),
            Err(Miss::Failed(e)) => Err(e),
        }
    }

    /// Whether a document for `filename` has been loaded.
    pub fn is_loaded(&self, filename: &str) -> bool {
        self.slots
            .read()
            .get(filename)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Filenames of all loaded documents, sorted.
    pub fn loaded(&self) -> Vec<String> {
        let mut filenames: Vec<String> = self
            .slots
            .read()
            .iter()
            .filter(|(_, slot)| slot.get().is_some())
            .map(|(filename, _)| filename.clone())
            .collect();
        filenames.sort_unstable();
        filenames
    }

    /// Number of loaded documents.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, filename: &str) -> Slot {
        if let Some(slot) = self.slots.read().get(filename) {
            return Arc::clone(slot);
        }
        let mut slots = self.slots.write();
        Arc::clone(slots.entry(filename.to_owned()).or_default())
    }

    fn materialize(&self, filename: &str) -> std::result::Result<Arc<Document>, Miss> {
        let Some(bytes) = self.source.fetch(filename) else {
            debug!(filename, "No document available");
            return Err(Miss::Absent);
        };
        let document = self
            .loader
            .load(filename, &bytes)
            .map_err(Miss::Failed)?;
        debug!(filename, "Loaded document");
        Ok(Arc::new(document))
    }
}

impl fmt::Debug for DocumentPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPool")
            .field("loaded", &self.loaded())
            .finish_non_exhaustive()
    }
}
