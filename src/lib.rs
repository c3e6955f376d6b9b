//! Localized message lookup backed by lazily loaded, per-language documents.
//!
//! Each language has one document, found by substituting the language tag
//! into a filename template (`lang_%lang%.yml` -> `lang_es.yml`). Documents
//! are loaded on first use and cached for the lifetime of the repository.
//!
//! A lookup for `(language, path)` tries the language's document, then the
//! default language's document, and finally asks the configured
//! [`NotFoundStrategy`] for a value. A missing translation is never an error.
//!
//! # Example
//!
//! ```ignore
//! use banana_messages::{MessageRepository, Placeholder};
//!
//! let repository = MessageRepository::builder()
//!     .directory("lang")
//!     .default_language("en")
//!     .strategy(Placeholder::brackets())
//!     .build()?;
//!
//! let greeting = repository.get_message(Some("es"), "greeting")?;
//! let lines = repository.get_messages(Some("es"), "help.lines")?;
//! ```

pub mod builder;
pub mod config;
pub mod diagnostic;
pub mod document;
pub mod error;
pub mod loader;
pub mod pool;
pub mod repository;
pub mod source;
pub mod strategy;


pub use builder::MessageRepositoryBuilder;
pub use config::Config;
pub use diagnostic::{DiagnosticSink, SilentSink, TracingSink};
pub use document::{Document, Node, NodeValue};
pub use error::{MessageError, Result};
pub use loader::{DocumentLoader, ExtensionLoader, JsonLoader, PropertiesLoader, YamlLoader};
pub use pool::DocumentPool;
pub use repository::{LANGUAGE_PLACEHOLDER, MessageRepository, StringList};
pub use source::{DirectorySource, DocumentSource, MemorySource};
pub use strategy::{Constant, NotFoundStrategy, Placeholder, ReturnPath};
