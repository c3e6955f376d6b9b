//! Fluent construction of a [`MessageRepository`].

use std::path::PathBuf;

use crate::diagnostic::{DiagnosticSink, TracingSink};
use crate::error::{MessageError, Result};
use crate::loader::{DocumentLoader, ExtensionLoader};
use crate::pool::DocumentPool;
use crate::repository::{LANGUAGE_PLACEHOLDER, MessageRepository};
use crate::source::{DirectorySource, DocumentSource};
use crate::strategy::{NotFoundStrategy, ReturnPath};

/// Default filename template.
pub const DEFAULT_FILE_FORMAT: &str = "lang_%lang%.yml";

/// Default fallback language.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Builder for [`MessageRepository`].
///
/// Only the source is required:
///
/// | Setting            | Default               |
/// |--------------------|-----------------------|
/// | `file_format`      | `lang_%lang%.yml`     |
/// | `default_language` | `en`                  |
/// | `strategy`         | [`ReturnPath`]        |
/// | `loader`           | [`ExtensionLoader`]   |
/// | `diagnostics`      | [`TracingSink`]       |
///
/// # Example
///
/// ```ignore
/// let repository = MessageRepository::builder()
///     .directory("lang")
///     .file_format("messages_%lang%.properties")
///     .default_language("es")
///     .build()?;
/// ```
pub struct MessageRepositoryBuilder {
    file_format: String,
    default_language: String,
    strategy: Box<dyn NotFoundStrategy>,
    source: Option<Box<dyn DocumentSource>>,
    loader: Box<dyn DocumentLoader>,
    diagnostics: Box<dyn DiagnosticSink>,
}

impl Default for MessageRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageRepositoryBuilder {
    pub fn new() -> Self {
        MessageRepositoryBuilder {
            file_format: DEFAULT_FILE_FORMAT.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
            strategy: Box::new(ReturnPath),
            source: None,
            loader: Box::new(ExtensionLoader),
            diagnostics: Box::new(TracingSink),
        }
    }

    /// Set the filename template. It must contain `%lang%`.
    pub fn file_format(mut self, file_format: impl Into<String>) -> Self {
        self.file_format = file_format.into();
        self
    }

    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = language.into();
        self
    }

    pub fn strategy(mut self, strategy: impl NotFoundStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    pub fn source(mut self, source: impl DocumentSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Read documents from files under `root`.
    pub fn directory(self, root: impl Into<PathBuf>) -> Self {
        self.source(DirectorySource::new(root))
    }

    pub fn loader(mut self, loader: impl DocumentLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn diagnostics(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.diagnostics = Box::new(sink);
        self
    }

    /// Validate the configuration and build the repository.
    ///
    /// # Errors
    /// [`MessageError::Config`] when the template lacks `%lang%`, the default
    /// language is empty or no source was set.
    pub fn build(self) -> Result<MessageRepository> {
        if !self.file_format.contains(LANGUAGE_PLACEHOLDER) {
            return Err(MessageError::Config(format!(
                "file format '{}' must contain '{}'",
                self.file_format, LANGUAGE_PLACEHOLDER
            )));
        }
        if self.default_language.trim().is_empty() {
            return Err(MessageError::Config(
                "default language must not be empty".to_string(),
            ));
        }
        let source = self
            .source
            .ok_or_else(|| MessageError::Config("a document source is required".to_string()))?;

        Ok(MessageRepository::from_parts(
            DocumentPool::from_boxed(source, self.loader),
            self.strategy,
            self.diagnostics,
            self.file_format,
            self.default_language,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::JsonLoader;
    use crate::source::MemorySource;

    #[test]
    fn test_defaults() {
        let repository = MessageRepositoryBuilder::new()
            .source(MemorySource::new())
            .build()
            .unwrap();
        assert_eq!(repository.file_format(), DEFAULT_FILE_FORMAT);
        assert_eq!(repository.default_language(), DEFAULT_LANGUAGE);
        assert_eq!(
            repository.strategy().not_found_message(Some("en"), "missing"),
            "missing"
        );
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let err = MessageRepository::builder()
            .file_format("messages.yml")
            .source(MemorySource::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, MessageError::Config(_)));
        assert!(err.to_string().contains("%lang%"));
    }

    #[test]
    fn test_empty_default_language_is_rejected() {
        let err = MessageRepository::builder()
            .default_language("  ")
            .source(MemorySource::new())
            .build()
            .unwrap_err();
        assert!(matches!(err, MessageError::Config(_)));
    }

    #[test]
    fn test_source_is_required() {
        let err = MessageRepository::builder().build().unwrap_err();
        assert_eq!(
            err,
            MessageError::Config("a document source is required".to_string())
        );
    }

    #[test]
    fn test_custom_loader() {
        let repository = MessageRepository::builder()
            .file_format("%lang%.messages")
            .loader(JsonLoader)
            .source(MemorySource::new().with_document("en.messages", r#"{"a": "b"}"#))
            .build()
            .unwrap();
        assert_eq!(repository.get_message(None, "a").unwrap(), "b");
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lang_en.yml"), "greeting: Hi").unwrap();

        let repository = MessageRepository::builder()
            .directory(dir.path())
            .build()
            .unwrap();
        assert_eq!(repository.get_message(Some("en"), "greeting").unwrap(), "Hi");
    }
}
