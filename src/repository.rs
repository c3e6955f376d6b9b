//! Message lookup with default-language fallback.
//!
//! Resolution order for `(language, path)`:
//!
//! 1. the document of `language` (or of the default language when `language`
//!    is `None` or has no document)
//! 2. the document of the default language
//! 3. the [`NotFoundStrategy`]

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::builder::MessageRepositoryBuilder;
use crate::diagnostic::DiagnosticSink;
use crate::document::Document;
use crate::error::{MessageError, Result};
use crate::pool::DocumentPool;
use crate::strategy::NotFoundStrategy;

/// Token replaced by the language tag in the filename template.
pub const LANGUAGE_PLACEHOLDER: &str = "%lang%";

/// Lines of a multi-line message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StringList(Vec<String>);

impl StringList {
    pub fn new(lines: Vec<String>) -> Self {
        StringList(lines)
    }

    /// A list holding a single line.
    pub fn singleton(line: String) -> Self {
        StringList(vec![line])
    }

    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl Deref for StringList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for StringList {
    fn from(lines: Vec<String>) -> Self {
        StringList(lines)
    }
}

impl IntoIterator for StringList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Resolves messages from per-language documents.
///
/// Documents are loaded through a shared [`DocumentPool`] the first time a
/// language is requested. The repository is `Send + Sync`; share it behind
/// an `Arc` to serve concurrent lookups.
pub struct MessageRepository {
    pool: DocumentPool,
    strategy: Box<dyn NotFoundStrategy>,
    diagnostics: Box<dyn DiagnosticSink>,
    file_format: String,
    default_language: String,
    default_language_filename: String,
}

impl MessageRepository {
    pub fn builder() -> MessageRepositoryBuilder {
        MessageRepositoryBuilder::new()
    }

    pub(crate) fn from_parts(
        pool: DocumentPool,
        strategy: Box<dyn NotFoundStrategy>,
        diagnostics: Box<dyn DiagnosticSink>,
        file_format: String,
        default_language: String,
    ) -> Self {
        let default_language_filename = format_filename(&file_format, &default_language);
        MessageRepository {
            pool,
            strategy,
            diagnostics,
            file_format,
            default_language,
            default_language_filename,
        }
    }

    /// Get a single message.
    ///
    /// List values are joined with `\n`. When neither `language` nor the
    /// default language has `path`, the not-found strategy's result is
    /// returned.
    ///
    /// # Errors
    /// * [`MessageError::InvalidArgument`] if `path` is empty
    /// * [`MessageError::Parse`] if a document on the lookup chain is malformed
    ///
    /// # Example
    /// ```ignore
    /// let greeting = repository.get_message(Some("es"), "greeting")?;
    /// ```
    pub fn get_message(&self, language: Option<&str>, path: &str) -> Result<String> {
        let message = self.resolve(language, path, Document::get_string)?;
        Ok(message.unwrap_or_else(|| self.strategy.not_found_message(language, path)))
    }

    /// Get a message as a list of lines.
    ///
    /// Scalar values are split on `\n`. A missing message yields a list
    /// with the not-found strategy's result as its only element.
    pub fn get_messages(&self, language: Option<&str>, path: &str) -> Result<StringList> {
        let messages = self.resolve(language, path, Document::get_string_list)?;
        Ok(match messages {
            Some(lines) => StringList::new(lines),
            None => StringList::singleton(self.strategy.not_found_message(language, path)),
        })
    }

    /// Get the document used for `language`.
    ///
    /// Falls back to the default-language document when `language` is `None`
    /// or has no document. Returns `None`, after reporting a diagnostic,
    /// when the default-language document is missing as well.
    pub fn in_language(&self, language: Option<&str>) -> Result<Option<Arc<Document>>> {
        if let Some(language) = language {
            if let Some(document) = self.pool.find(&self.filename_for(language))? {
                return Ok(Some(document));
            }
        }

        let document = self.pool.find(&self.default_language_filename)?;
        if document.is_none() {
            self.diagnostics
                .missing_default_document(&self.default_language, &self.default_language_filename);
        }
        Ok(document)
    }

    fn resolve<T>(
        &self,
        language: Option<&str>,
        path: &str,
        extract: impl Fn(&Document, &str) -> Option<T>,
    ) -> Result<Option<T>> {
        if path.is_empty() {
            return Err(MessageError::InvalidArgument("path"));
        }

        let Some(document) = self.in_language(language)? else {
            return Ok(None);
        };
        if let Some(value) = extract(&*document, path) {
            return Ok(Some(value));
        }

        // Always looked up again by filename, even when `document` already
        // is the default-language one.
        let Some(fallback) = self.pool.find(&self.default_language_filename)? else {
            return Ok(None);
        };
        let value = extract(&*fallback, path);
        if value.is_some() {
            debug!(
                path,
                requested = language.unwrap_or(self.default_language.as_str()),
                fallback = %self.default_language,
                "Using message from default language"
            );
        }
        Ok(value)
    }

    /// Filename of the document holding `language`.
    pub fn filename_for(&self, language: &str) -> String {
        format_filename(&self.file_format, language)
    }

    pub fn strategy(&self) -> &dyn NotFoundStrategy {
        self.strategy.as_ref()
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn file_format(&self) -> &str {
        &self.file_format
    }

    pub fn pool(&self) -> &DocumentPool {
        &self.pool
    }
}

impl fmt::Debug for MessageRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRepository")
            .field("file_format", &self.file_format)
            .field("default_language", &self.default_language)
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

fn format_filename(file_format: &str, language: &str) -> String {
    file_format.replace(LANGUAGE_PLACEHOLDER, language)
}
