//! Diagnostics reported while resolving messages.

use tracing::warn;

/// Receives non-fatal diagnostics from the repository.
pub trait DiagnosticSink: Send + Sync {
    /// Called when neither the requested language nor the default language
    /// has a document. Resolution continues with the not-found strategy.
    fn missing_default_document(&self, default_language: &str, filename: &str);
}

/// Reports diagnostics through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn missing_default_document(&self, default_language: &str, filename: &str) {
        warn!(
            default_language,
            filename, "There's no document for the default language"
        );
    }
}

/// Discards all diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn missing_default_document(&self, _default_language: &str, _filename: &str) {}
}
