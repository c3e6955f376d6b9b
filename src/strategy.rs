//! Policies for messages that exist in no document.

/// Produces the final value when a message is missing from both the
/// requested language and the default language.
///
/// A strategy cannot fail; whatever it returns is handed to the caller
/// untouched. Plain closures work too:
///
/// ```ignore
/// let strategy = |language: Option<&str>, path: &str| format!("{}:{}", language.unwrap_or("-"), path);
/// ```
pub trait NotFoundStrategy: Send + Sync {
    fn not_found_message(&self, language: Option<&str>, path: &str) -> String;
}

impl<F> NotFoundStrategy for F
where
    F: Fn(Option<&str>, &str) -> String + Send + Sync,
{
    fn not_found_message(&self, language: Option<&str>, path: &str) -> String {
        self(language, path)
    }
}

/// Returns the message path itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReturnPath;

impl NotFoundStrategy for ReturnPath {
    fn not_found_message(&self, _language: Option<&str>, path: &str) -> String {
        path.to_string()
    }
}

/// Wraps the path in a prefix and suffix, e.g. `?greeting?` or `[greeting]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub prefix: String,
    pub suffix: String,
}

impl Placeholder {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Placeholder {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// `[path]`
    pub fn brackets() -> Self {
        Self::new("[", "]")
    }
}

impl NotFoundStrategy for Placeholder {
    fn not_found_message(&self, _language: Option<&str>, path: &str) -> String {
        format!("{}{}{}", self.prefix, path, self.suffix)
    }
}

/// Always returns the same text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant(pub String);

impl NotFoundStrategy for Constant {
    fn not_found_message(&self, _language: Option<&str>, _path: &str) -> String {
        self.0.clone()
    }
}
