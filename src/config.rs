//! Environment-driven configuration for a directory-backed repository.

use std::path::PathBuf;

use crate::builder::{DEFAULT_FILE_FORMAT, DEFAULT_LANGUAGE, MessageRepositoryBuilder};

/// Directory holding the message files.
pub const DIR_VAR: &str = "BANANA_MESSAGES_DIR";
/// Filename template, e.g. `lang_%lang%.yml`.
pub const FORMAT_VAR: &str = "BANANA_MESSAGES_FORMAT";
/// Fallback language tag.
pub const DEFAULT_LANGUAGE_VAR: &str = "BANANA_MESSAGES_DEFAULT_LANGUAGE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub messages_dir: PathBuf,
    pub file_format: String,
    pub default_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            messages_dir: PathBuf::from("."),
            file_format: DEFAULT_FILE_FORMAT.to_string(),
            default_language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Read the configuration from `BANANA_MESSAGES_*` variables, using the
    /// defaults for unset or empty ones.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Config::default();
        Config {
            messages_dir: var(DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.messages_dir),
            file_format: var(FORMAT_VAR).unwrap_or(defaults.file_format),
            default_language: var(DEFAULT_LANGUAGE_VAR).unwrap_or(defaults.default_language),
        }
    }

    /// A repository builder reading from `messages_dir`.
    pub fn builder(&self) -> MessageRepositoryBuilder {
        MessageRepositoryBuilder::new()
            .directory(&self.messages_dir)
            .file_format(&self.file_format)
            .default_language(&self.default_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(Config::from_lookup(lookup(&[])), Config::default());
    }

    #[test]
    fn test_reads_variables() {
        let config = Config::from_lookup(lookup(&[
            (DIR_VAR, "/srv/lang"),
            (FORMAT_VAR, "messages_%lang%.properties"),
            (DEFAULT_LANGUAGE_VAR, "es"),
        ]));
        assert_eq!(config.messages_dir, PathBuf::from("/srv/lang"));
        assert_eq!(config.file_format, "messages_%lang%.properties");
        assert_eq!(config.default_language, "es");
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = Config::from_lookup(lookup(&[(DEFAULT_LANGUAGE_VAR, "")]));
        assert_eq!(config.default_language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_builder_reads_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("messages_es.json"), r#"{"greeting": "Hola"}"#).unwrap();

        let config = Config {
            messages_dir: dir.path().to_path_buf(),
            file_format: "messages_%lang%.json".to_string(),
            default_language: "es".to_string(),
        };
        let repository = config.builder().build().unwrap();
        assert_eq!(repository.get_message(Some("fr"), "greeting").unwrap(), "Hola");
    }
}
