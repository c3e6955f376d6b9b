//! Loaders turning raw JSON, YAML and `.properties` bytes into documents.

use std::path::Path;

use rustc_hash::FxHashMap;

use crate::document::{Document, Node};
use crate::error::{MessageError, Result};

/// Parses raw document bytes into a [`Document`].
///
/// Malformed content must be reported as [`MessageError::Parse`]. It is
/// never turned into an absent document, since it means the translations
/// on disk are broken.
pub trait DocumentLoader: Send + Sync {
    /// Parse `bytes`, read from `filename`, into a document.
    fn load(&self, filename: &str, bytes: &[u8]) -> Result<Document>;
}

/// Loads JSON documents. The root must be an object.
///
/// ```json
/// {
///     "greeting": "Hello",
///     "menu": { "title": "Main menu", "lines": ["a", "b"] }
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl DocumentLoader for JsonLoader {
    fn load(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        let json: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| MessageError::parse(filename, e))?;
        if !json.is_object() {
            return Err(MessageError::parse(filename, "root must be an object"));
        }
        Ok(Document::new(filename, Node::from(json)))
    }
}

/// Loads YAML documents. The root must be a mapping; an empty file is an
/// empty document.
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlLoader;

impl DocumentLoader for YamlLoader {
    fn load(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Document::empty(filename));
        }
        let yaml: serde_yaml::Value =
            serde_yaml::from_slice(bytes).map_err(|e| MessageError::parse(filename, e))?;
        match Node::from(yaml) {
            Node::Null => Ok(Document::empty(filename)),
            root @ Node::Map(_) => Ok(Document::new(filename, root)),
            _ => Err(MessageError::parse(filename, "root must be a mapping")),
        }
    }
}

/// Loads Java-style `.properties` documents.
///
/// Keys are kept flat, so `menu.title=Main menu` answers the path
/// `menu.title`. Supports `#`/`!` comments, `=`, `:` and whitespace
/// separators, `\` line continuations and `\t \n \r \f \uXXXX` escapes.
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesLoader;

impl DocumentLoader for PropertiesLoader {
    fn load(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        let text = std::str::from_utf8(bytes).map_err(|e| MessageError::parse(filename, e))?;
        let mut entries: Vec<(String, Node)> = Vec::new();
        let mut positions: FxHashMap<String, usize> = FxHashMap::default();

        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }
            let mut logical = trimmed.to_string();
            while has_continuation(&logical) {
                logical.pop();
                match lines.next() {
                    Some(next) => logical.push_str(next.trim_start()),
                    None => break,
                }
            }

            let (key, value) = split_entry(&logical);
            let key = unescape(key).map_err(|e| MessageError::parse(filename, e))?;
            let value = unescape(value).map_err(|e| MessageError::parse(filename, e))?;
            // later duplicates override earlier ones
            match positions.get(&key) {
                Some(&position) => entries[position].1 = Node::Text(value),
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, Node::Text(value)));
                }
            }
        }

        Ok(Document::new(filename, Node::Map(entries)))
    }
}

fn has_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

const PROPERTY_WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let mut rest = line[key_end..].trim_start_matches(&PROPERTY_WHITESPACE[..]);
    if let Some(stripped) = rest.strip_prefix(|c: char| c == '=' || c == ':') {
        rest = stripped.trim_start_matches(&PROPERTY_WHITESPACE[..]);
    }
    (&line[..key_end], rest)
}

fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let high = read_code_unit(&mut chars)?;
                let code = if (0xD800..=0xDBFF).contains(&high) {
                    if chars.next() != Some('\\') || chars.next() != Some('u') {
                        return Err(format!("unpaired surrogate \\u{:04X}", high));
                    }
                    let low = read_code_unit(&mut chars)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(format!("unpaired surrogate \\u{:04X}", high));
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                let decoded = char::from_u32(code)
                    .ok_or_else(|| format!("invalid unicode escape \\u{:04X}", code))?;
                out.push(decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

fn read_code_unit(chars: &mut std::str::Chars<'_>) -> std::result::Result<u32, String> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.chars().count() != 4 {
        return Err(format!("truncated unicode escape \\u{}", hex));
    }
    u32::from_str_radix(&hex, 16).map_err(|_| format!("malformed unicode escape \\u{}", hex))
}

/// Picks a loader from the filename extension.
///
/// | Extension          | Loader               |
/// |--------------------|----------------------|
/// | `json`             | [`JsonLoader`]       |
/// | `yml`, `yaml`      | [`YamlLoader`]       |
/// | `properties`       | [`PropertiesLoader`] |
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionLoader;

impl DocumentLoader for ExtensionLoader {
    fn load(&self, filename: &str, bytes: &[u8]) -> Result<Document> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "json" => JsonLoader.load(filename, bytes),
            "yml" | "yaml" => YamlLoader.load(filename, bytes),
            "properties" => PropertiesLoader.load(filename, bytes),
            _ => Err(MessageError::UnsupportedFormat(filename.to_string())),
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Integer(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Node::Text(s),
            Value::Array(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Object(map) => Node::Map(map.into_iter().map(|(k, v)| (k, Node::from(v))).collect()),
        }
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Integer(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Node::Text(s),
            Value::Sequence(items) => Node::List(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Map(
                map.into_iter()
                    .map(|(k, v)| (yaml_key(k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => Node::from(other).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_loader() {
        let doc = JsonLoader
            .load(
                "lang_en.json",
                br#"{"greeting": "Hello", "menu": {"lines": ["a", "b"], "count": 2}}"#,
            )
            .unwrap();
        assert_eq!(doc.get_string("greeting").as_deref(), Some("Hello"));
        assert_eq!(doc.get_string("menu.lines").as_deref(), Some("a\nb"));
        assert_eq!(doc.get("menu.count"), Some(&Node::Integer(2)));
    }

    #[test]
    fn test_json_loader_keeps_document_order() {
        let doc = JsonLoader
            .load("lang_en.json", br#"{"z": "1", "a": "2", "m": "3"}"#)
            .unwrap();
        let Node::Map(entries) = doc.root() else {
            panic!("root should be a map");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_json_loader_rejects_non_object_root() {
        let err = JsonLoader.load("lang_en.json", b"[1, 2]").unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }

    #[test]
    fn test_json_loader_malformed() {
        let err = JsonLoader.load("lang_en.json", b"{\"greeting\":").unwrap_err();
        match err {
            MessageError::Parse { filename, .. } => assert_eq!(filename, "lang_en.json"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_yaml_loader() {
        let yaml = "greeting: Hi\nmenu:\n  title: Main menu\n  lines:\n    - a\n    - b\n1: one\n";
        let doc = YamlLoader.load("lang_en.yml", yaml.as_bytes()).unwrap();
        assert_eq!(doc.get_string("greeting").as_deref(), Some("Hi"));
        assert_eq!(doc.get_string("menu.title").as_deref(), Some("Main menu"));
        assert_eq!(
            doc.get_string_list("menu.lines"),
            Some(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(doc.get_string("1").as_deref(), Some("one"));
    }

    #[test]
    fn test_yaml_loader_empty_file() {
        let doc = YamlLoader.load("lang_en.yml", b"").unwrap();
        assert!(doc.paths().is_empty());
    }

    #[test]
    fn test_yaml_loader_malformed() {
        let err = YamlLoader
            .load("lang_en.yml", b"greeting: [unclosed")
            .unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }

    #[test]
    fn test_yaml_loader_rejects_scalar_root() {
        let err = YamlLoader.load("lang_en.yml", b"just text").unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }

    #[test]
    fn test_properties_loader() {
        let text = "# comment\n\
                    ! another comment\n\
                    greeting = Hello\n\
                    menu.title: Main menu\n\
                    farewell Goodbye\n\
                    \n\
                    multi = first\\nsecond\n\
                    long = one \\\n    two\n\
                    unicode = caf\\u00e9\n\
                    key\\=with\\:seps = ok\n";
        let doc = PropertiesLoader
            .load("lang_en.properties", text.as_bytes())
            .unwrap();
        assert_eq!(doc.get_string("greeting").as_deref(), Some("Hello"));
        assert_eq!(doc.get_string("menu.title").as_deref(), Some("Main menu"));
        assert_eq!(doc.get_string("farewell").as_deref(), Some("Goodbye"));
        assert_eq!(
            doc.get_string_list("multi"),
            Some(vec!["first".to_string(), "second".to_string()])
        );
        assert_eq!(doc.get_string("long").as_deref(), Some("one two"));
        assert_eq!(doc.get_string("unicode").as_deref(), Some("café"));
        assert_eq!(doc.get_string("key=with:seps").as_deref(), Some("ok"));
    }

    #[test]
    fn test_properties_loader_duplicate_key_overrides() {
        let doc = PropertiesLoader
            .load("x.properties", b"a=1\na=2\n")
            .unwrap();
        assert_eq!(doc.get_string("a").as_deref(), Some("2"));
        assert_eq!(doc.paths(), vec!["a"]);
    }

    #[test]
    fn test_properties_loader_override_keeps_first_position() {
        let doc = PropertiesLoader
            .load("x.properties", b"a=1
b=2
a=3
")
            .unwrap();
        assert_eq!(
            doc.root(),
            &Node::map([("a", Node::text("3")), ("b", Node::text("2"))])
        );
    }

    #[test]
    fn test_properties_loader_surrogate_pair() {
        let doc = PropertiesLoader
            .load("x.properties", b"smile=\\uD83D\\uDE00")
            .unwrap();
        assert_eq!(doc.get_string("smile").as_deref(), Some("😀"));
    }

    #[test]
    fn test_properties_loader_bad_escape() {
        let err = PropertiesLoader
            .load("x.properties", b"a=\\u12")
            .unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }

    #[test]
    fn test_properties_loader_invalid_utf8() {
        let err = PropertiesLoader
            .load("x.properties", &[b'a', b'=', 0xff])
            .unwrap_err();
        assert!(matches!(err, MessageError::Parse { .. }));
    }

    #[test]
    fn test_extension_loader_dispatch() {
        let loader = ExtensionLoader;
        assert!(loader.load("lang_en.json", b"{\"a\": \"b\"}").is_ok());
        assert!(loader.load("lang_en.YML", b"a: b").is_ok());
        assert!(loader.load("lang_en.yaml", b"a: b").is_ok());
        assert!(loader.load("lang_en.properties", b"a=b").is_ok());
        assert_eq!(
            loader.load("lang_en.toml", b"a = 'b'").unwrap_err(),
            MessageError::UnsupportedFormat("lang_en.toml".to_string())
        );
    }
}
