//! Parsed message documents addressed by dotted paths.
//!
//! A [`Document`] owns a tree of [`Node`]s produced by a
//! [`DocumentLoader`](crate::DocumentLoader). Lookups go through a flat
//! `path -> route` index that is built the first time a path is requested.
//!
//! ```text
//! greeting: Hi            ->  "greeting"
//! menu:
//!   title: Main menu      ->  "menu", "menu.title"
//!   lines: [a, b]         ->  "menu.lines"
//! ```

use std::fmt;

use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Separator between the segments of a message path.
pub const PATH_SEPARATOR: char = '.';

/// Separator used when coercing between a list of lines and a single string.
pub const LINE_SEPARATOR: &str = "\n";

/// A node of a parsed document.
///
/// Mappings keep their entries in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<Node>),
    Map(Vec<(String, Node)>),
}

impl Node {
    /// Build a mapping node from `(key, node)` pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Node)>) -> Self {
        Node::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Build a list of text nodes.
    pub fn lines<S: Into<String>>(lines: impl IntoIterator<Item = S>) -> Self {
        Node::List(lines.into_iter().map(|l| Node::Text(l.into())).collect())
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }
}

impl fmt::Display for Node {
    /// Scalars print their plain value; lists and mappings print as compact JSON.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Null => f.write_str("null"),
            Node::Bool(b) => write!(f, "{}", b),
            Node::Integer(i) => write!(f, "{}", i),
            // keep a fractional part so 1.0 does not print as an integer
            Node::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Node::Float(x) => write!(f, "{}", x),
            Node::Text(s) => f.write_str(s),
            Node::List(_) | Node::Map(_) => match serde_json::to_string(self) {
                Ok(json) => f.write_str(&json),
                Err(_) => write!(f, "{:?}", self),
            },
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Integer(i) => serializer.serialize_i64(*i),
            Node::Float(x) => serializer.serialize_f64(*x),
            Node::Text(s) => serializer.serialize_str(s),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// The value found at a message path, before coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeValue {
    /// Any non-list node, stringified.
    Scalar(String),
    /// A list node, each element stringified.
    List(Vec<String>),
}

impl NodeValue {
    fn from_node(node: &Node) -> Self {
        match node {
            Node::List(items) => NodeValue::List(items.iter().map(Node::to_string).collect()),
            other => NodeValue::Scalar(other.to_string()),
        }
    }

    /// Coerce to a single string, joining list elements with a newline.
    pub fn into_string(self) -> String {
        match self {
            NodeValue::Scalar(s) => s,
            NodeValue::List(lines) => lines.join(LINE_SEPARATOR),
        }
    }

    /// Coerce to a list, splitting a scalar on newlines.
    pub fn into_list(self) -> Vec<String> {
        match self {
            NodeValue::Scalar(s) => split_lines(&s),
            NodeValue::List(lines) => lines,
        }
    }
}

/// Split `text` on newlines, dropping trailing empty segments.
///
/// An empty input yields a single empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let mut lines: Vec<String> = text.split(LINE_SEPARATOR).map(str::to_string).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

/// Positions of the map entries to follow from the root to reach a node.
type Route = Vec<usize>;

/// An immutable message document loaded from a single file.
#[derive(Debug)]
pub struct Document {
    filename: String,
    root: Node,
    index: OnceCell<FxHashMap<String, Route>>,
}

impl Document {
    pub fn new(filename: impl Into<String>, root: Node) -> Self {
        Document {
            filename: filename.into(),
            root,
            index: OnceCell::new(),
        }
    }

    /// An empty document, as produced by an empty file.
    pub fn empty(filename: impl Into<String>) -> Self {
        Self::new(filename, Node::Map(Vec::new()))
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Get the raw node stored at `path`.
    ///
    /// Nested keys and literal dotted keys resolve the same way: both
    /// `{a: {b: x}}` and `{"a.b": x}` answer `a.b`. When a document holds
    /// both, the entry that comes first wins.
    pub fn get(&self, path: &str) -> Option<&Node> {
        let route = self.index().get(path)?;
        let mut node = &self.root;
        for &position in route {
            match node {
                Node::Map(entries) => node = &entries.get(position)?.1,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Get the value at `path`, distinguishing lists from scalars.
    ///
    /// An explicit null counts as absent, so an empty entry falls back like
    /// a missing one.
    pub fn value(&self, path: &str) -> Option<NodeValue> {
        match self.get(path)? {
            Node::Null => None,
            node => Some(NodeValue::from_node(node)),
        }
    }

    /// Get the value at `path` as a single string.
    pub fn get_string(&self, path: &str) -> Option<String> {
        self.value(path).map(NodeValue::into_string)
    }

    /// Get the value at `path` as a list of lines.
    pub fn get_string_list(&self, path: &str) -> Option<Vec<String>> {
        self.value(path).map(NodeValue::into_list)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.index().contains_key(path)
    }

    /// All addressable paths, sorted.
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.index().keys().map(String::as_str).collect();
        paths.sort_unstable();
        paths
    }

    fn index(&self) -> &FxHashMap<String, Route> {
        self.index.get_or_init(|| {
            let mut index = FxHashMap::default();
            let mut route = Vec::new();
            build_index(&self.root, "", &mut route, &mut index);
            index
        })
    }
}

fn build_index(
    node: &Node,
    prefix: &str,
    route: &mut Route,
    index: &mut FxHashMap<String, Route>,
) {
    let Node::Map(entries) = node else {
        return;
    };
    for (position, (key, child)) in entries.iter().enumerate() {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}{}{}", prefix, PATH_SEPARATOR, key)
        };
        route.push(position);
        index.entry(path.clone()).or_insert_with(|| route.clone());
        build_index(child, &path, route, index);
        route.pop();
    }
}
