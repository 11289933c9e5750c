//! Generic metadata record tree.
//!
//! A record is what an XML response reduces to: scalars, ordered mappings
//! keyed by tag or attribute name, and lists for tags that repeat under one
//! parent. A few well-known keys are coerced to typed scalars (see
//! [`crate::xml`]).

use chrono::NaiveDate;

/// Key under which an element's own text is stored once it has attributes
/// or children.
pub const TEXT_KEY: &str = "_text";

/// One node of a metadata record.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Plain string scalar.
    Text(String),
    /// Integer scalar (coerced `id` / `PlatformId`).
    Integer(i64),
    /// Calendar date scalar (coerced `ReleaseDate`).
    Date(NaiveDate),
    /// Ordered mapping of tag/attribute name to child.
    Map(Mapping),
    /// Children sharing one tag, in document order.
    List(Vec<Node>),
}

impl Node {
    /// Child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Walk a `/`-separated key path through nested mappings.
    pub fn at(&self, path: &str) -> Option<&Node> {
        path.split('/').try_fold(self, |node, key| node.get(key))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Node::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Node::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// View the node as a sequence: a list yields its items, anything else
    /// yields itself once. Smooths over the one-vs-many shape of repeated tags.
    pub fn items(&self) -> &[Node] {
        match self {
            Node::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Text stored under [`TEXT_KEY`], or the scalar itself for a bare text node.
    pub fn text_content(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            Node::Map(map) => map.get(TEXT_KEY).and_then(Node::as_text),
            _ => None,
        }
    }
}

/// Insertion-ordered string-keyed mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Add a child under `key`.
    ///
    /// The first occurrence is stored as-is. A second occurrence promotes
    /// the stored value to a [`Node::List`] holding both, and later ones are
    /// appended to that list, so document order is preserved.
    pub fn push_child(&mut self, key: String, node: Node) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, Node::List(items))) => items.push(node),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, Node::List(Vec::with_capacity(2)));
                if let Node::List(items) = existing {
                    items.push(first);
                    items.push(node);
                }
            },
            None => self.entries.push((key, node)),
        }
    }

    /// Set `key` to `node`, replacing any previous value in place.
    pub fn set(&mut self, key: &str, node: Node) {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = node,
            None => self.entries.push((key.to_string(), node)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
