//! Runtime values produced by action expressions.
//!
//! Node values borrow from the input buffer for the duration of one match;
//! nothing is copied until a value is printed.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use std::ptr;

use serde::ser::{Error as _, Serialize, Serializer};
use tra_syntax::CapturedNode;

/// A value bound to a variable or produced by an expression.
#[derive(Debug, Clone)]
pub enum Value<'t> {
    /// An integer literal.
    Int(i64),
    /// A string, already unescaped.
    String(String),
    /// A captured syntax node.
    Node(CapturedNode<'t>),
    /// A dict built by a `{...}` literal.
    Dict(DictValue<'t>),
}

impl Value<'_> {
    /// Returns a short name for the variant, used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::String(_) => "string",
            Self::Node(_) => "node",
            Self::Dict(_) => "dict",
        }
    }

    /// Returns the text this value contributes as a JSON object key, or
    /// `None` for values that cannot be keys.
    #[must_use]
    pub fn key_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Int(int) => Some(Cow::Owned(int.to_string())),
            Self::String(string) => Some(Cow::Borrowed(string)),
            Self::Node(node) => Some(node.text()),
            Self::Dict(_) => None,
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left == right,
            (Self::String(left), Self::String(right)) => left == right,
            (Self::Node(left), Self::Node(right)) => same_node(left, right),
            (Self::Dict(left), Self::Dict(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Value<'_> {}

impl Hash for Value<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Int(int) => int.hash(state),
            Self::String(string) => string.hash(state),
            Self::Node(node) => {
                node.source().as_ptr().hash(state);
                node.byte_range().hash(state);
            }
            // Entry order is irrelevant to equality, so only the size is hashed.
            Self::Dict(dict) => dict.len().hash(state),
        }
    }
}

impl Serialize for Value<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(int) => serializer.serialize_i64(*int),
            Self::String(string) => serializer.serialize_str(string),
            Self::Node(node) => serializer.serialize_str(&node.text()),
            Self::Dict(dict) => dict.serialize(serializer),
        }
    }
}

/// Two nodes are the same value when they span the same bytes of the same
/// buffer.
fn same_node(left: &CapturedNode<'_>, right: &CapturedNode<'_>) -> bool {
    ptr::eq(left.source(), right.source()) && left.byte_range() == right.byte_range()
}

/// Key/value pairs in insertion order. Inserting an existing key replaces
/// its value in place.
#[derive(Debug, Clone, Default)]
pub struct DictValue<'t> {
    entries: Vec<(Value<'t>, Value<'t>)>,
}

impl<'t> DictValue<'t> {
    /// Creates an empty dict.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Sets `key` to `value`, returning the value it replaces.
    pub fn insert(&mut self, key: Value<'t>, value: Value<'t>) -> Option<Value<'t>> {
        if let Some((_, slot)) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Returns the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &Value<'t>) -> Option<&Value<'t>> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the dict has no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (Value<'t>, Value<'t>)> {
        self.entries.iter()
    }
}

impl<'a, 't> IntoIterator for &'a DictValue<'t> {
    type Item = &'a (Value<'t>, Value<'t>);
    type IntoIter = std::slice::Iter<'a, (Value<'t>, Value<'t>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for DictValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(key, value)| other.get(key).is_some_and(|found| found == value))
    }
}

impl Eq for DictValue<'_> {}

impl Serialize for DictValue<'_> {
    /// Serialises as a JSON object with sorted keys. Keys are stringified:
    /// strings as themselves, integers in decimal and nodes as their text.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut sorted = BTreeMap::new();
        for (key, value) in self {
            let text = key.key_text().ok_or_else(|| {
                S::Error::custom(format!("unsupported dict key of type {}", key.type_name()))
            })?;
            sorted.insert(text, value);
        }
        serializer.collect_map(sorted)
    }
}
