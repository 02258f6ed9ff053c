//! Ordered, field-keyed collection of rendered error messages.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Field → messages multi-map that preserves insertion order.
///
/// Fields iterate in the order their first message was added; messages within
/// a field keep the order they were added in. Duplicates are kept.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorBag {
    entries: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message to `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.entry(field.into()).or_default().push(message.into());
    }

    /// All messages recorded for `field`; empty when there are none.
    pub fn get(&self, field: &str) -> &[String] {
        self.entries.get(field).map_or(&[][..], Vec::as_slice)
    }

    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        !self.get(field).is_empty()
    }

    pub fn any(&self) -> bool {
        self.entries.values().any(|messages| !messages.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    /// Total number of messages across all fields.
    pub fn count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Every message, field order first and then message order.
    pub fn all(&self) -> Vec<&str> {
        self.entries
            .values()
            .flat_map(|messages| messages.iter().map(String::as_str))
            .collect()
    }

    /// Fields that have at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(field, _)| field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Field → messages as a JSON object, in field order.
    pub fn to_map(&self) -> serde_json::Map<String, Value> {
        self.iter()
            .map(|(field, messages)| {
                let list = messages.iter().cloned().map(Value::String).collect();
                (field.to_string(), Value::Array(list))
            })
            .collect()
    }

    /// Re-adds every message of `other`; nothing is deduplicated.
    pub fn merge(&mut self, other: impl Into<ErrorBag>) {
        for (field, messages) in other.into().entries {
            self.entries.entry(field).or_default().extend(messages);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for ErrorBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Vec<V>)>>(iter: I) -> Self {
        let mut bag = ErrorBag::new();
        for (field, messages) in iter {
            let field = field.into();
            for message in messages {
                bag.add(field.clone(), message);
            }
        }
        bag
    }
}

impl From<HashMap<String, Vec<String>>> for ErrorBag {
    fn from(map: HashMap<String, Vec<String>>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Vec<(String, Vec<String>)>> for ErrorBag {
    fn from(entries: Vec<(String, Vec<String>)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<&ErrorBag> for ErrorBag {
    fn from(bag: &ErrorBag) -> Self {
        bag.clone()
    }
}

/// Accepts a raw JSON report where each field maps to a message or a list of messages.
impl From<&serde_json::Map<String, Value>> for ErrorBag {
    fn from(map: &serde_json::Map<String, Value>) -> Self {
        let mut bag = ErrorBag::new();
        for (field, messages) in map {
            match messages {
                Value::Array(items) => {
                    for item in items {
                        bag.add(field.clone(), message_text(item));
                    }
                }
                other => bag.add(field.clone(), message_text(other)),
            }
        }
        bag
    }
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, messages) in self.iter() {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}
