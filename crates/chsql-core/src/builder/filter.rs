//! Insertion-ordered filter parameters.

use crate::value::{ToValue, Value};

/// Filter parameters for a WHERE clause.
///
/// Keys are `field` or `field__mnemonic`. Entries keep insertion order, which
/// is the order of the rendered conjunction, so identical inputs always give
/// identical statements.
///
/// # Example
///
/// ```rust
/// use chsql_core::FilterParams;
///
/// let params = FilterParams::new()
///     .filter("status", "active")
///     .filter("age__gte", 18);
///
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterParams {
    entries: Vec<(String, Value)>,
}

impl FilterParams {
    /// Creates empty filter parameters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds a filter entry.
    #[must_use]
    pub fn filter<V: ToValue>(mut self, key: impl Into<String>, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts an entry, returning the previous value for the key.
    ///
    /// An existing key keeps its position and only its value is replaced.
    pub fn insert<V: ToValue>(&mut self, key: impl Into<String>, value: V) -> Option<Value> {
        let key = key.into();
        let value = value.to_value();
        if let Some((_, slot)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(slot, value));
        }
        self.entries.push((key, value));
        None
    }

    /// Returns the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: ToValue> FromIterator<(K, V)> for FilterParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>, V: ToValue> Extend<(K, V)> for FilterParams {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
