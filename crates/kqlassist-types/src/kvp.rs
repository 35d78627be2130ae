//! Ordered key/value mapping built from `key=value` input lines.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How keys are compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyCase {
    /// Keys are matched exactly as typed.
    #[default]
    Sensitive,
    /// Keys are lower-cased on insert, and lookups fold case the same way.
    Lowercase,
}

impl KeyCase {
    pub fn normalize<'a>(&self, key: &'a str) -> Cow<'a, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(key),
            Self::Lowercase => Cow::Owned(key.to_lowercase()),
        }
    }
}

/// Key to value mapping with insertion order preserved.
///
/// Inserting an existing key replaces its value in place, so the entry keeps
/// the position of its first occurrence while the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KvpMap {
    entries: Vec<(String, String)>,
    #[serde(skip)]
    key_case: KeyCase,
}

impl KvpMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_case(key_case: KeyCase) -> Self {
        Self {
            entries: Vec::new(),
            key_case,
        }
    }

    pub fn key_case(&self) -> KeyCase {
        self.key_case
    }

    /// Insert or replace. Returns the previous value for the key, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let key = match self.key_case.normalize(&key) {
            Cow::Borrowed(_) => key,
            Cow::Owned(folded) => folded,
        };
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = self.key_case.normalize(key);
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key.as_ref())
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Serialize back to `key=value` lines in insertion order.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KvpMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = KvpMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
