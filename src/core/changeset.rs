// src/core/changeset.rs
use indexmap::IndexMap;

/// Staged field updates handed over by the host during an update callback.
///
/// Insertion-ordered; a `None` value stages a NULL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    values: IndexMap<String, Option<String>>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// `None` when the field is not staged at all
    pub fn get(&self, field: &str) -> Option<&Option<String>> {
        self.values.get(field)
    }

    /// Stage a value, returning the one it displaced
    pub fn set(&mut self, field: impl Into<String>, value: Option<String>) -> Option<Option<String>> {
        self.values.insert(field.into(), value)
    }

    /// Overwrite an already staged value; unstaged fields are left alone.
    /// Returns whether the field was staged.
    pub fn replace(&mut self, field: &str, value: Option<String>) -> bool {
        match self.values.get_mut(field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Changeset {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
