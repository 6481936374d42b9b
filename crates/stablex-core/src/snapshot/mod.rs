//! Snapshots of captured workflow variables.
//!
//! A [`Snapshot`] maps variable names to typed [`Value`]s. It is produced once
//! per run (fresh) or loaded from an archive (baseline) and is never mutated
//! afterwards: there is no insertion API, only construction from entries.

pub mod flatten;
pub mod float_repr;
pub mod kind;
pub mod value;

pub use flatten::{flatten, Leaf};
pub use kind::{element_kind, ElementKind};
pub use value::{ArrayData, Column, NdArray, Scalar, Table, Value};

use crate::errors::StablexError;
use serde::{Deserialize, Serialize};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Named collection of captured values, ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Value>,
}

impl Snapshot {
    pub fn new(entries: BTreeMap<String, Value>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn key_set(&self) -> BTreeSet<&str> {
        self.keys().collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, Value> {
        &self.entries
    }

    pub fn into_entries(self) -> BTreeMap<String, Value> {
        self.entries
    }

    /// Check shape invariants of every value.
    ///
    /// # Errors
    ///
    /// Returns the first shape violation, prefixed with its key.
    pub fn validate(&self) -> Result<(), (String, StablexError)> {
        for (key, value) in &self.entries {
            value.validate().map_err(|e| (key.clone(), e))?;
        }
        Ok(())
    }
}

impl FromIterator<(String, Value)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
