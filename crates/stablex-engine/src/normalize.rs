//! Turning raw workflow bindings into a snapshot.

use crate::workflow::Bindings;
use stablex_core::{Snapshot, Value};
use std::collections::BTreeMap;

/// Separator between a mapping's name and its entry keys.
pub const KEY_SEPARATOR: &str = "_";

/// Normalize bindings into a snapshot.
///
/// - names starting with `_` are dropped (interpreter and private state)
/// - mapping values become one key per leaf entry, `parent_child`, recursively;
///   an empty mapping keeps its own key
/// - everything else is kept as is
///
/// A flattened key never replaces a binding of the same name.
pub fn normalize_bindings(bindings: Bindings) -> Snapshot {
    let mut direct = BTreeMap::new();
    let mut flattened = BTreeMap::new();

    for (name, value) in bindings {
        if name.starts_with('_') {
            continue;
        }
        match value {
            Value::Mapping(map) if !map.is_empty() => {
                flatten_mapping(&name, map, &mut flattened);
            }
            other => {
                direct.insert(name, other);
            }
        }
    }

    for (key, value) in flattened {
        if direct.contains_key(&key) {
            tracing::warn!(key = key.as_str(), "flattened mapping entry shadowed by binding");
            continue;
        }
        direct.insert(key, value);
    }

    Snapshot::new(direct)
}

fn flatten_mapping(prefix: &str, map: BTreeMap<String, Value>, out: &mut BTreeMap<String, Value>) {
    for (key, value) in map {
        let joined = format!("{}{}{}", prefix, KEY_SEPARATOR, key);
        match value {
            Value::Mapping(inner) if !inner.is_empty() => flatten_mapping(&joined, inner, out),
            other => {
                out.insert(joined, other);
            }
        }
    }
}
