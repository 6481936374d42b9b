//! Comparison output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Collections use `BTreeSet` and sorted `Vec` for deterministic serialization.

use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Key-set difference between a fresh and a baseline snapshot.
///
/// The symmetric difference is kept as its two halves so reports can say on
/// which side each key lives.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyDiff {
    /// Keys present in the fresh snapshot but not the baseline
    pub only_in_fresh: BTreeSet<String>,
    /// Keys present in the baseline but not the fresh snapshot
    pub only_in_baseline: BTreeSet<String>,
}

impl KeyDiff {
    pub fn is_empty(&self) -> bool {
        self.only_in_fresh.is_empty() && self.only_in_baseline.is_empty()
    }

    pub fn len(&self) -> usize {
        self.only_in_fresh.len() + self.only_in_baseline.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.only_in_fresh.contains(key) || self.only_in_baseline.contains(key)
    }

    /// The symmetric difference as one set.
    pub fn symmetric(&self) -> BTreeSet<String> {
        self.only_in_fresh
            .union(&self.only_in_baseline)
            .cloned()
            .collect()
    }
}

/// How NaN is treated for one key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NanPolicy {
    /// NaN (and infinities) replaced by sentinels before comparing, so NaN
    /// equals NaN
    SentinelSubstitution,
    /// Text or object contents: plain equality, NaN never equals NaN
    Exact,
}

/// Why two values for the same key are not equivalent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MismatchDetail {
    /// The values have incompatible shapes of variant (e.g. table vs scalar)
    KindMismatch { fresh: String, baseline: String },
    /// Flattened leaf sequences or table lists differ in length
    LengthMismatch { fresh: usize, baseline: usize },
    /// First differing leaf after flattening
    LeafMismatch {
        index: usize,
        fresh: String,
        baseline: String,
    },
    /// Two scalars differ
    ScalarMismatch { fresh: String, baseline: String },
    /// Two tables are not structurally equal
    TableMismatch { reason: String },
    /// An element of a tabular list differs
    ElementMismatch {
        index: usize,
        detail: Box<MismatchDetail>,
    },
}

impl std::fmt::Display for MismatchDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchDetail::KindMismatch { fresh, baseline } => {
                write!(f, "kind differs: fresh {} vs baseline {}", fresh, baseline)
            }
            MismatchDetail::LengthMismatch { fresh, baseline } => {
                write!(f, "length differs: fresh {} vs baseline {}", fresh, baseline)
            }
            MismatchDetail::LeafMismatch {
                index,
                fresh,
                baseline,
            } => write!(
                f,
                "leaf {} differs: fresh {} vs baseline {}",
                index, fresh, baseline
            ),
            MismatchDetail::ScalarMismatch { fresh, baseline } => {
                write!(f, "value differs: fresh {} vs baseline {}", fresh, baseline)
            }
            MismatchDetail::TableMismatch { reason } => write!(f, "table differs: {}", reason),
            MismatchDetail::ElementMismatch { index, detail } => {
                write!(f, "element {}: {}", index, detail)
            }
        }
    }
}

/// A failing shared key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueMismatch {
    pub key: String,
    pub nan_policy: NanPolicy,
    pub detail: MismatchDetail,
}

/// Outcome of comparing every shared, non-excluded key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValueComparison {
    /// Keys compared, in comparison (sorted) order
    pub compared: Vec<String>,
    /// Shared keys skipped because they are excluded
    pub excluded: Vec<String>,
    /// Every key that failed, in comparison order
    pub mismatches: Vec<ValueMismatch>,
}

impl ValueComparison {
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    pub fn mismatched_keys(&self) -> Vec<String> {
        self.mismatches.iter().map(|m| m.key.clone()).collect()
    }
}

/// Full comparison between a fresh and a baseline snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComparisonReport {
    /// Schema version of this report structure (always 1)
    pub report_schema_version: u32,
    pub fresh_key_count: usize,
    pub baseline_key_count: usize,
    pub key_diff: KeyDiff,
    pub values: ValueComparison,
}

impl ComparisonReport {
    pub fn new(
        fresh: &Snapshot,
        baseline: &Snapshot,
        key_diff: KeyDiff,
        values: ValueComparison,
    ) -> Self {
        Self {
            report_schema_version: 1,
            fresh_key_count: fresh.len(),
            baseline_key_count: baseline.len(),
            key_diff,
            values,
        }
    }

    pub fn structure_passed(&self) -> bool {
        self.key_diff.is_empty()
    }

    pub fn content_passed(&self) -> bool {
        self.values.is_clean()
    }

    pub fn passed(&self) -> bool {
        self.structure_passed() && self.content_passed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_diff_symmetric_union() {
        let diff = KeyDiff {
            only_in_fresh: ["c".to_string()].into(),
            only_in_baseline: ["a".to_string()].into(),
        };
        assert_eq!(diff.len(), 2);
        assert!(diff.contains("a"));
        assert_eq!(
            diff.symmetric().into_iter().collect::<Vec<_>>(),
            vec!["a", "c"]
        );
    }

    #[test]
    fn test_element_mismatch_display_nests() {
        let detail = MismatchDetail::ElementMismatch {
            index: 2,
            detail: Box::new(MismatchDetail::TableMismatch {
                reason: "column count 2 vs 3".into(),
            }),
        };
        assert_eq!(
            detail.to_string(),
            "element 2: table differs: column count 2 vs 3"
        );
    }
}
