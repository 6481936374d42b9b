//! The value-equivalence rule.
//!
//! Decides whether the fresh and baseline values under one key are
//! equivalent, and if not, why. Dispatch order:
//!
//! 1. both tables: structural equality (NaN equal in the same position)
//! 2. key in the tabular-list group holding a list: element-by-element
//! 3. one side a table: kind mismatch
//! 4. either side a container: compare flattened leaves
//! 5. scalars: leaf equality
//!
//! NaN handling is fixed per key by [`EquivalenceRules::nan_policy`].

use crate::diff::model::{MismatchDetail, NanPolicy, ValueMismatch};
use crate::snapshot::flatten::flatten_data;
use crate::snapshot::{element_kind, flatten, ArrayData, Leaf, Table, Value};
use std::collections::BTreeSet;

/// Sentinel substituted for NaN when none is configured.
pub const DEFAULT_NAN_SENTINEL: f64 = 0.0;

/// Keys whose values are lists of tables when none are configured.
pub const DEFAULT_TABULAR_LIST_KEYS: &[&str] = &["hd"];

/// Leaf comparison mode.
#[derive(Debug, Clone, Copy)]
enum LeafRule {
    /// NaN → sentinel, ±inf → ±f64::MAX before comparing
    Substitute(f64),
    Exact,
    /// NaN equals NaN without substitution (table cells)
    NanAligned,
}

/// Parameters of the value-equivalence rule.
#[derive(Debug, Clone, PartialEq)]
pub struct EquivalenceRules {
    pub nan_sentinel: f64,
    pub tabular_list_keys: BTreeSet<String>,
}

impl Default for EquivalenceRules {
    fn default() -> Self {
        Self {
            nan_sentinel: DEFAULT_NAN_SENTINEL,
            tabular_list_keys: DEFAULT_TABULAR_LIST_KEYS
                .iter()
                .map(|k| k.to_string())
                .collect(),
        }
    }
}

impl EquivalenceRules {
    /// Exact equality when either side holds text or object elements,
    /// sentinel substitution otherwise.
    pub fn nan_policy(fresh: &Value, baseline: &Value) -> NanPolicy {
        if element_kind(fresh).is_nan_undecidable() || element_kind(baseline).is_nan_undecidable()
        {
            NanPolicy::Exact
        } else {
            NanPolicy::SentinelSubstitution
        }
    }

    /// Compare the two values stored under `key`.
    ///
    /// Returns `None` when equivalent.
    pub fn check(&self, key: &str, fresh: &Value, baseline: &Value) -> Option<ValueMismatch> {
        let nan_policy = Self::nan_policy(fresh, baseline);
        let rule = match nan_policy {
            NanPolicy::SentinelSubstitution => LeafRule::Substitute(self.nan_sentinel),
            NanPolicy::Exact => LeafRule::Exact,
        };

        let detail = match (fresh, baseline) {
            (Value::Table(a), Value::Table(b)) => table_mismatch(a, b),
            _ if self.tabular_list_keys.contains(key)
                && (list_items(fresh).is_some() || list_items(baseline).is_some()) =>
            {
                tabular_list_mismatch(fresh, baseline, rule)
            }
            (Value::Table(_), _) | (_, Value::Table(_)) => Some(kind_mismatch(fresh, baseline)),
            _ if fresh.is_container() || baseline.is_container() => {
                leaves_mismatch(&flatten(fresh), &flatten(baseline), rule)
            }
            (Value::Scalar(a), Value::Scalar(b)) => {
                let (la, lb) = (Leaf::from_scalar(a), Leaf::from_scalar(b));
                (!leaf_eq(la, lb, rule)).then(|| MismatchDetail::ScalarMismatch {
                    fresh: la.to_string(),
                    baseline: lb.to_string(),
                })
            }
            _ => Some(kind_mismatch(fresh, baseline)),
        };

        detail.map(|detail| ValueMismatch {
            key: key.to_string(),
            nan_policy,
            detail,
        })
    }
}

fn kind_mismatch(fresh: &Value, baseline: &Value) -> MismatchDetail {
    MismatchDetail::KindMismatch {
        fresh: fresh.kind_name().to_string(),
        baseline: baseline.kind_name().to_string(),
    }
}

fn substitute(x: f64, sentinel: f64) -> f64 {
    if x.is_nan() {
        sentinel
    } else if x == f64::INFINITY {
        f64::MAX
    } else if x == f64::NEG_INFINITY {
        f64::MIN
    } else {
        x
    }
}

fn leaf_eq(a: Leaf<'_>, b: Leaf<'_>, rule: LeafRule) -> bool {
    match (a, b) {
        (Leaf::None, Leaf::None) => true,
        (Leaf::Text(x), Leaf::Text(y)) => x == y,
        (Leaf::Int(x), Leaf::Int(y)) => x == y,
        _ => match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => match rule {
                LeafRule::Substitute(s) => substitute(x, s) == substitute(y, s),
                LeafRule::Exact => x == y,
                LeafRule::NanAligned => x == y || (x.is_nan() && y.is_nan()),
            },
            _ => false,
        },
    }
}

fn leaves_mismatch(a: &[Leaf<'_>], b: &[Leaf<'_>], rule: LeafRule) -> Option<MismatchDetail> {
    if a.len() != b.len() {
        return Some(MismatchDetail::LengthMismatch {
            fresh: a.len(),
            baseline: b.len(),
        });
    }
    a.iter()
        .zip(b)
        .position(|(x, y)| !leaf_eq(*x, *y, rule))
        .map(|index| MismatchDetail::LeafMismatch {
            index,
            fresh: a[index].to_string(),
            baseline: b[index].to_string(),
        })
}

fn list_items(value: &Value) -> Option<&[Value]> {
    match value {
        Value::Sequence(items) => Some(items),
        Value::Array(array) => match array.data() {
            ArrayData::Object(items) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

fn tabular_list_mismatch(
    fresh: &Value,
    baseline: &Value,
    rule: LeafRule,
) -> Option<MismatchDetail> {
    let (Some(a), Some(b)) = (list_items(fresh), list_items(baseline)) else {
        return Some(kind_mismatch(fresh, baseline));
    };
    if a.len() != b.len() {
        return Some(MismatchDetail::LengthMismatch {
            fresh: a.len(),
            baseline: b.len(),
        });
    }
    a.iter().zip(b).enumerate().find_map(|(index, (x, y))| {
        let detail = match (x, y) {
            (Value::Table(tx), Value::Table(ty)) => table_mismatch(tx, ty),
            _ => leaves_mismatch(&flatten(x), &flatten(y), rule),
        };
        detail.map(|d| MismatchDetail::ElementMismatch {
            index,
            detail: Box::new(d),
        })
    })
}

/// Structural table equality: same index, same column names and dtypes in
/// order, same cells with NaN equal to NaN.
fn table_mismatch(a: &Table, b: &Table) -> Option<MismatchDetail> {
    let reason = |reason: String| Some(MismatchDetail::TableMismatch { reason });

    if a.index() != b.index() {
        return reason(format!(
            "index differs ({} vs {} rows)",
            a.row_count(),
            b.row_count()
        ));
    }
    if a.columns().len() != b.columns().len() {
        return reason(format!(
            "column count {} vs {}",
            a.columns().len(),
            b.columns().len()
        ));
    }
    for (pos, (ca, cb)) in a.columns().iter().zip(b.columns()).enumerate() {
        if ca.name != cb.name {
            return reason(format!("column {} name {:?} vs {:?}", pos, ca.name, cb.name));
        }
        if ca.data.dtype_name() != cb.data.dtype_name() {
            return reason(format!(
                "column {:?} dtype {} vs {}",
                ca.name,
                ca.data.dtype_name(),
                cb.data.dtype_name()
            ));
        }
        let fa = flatten_data(&ca.data);
        let fb = flatten_data(&cb.data);
        if let Some(detail) = leaves_mismatch(&fa, &fb, LeafRule::NanAligned) {
            return reason(format!("column {:?}: {}", ca.name, detail));
        }
    }
    None
}

/// Convenience wrapper used where only a yes/no answer is needed.
pub fn values_equivalent(
    rules: &EquivalenceRules,
    key: &str,
    fresh: &Value,
    baseline: &Value,
) -> bool {
    rules.check(key, fresh, baseline).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Column;

    fn rules() -> EquivalenceRules {
        EquivalenceRules::default()
    }

    fn frame(values: Vec<f64>) -> Value {
        let index = (0..values.len()).map(|i| format!("r{}", i)).collect();
        Value::Table(Table::new(index, vec![Column::new("y", ArrayData::Float(values))]).unwrap())
    }

    #[test]
    fn test_identical_numeric_scalars_equal() {
        assert!(rules().check("a", &Value::float(1.0), &Value::float(1.0)).is_none());
    }

    #[test]
    fn test_tiny_numeric_change_detected() {
        let m = rules()
            .check("a", &Value::float(1.0), &Value::float(1.0000001))
            .unwrap();
        assert_eq!(m.key, "a");
        assert!(matches!(m.detail, MismatchDetail::ScalarMismatch { .. }));
    }

    #[test]
    fn test_int_and_float_compare_numerically() {
        let a = Value::sequence(vec![Value::int(1), Value::int(2), Value::int(3)]);
        let b = Value::float_array(vec![1.0, 2.0, 3.0]);
        assert!(values_equivalent(&rules(), "b", &a, &b));
    }

    #[test]
    fn test_nan_equal_for_numeric_arrays() {
        let a = Value::float_array(vec![1.0, f64::NAN]);
        let b = Value::float_array(vec![1.0, f64::NAN]);
        assert_eq!(
            EquivalenceRules::nan_policy(&a, &b),
            NanPolicy::SentinelSubstitution
        );
        assert!(values_equivalent(&rules(), "x", &a, &b));
    }

    #[test]
    fn test_nan_not_equal_for_object_arrays() {
        let a = Value::object_array(vec![Value::text("s"), Value::float(f64::NAN)]);
        let b = Value::object_array(vec![Value::text("s"), Value::float(f64::NAN)]);
        let m = rules().check("x", &a, &b).unwrap();
        assert_eq!(m.nan_policy, NanPolicy::Exact);
        assert!(matches!(m.detail, MismatchDetail::LeafMismatch { index: 1, .. }));
    }

    #[test]
    fn test_sentinel_makes_nan_equal_zero() {
        let a = Value::float_array(vec![f64::NAN]);
        let b = Value::float_array(vec![0.0]);
        assert!(values_equivalent(&rules(), "x", &a, &b));

        let strict = EquivalenceRules {
            nan_sentinel: -999.0,
            ..rules()
        };
        assert!(!values_equivalent(&strict, "x", &a, &b));
    }

    #[test]
    fn test_infinities_substituted() {
        let a = Value::float_array(vec![f64::INFINITY, f64::NEG_INFINITY]);
        let b = Value::float_array(vec![f64::MAX, f64::MIN]);
        assert!(values_equivalent(&rules(), "x", &a, &b));
    }

    #[test]
    fn test_flattened_length_mismatch() {
        let a = Value::float_array(vec![1.0, 2.0]);
        let b = Value::float_array(vec![1.0, 2.0, 3.0]);
        let m = rules().check("x", &a, &b).unwrap();
        assert_eq!(
            m.detail,
            MismatchDetail::LengthMismatch {
                fresh: 2,
                baseline: 3
            }
        );
    }

    #[test]
    fn test_text_scalars() {
        assert!(values_equivalent(&rules(), "t", &Value::text("a"), &Value::text("a")));
        assert!(!values_equivalent(&rules(), "t", &Value::text("a"), &Value::text("b")));
        assert!(!values_equivalent(&rules(), "t", &Value::text("1"), &Value::int(1)));
    }

    #[test]
    fn test_tables_structural_nan_aligned() {
        assert!(values_equivalent(
            &rules(),
            "df",
            &frame(vec![1.0, f64::NAN]),
            &frame(vec![1.0, f64::NAN])
        ));
        // No sentinel inside tables: NaN is not 0.0 there.
        assert!(!values_equivalent(
            &rules(),
            "df",
            &frame(vec![1.0, f64::NAN]),
            &frame(vec![1.0, 0.0])
        ));
    }

    #[test]
    fn test_table_dtype_difference() {
        let a = Value::Table(
            Table::new(vec!["r0".into()], vec![Column::new("y", ArrayData::Int(vec![1]))]).unwrap(),
        );
        let m = rules().check("df", &a, &frame(vec![1.0])).unwrap();
        match m.detail {
            MismatchDetail::TableMismatch { reason } => assert!(reason.contains("dtype")),
            other => panic!("unexpected detail {:?}", other),
        }
    }

    #[test]
    fn test_tabular_list_element_by_element() {
        let a = Value::sequence(vec![frame(vec![1.0]), frame(vec![2.0])]);
        let b = Value::sequence(vec![frame(vec![1.0]), frame(vec![2.5])]);
        let m = rules().check("hd", &a, &b).unwrap();
        assert!(matches!(m.detail, MismatchDetail::ElementMismatch { index: 1, .. }));

        assert!(values_equivalent(&rules(), "hd", &a, &a.clone()));
    }

    #[test]
    fn test_tabular_list_length() {
        let a = Value::sequence(vec![frame(vec![1.0])]);
        let b = Value::sequence(vec![frame(vec![1.0]), frame(vec![2.0])]);
        let m = rules().check("hd", &a, &b).unwrap();
        assert_eq!(
            m.detail,
            MismatchDetail::LengthMismatch {
                fresh: 1,
                baseline: 2
            }
        );
    }

    #[test]
    fn test_tabular_list_key_without_list_uses_generic_rule() {
        assert!(values_equivalent(&rules(), "hd", &Value::int(1), &Value::int(1)));
        assert!(!values_equivalent(
            &rules(),
            "hd",
            &Value::sequence(vec![Value::int(1)]),
            &Value::int(1)
        ));
    }

    #[test]
    fn test_table_vs_scalar_is_kind_mismatch() {
        let m = rules().check("df", &frame(vec![1.0]), &Value::float(1.0)).unwrap();
        assert_eq!(
            m.detail,
            MismatchDetail::KindMismatch {
                fresh: "table".into(),
                baseline: "scalar".into()
            }
        );
    }
}
