//! Snapshot comparison engine.
//!
//! Entry points mirror the two regression checks: [`compute_diff`] +
//! [`compare_structure`] for the key sets, [`compare_values`] for the
//! contents of shared keys. [`build_report`] runs both for summaries.

use crate::diagnostics::Diagnostics;
use crate::diff::equivalence::EquivalenceRules;
use crate::diff::model::{ComparisonReport, KeyDiff, ValueComparison};
use crate::errors::{ExError, ExErrorKind};
use crate::snapshot::Snapshot;
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::time::Instant;

/// Symmetric difference of the key sets of `fresh` and `baseline`.
pub fn compute_diff(fresh: &Snapshot, baseline: &Snapshot) -> KeyDiff {
    let a = fresh.key_set();
    let b = baseline.key_set();
    KeyDiff {
        only_in_fresh: a.difference(&b).map(|k| k.to_string()).collect(),
        only_in_baseline: b.difference(&a).map(|k| k.to_string()).collect(),
    }
}

/// Pass iff `diff` is empty.
///
/// # Errors
///
/// `StructuralMismatch` naming every extra and missing key.
pub fn compare_structure(diff: &KeyDiff) -> Result<(), ExError> {
    if diff.is_empty() {
        return Ok(());
    }
    Err(ExError::new(ExErrorKind::StructuralMismatch)
        .with_op("compare_structure")
        .with_keys(diff.symmetric().into_iter().collect())
        .with_message(format!(
            "{} key(s) differ; only in fresh: {:?}; only in baseline: {:?}",
            diff.len(),
            diff.only_in_fresh,
            diff.only_in_baseline
        )))
}

/// Keys to value-compare: `(keys(a) ∪ keys(b)) − diff − excluded`, sorted.
///
/// Returns the keys to compare and the shared keys skipped as excluded.
pub fn shared_keys(
    fresh: &Snapshot,
    baseline: &Snapshot,
    diff: &KeyDiff,
    excluded: &BTreeSet<String>,
) -> (Vec<String>, Vec<String>) {
    let union: BTreeSet<&str> = fresh.keys().chain(baseline.keys()).collect();
    let mut compared = Vec::new();
    let mut skipped = Vec::new();
    for key in union {
        if diff.contains(key) {
            continue;
        }
        if excluded.contains(key) {
            skipped.push(key.to_string());
        } else {
            compared.push(key.to_string());
        }
    }
    (compared, skipped)
}

/// Compare every shared, non-excluded key and collect all mismatches.
///
/// Reports each key to `diagnostics` before comparing it. Keys listed in
/// `diff` are never compared even if present on both sides, so a stale diff
/// narrows the comparison rather than failing it.
pub fn evaluate_values(
    fresh: &Snapshot,
    baseline: &Snapshot,
    diff: &KeyDiff,
    excluded: &BTreeSet<String>,
    rules: &EquivalenceRules,
    diagnostics: &dyn Diagnostics,
) -> ValueComparison {
    let (compared, excluded) = shared_keys(fresh, baseline, diff, excluded);
    let mut mismatches = Vec::new();

    for key in &compared {
        diagnostics.comparing_key(key);
        let (Some(a), Some(b)) = (fresh.get(key), baseline.get(key)) else {
            continue;
        };
        if let Some(mismatch) = rules.check(key, a, b) {
            tracing::debug!(key = key.as_str(), detail = %mismatch.detail, "value mismatch");
            mismatches.push(mismatch);
        }
    }

    ValueComparison {
        compared,
        excluded,
        mismatches,
    }
}

/// Pass iff `comparison` holds no mismatches.
///
/// # Errors
///
/// `ValueMismatch` carrying every failing key, its first key as `key`, and a
/// message with one `key: detail` line per failure.
pub fn check_comparison(comparison: &ValueComparison) -> Result<(), ExError> {
    let keys = comparison.mismatched_keys();
    let Some(first) = keys.first().cloned() else {
        return Ok(());
    };
    let lines: Vec<String> = comparison
        .mismatches
        .iter()
        .map(|m| format!("{}: {}", m.key, m.detail))
        .collect();
    Err(ExError::new(ExErrorKind::ValueMismatch)
        .with_op("compare_values")
        .with_key(first)
        .with_keys(keys)
        .with_message(format!(
            "{} of {} shared key(s) differ:\n{}",
            comparison.mismatches.len(),
            comparison.compared.len(),
            lines.join("\n")
        )))
}

/// [`evaluate_values`] as a pass/fail result.
///
/// # Errors
///
/// See [`check_comparison`].
pub fn compare_values(
    fresh: &Snapshot,
    baseline: &Snapshot,
    diff: &KeyDiff,
    excluded: &BTreeSet<String>,
    rules: &EquivalenceRules,
    diagnostics: &dyn Diagnostics,
) -> Result<ValueComparison, ExError> {
    let start = Instant::now();
    log_op_start!("compare_values", key_count = fresh.len());

    let comparison = evaluate_values(fresh, baseline, diff, excluded, rules, diagnostics);
    let duration_ms = start.elapsed().as_millis() as u64;

    match check_comparison(&comparison) {
        Ok(()) => {
            log_op_end!(
                "compare_values",
                duration_ms = duration_ms,
                key_count = comparison.compared.len()
            );
            Ok(comparison)
        }
        Err(err) => {
            log_op_error!(
                "compare_values",
                err.clone(),
                duration_ms = duration_ms,
                mismatch_count = comparison.mismatches.len()
            );
            Err(err)
        }
    }
}

/// Run both comparisons and assemble a report.
pub fn build_report(
    fresh: &Snapshot,
    baseline: &Snapshot,
    excluded: &BTreeSet<String>,
    rules: &EquivalenceRules,
    diagnostics: &dyn Diagnostics,
) -> ComparisonReport {
    let key_diff = compute_diff(fresh, baseline);
    let values = evaluate_values(fresh, baseline, &key_diff, excluded, rules, diagnostics);
    ComparisonReport::new(fresh, baseline, key_diff, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingDiagnostics;
    use crate::snapshot::Value;

    fn snap(entries: Vec<(&str, Value)>) -> Snapshot {
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }

    #[test]
    fn test_shared_keys_skip_diff_and_excluded() {
        let a = snap(vec![("a", Value::int(1)), ("x", Value::int(1)), ("c", Value::int(1))]);
        let b = snap(vec![("a", Value::int(1)), ("x", Value::int(1))]);
        let diff = compute_diff(&a, &b);
        let excluded: BTreeSet<String> = ["x".to_string()].into();
        let (compared, skipped) = shared_keys(&a, &b, &diff, &excluded);
        assert_eq!(compared, vec!["a"]);
        assert_eq!(skipped, vec!["x"]);
    }

    #[test]
    fn test_compare_values_collects_every_failure() {
        let a = snap(vec![
            ("a", Value::float(1.0)),
            ("b", Value::float(2.0)),
            ("c", Value::float(3.0)),
        ]);
        let b = snap(vec![
            ("a", Value::float(1.5)),
            ("b", Value::float(2.0)),
            ("c", Value::float(3.5)),
        ]);
        let diag = RecordingDiagnostics::new();
        let err = compare_values(
            &a,
            &b,
            &compute_diff(&a, &b),
            &BTreeSet::new(),
            &EquivalenceRules::default(),
            &diag,
        )
        .unwrap_err();

        assert_eq!(err.kind(), ExErrorKind::ValueMismatch);
        assert_eq!(err.keys(), Some(&["a".to_string(), "c".to_string()][..]));
        assert_eq!(err.key(), Some("a"));
        assert_eq!(diag.compared_keys(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_check_comparison_clean_passes() {
        let a = snap(vec![("a", Value::float(1.0))]);
        let comparison = evaluate_values(
            &a,
            &a,
            &KeyDiff::default(),
            &BTreeSet::new(),
            &EquivalenceRules::default(),
            &RecordingDiagnostics::new(),
        );
        assert!(check_comparison(&comparison).is_ok());
    }
}
