//! Regression fixtures: the fresh snapshot, the baseline, and their key diff.
//!
//! Producing the fresh snapshot runs the whole tutorial, so a fixture is
//! built at most once per process through a [`FixtureCache`] and then shared
//! read-only by both checks.

use crate::config::StablexConfig;
use crate::normalize::normalize_bindings;
use crate::workflow::{ScriptWorkflow, Workflow};
use stablex_core::diff::compute_diff;
use stablex_core::errors::{ExError, Result};
use stablex_core::{log_op_end, log_op_error, log_op_start, KeyDiff, Snapshot};
use stablex_store::load_baseline_snapshot;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

/// Inputs shared by the regression checks.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionFixture {
    pub fresh: Snapshot,
    pub baseline: Snapshot,
    /// Key diff computed once when the fixture is built
    pub diff: KeyDiff,
}

impl RegressionFixture {
    pub fn new(fresh: Snapshot, baseline: Snapshot) -> Self {
        let diff = compute_diff(&fresh, &baseline);
        Self {
            fresh,
            baseline,
            diff,
        }
    }
}

/// Run `workflow` and capture its normalized bindings.
///
/// # Errors
///
/// `Execution` if the workflow fails.
pub fn produce_fresh_snapshot(workflow: &dyn Workflow) -> Result<Snapshot> {
    let start = Instant::now();
    let name = workflow.describe();
    log_op_start!("produce_fresh_snapshot", workflow = name.as_str());

    match workflow.execute() {
        Ok(bindings) => {
            let snapshot = normalize_bindings(bindings);
            log_op_end!(
                "produce_fresh_snapshot",
                duration_ms = start.elapsed().as_millis() as u64,
                key_count = snapshot.len()
            );
            Ok(snapshot)
        }
        Err(err) => {
            let err = err.with_op("produce_fresh_snapshot");
            log_op_error!(
                "produce_fresh_snapshot",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

/// Produce the fresh snapshot, load the baseline, and diff their keys.
///
/// # Errors
///
/// `Execution` from the workflow or `BaselineMissing` from the archive.
pub fn build_fixture(workflow: &dyn Workflow, baseline_path: &Path) -> Result<RegressionFixture> {
    let fresh = produce_fresh_snapshot(workflow)?;
    let baseline = load_baseline_snapshot(baseline_path)?;
    let fixture = RegressionFixture::new(fresh, baseline);
    tracing::info!(
        diff_len = fixture.diff.len(),
        fresh_key_count = fixture.fresh.len(),
        baseline_key_count = fixture.baseline.len(),
        "regression fixture ready"
    );
    Ok(fixture)
}

/// [`build_fixture`] with the configured script workflow and baseline path.
///
/// # Errors
///
/// See [`build_fixture`].
pub fn build_fixture_from_config(config: &StablexConfig) -> Result<RegressionFixture> {
    build_fixture(&ScriptWorkflow::from_config(config), &config.baseline_path())
}

/// Once-computed, shared fixture.
///
/// The first caller builds the fixture; every later caller gets the same
/// `Arc`, or a clone of the same error if building failed.
#[derive(Debug, Default)]
pub struct FixtureCache {
    cell: OnceLock<std::result::Result<Arc<RegressionFixture>, ExError>>,
}

impl FixtureCache {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Return the cached fixture, building it with `build` on first use.
    ///
    /// # Errors
    ///
    /// The error `build` returned the first time, on every call.
    pub fn get_or_init<F>(&self, build: F) -> Result<Arc<RegressionFixture>>
    where
        F: FnOnce() -> Result<RegressionFixture>,
    {
        self.cell.get_or_init(|| build().map(Arc::new)).clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stablex_core::{ExErrorKind, Value};

    #[test]
    fn test_fixture_diff_computed_on_construction() {
        let fresh: Snapshot = [
            ("a".to_string(), Value::int(1)),
            ("c".to_string(), Value::int(1)),
        ]
        .into_iter()
        .collect();
        let baseline: Snapshot = [("a".to_string(), Value::int(1))].into_iter().collect();
        let fixture = RegressionFixture::new(fresh, baseline);
        assert!(fixture.diff.only_in_fresh.contains("c"));
    }

    #[test]
    fn test_cache_builds_once() {
        let cache = FixtureCache::new();
        let mut calls = 0;
        let first = cache
            .get_or_init(|| {
                calls += 1;
                Ok(RegressionFixture::new(Snapshot::default(), Snapshot::default()))
            })
            .unwrap();
        let second = cache
            .get_or_init(|| panic!("fixture must not be rebuilt"))
            .unwrap();
        assert_eq!(calls, 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_keeps_error() {
        let cache = FixtureCache::new();
        let err = cache
            .get_or_init(|| Err(ExError::new(ExErrorKind::Execution).with_message("boom")))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Execution);

        let again = cache
            .get_or_init(|| Ok(RegressionFixture::new(Snapshot::default(), Snapshot::default())))
            .unwrap_err();
        assert_eq!(again.message(), "boom");
        assert!(cache.is_initialized());
    }
}
