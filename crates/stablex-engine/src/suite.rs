//! The two regression checks.
//!
//! Both checks announce how to regenerate the baseline before they assert,
//! and both run against a shared [`RegressionFixture`]. They are independent:
//! a structural failure never stops the value check, which recomputes its
//! own key diff rather than trusting the fixture's.

use crate::config::StablexConfig;
use crate::fixture::RegressionFixture;
use stablex_core::diff::{
    build_report, check_comparison, compare_structure, compare_values, compute_diff,
    evaluate_values,
};
use stablex_core::errors::{ExError, Result};
use stablex_core::schema::{CHECK_CONTENT_OF_OUTPUTS, CHECK_WHAT_OUTPUT_IS_THERE};
use stablex_core::{log_op_end, log_op_start};
use stablex_core::{
    ComparisonReport, Diagnostics, EquivalenceRules, SilentDiagnostics, ValueComparison,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

/// Comparison parameters plus the diagnostics sink.
pub struct RegressionSuite {
    rules: EquivalenceRules,
    excluded_keys: BTreeSet<String>,
    regenerate_hint: String,
    diagnostics: Arc<dyn Diagnostics>,
}

/// Outcome of running both checks.
#[derive(Debug, Clone)]
pub struct SuiteOutcome {
    pub structure: std::result::Result<(), ExError>,
    pub content: std::result::Result<ValueComparison, ExError>,
}

impl SuiteOutcome {
    pub fn passed(&self) -> bool {
        self.structure.is_ok() && self.content.is_ok()
    }
}

/// Which checks [`RegressionSuite::check`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckSelection {
    #[default]
    Both,
    Structure,
    Content,
}

impl CheckSelection {
    pub fn includes_structure(self) -> bool {
        self != CheckSelection::Content
    }

    pub fn includes_content(self) -> bool {
        self != CheckSelection::Structure
    }
}

/// Results of the selected checks plus the report built from the same
/// comparison. `None` marks a check that was not selected.
#[derive(Debug, Clone)]
pub struct CheckRun {
    pub structure: Option<std::result::Result<(), ExError>>,
    pub content: Option<std::result::Result<(), ExError>>,
    pub report: ComparisonReport,
}

impl CheckRun {
    pub fn passed(&self) -> bool {
        !matches!(self.structure, Some(Err(_))) && !matches!(self.content, Some(Err(_)))
    }
}

impl RegressionSuite {
    pub fn new(
        rules: EquivalenceRules,
        excluded_keys: BTreeSet<String>,
        regenerate_hint: impl Into<String>,
        diagnostics: Arc<dyn Diagnostics>,
    ) -> Self {
        Self {
            rules,
            excluded_keys,
            regenerate_hint: regenerate_hint.into(),
            diagnostics,
        }
    }

    pub fn from_config(config: &StablexConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self::new(
            config.rules(),
            config.excluded_keys(),
            config.baseline.regenerate_hint.clone(),
            diagnostics,
        )
    }

    pub fn rules(&self) -> &EquivalenceRules {
        &self.rules
    }

    pub fn excluded_keys(&self) -> &BTreeSet<String> {
        &self.excluded_keys
    }

    /// Fresh and baseline must hold exactly the same keys.
    ///
    /// # Errors
    ///
    /// `StructuralMismatch` naming every key present on one side only.
    pub fn what_output_is_there(&self, fixture: &RegressionFixture) -> Result<()> {
        self.diagnostics
            .regenerate_hint(CHECK_WHAT_OUTPUT_IS_THERE, &self.regenerate_hint);
        compare_structure(&fixture.diff)
    }

    /// Every shared, non-excluded key must hold an equivalent value.
    ///
    /// # Errors
    ///
    /// `ValueMismatch` naming every failing key.
    pub fn content_of_outputs(&self, fixture: &RegressionFixture) -> Result<ValueComparison> {
        self.diagnostics
            .regenerate_hint(CHECK_CONTENT_OF_OUTPUTS, &self.regenerate_hint);
        let diff = compute_diff(&fixture.fresh, &fixture.baseline);
        compare_values(
            &fixture.fresh,
            &fixture.baseline,
            &diff,
            &self.excluded_keys,
            &self.rules,
            self.diagnostics.as_ref(),
        )
    }

    /// Run both checks, each regardless of the other's result.
    pub fn run(&self, fixture: &RegressionFixture) -> SuiteOutcome {
        SuiteOutcome {
            structure: self.what_output_is_there(fixture),
            content: self.content_of_outputs(fixture),
        }
    }

    /// Full comparison report for summaries. Emits no diagnostics.
    pub fn report(&self, fixture: &RegressionFixture) -> ComparisonReport {
        build_report(
            &fixture.fresh,
            &fixture.baseline,
            &self.excluded_keys,
            &self.rules,
            &SilentDiagnostics,
        )
    }

    /// Run the selected checks once and build the report from their results.
    ///
    /// Each selected check emits its regenerate hint before asserting, and
    /// every shared key is compared exactly once. When the content check is
    /// not selected the report's values are still filled in, silently.
    pub fn check(&self, fixture: &RegressionFixture, selection: CheckSelection) -> CheckRun {
        let start = Instant::now();
        log_op_start!("check_fixture", key_count = fixture.fresh.len());

        let structure = selection.includes_structure().then(|| {
            self.diagnostics
                .regenerate_hint(CHECK_WHAT_OUTPUT_IS_THERE, &self.regenerate_hint);
            compare_structure(&fixture.diff)
        });

        if selection.includes_content() {
            self.diagnostics
                .regenerate_hint(CHECK_CONTENT_OF_OUTPUTS, &self.regenerate_hint);
        }
        let diagnostics: &dyn Diagnostics = if selection.includes_content() {
            self.diagnostics.as_ref()
        } else {
            &SilentDiagnostics
        };
        let key_diff = compute_diff(&fixture.fresh, &fixture.baseline);
        let values = evaluate_values(
            &fixture.fresh,
            &fixture.baseline,
            &key_diff,
            &self.excluded_keys,
            &self.rules,
            diagnostics,
        );
        let content = selection
            .includes_content()
            .then(|| check_comparison(&values));

        let run = CheckRun {
            structure,
            content,
            report: ComparisonReport::new(&fixture.fresh, &fixture.baseline, key_diff, values),
        };
        log_op_end!(
            "check_fixture",
            duration_ms = start.elapsed().as_millis() as u64,
            passed = run.passed()
        );
        run
    }
}
