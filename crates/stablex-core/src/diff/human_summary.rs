//! Human-readable summary renderer for comparison reports.

use crate::diff::model::{ComparisonReport, NanPolicy};

/// Render a Markdown summary of a [`ComparisonReport`].
///
/// Intended for terminal output and CI logs. Informational only; pass/fail is
/// decided by the structured report.
pub fn render_human_summary(report: &ComparisonReport) -> String {
    let mut out = String::new();

    out.push_str("## Tutorial Output Stability\n\n");

    let verdict = if report.passed() { "PASS" } else { "FAIL" };
    out.push_str(&format!(
        "**Verdict**: {verdict}  \n**Structure**: {}  \n**Content**: {}\n\n",
        pass_label(report.structure_passed()),
        pass_label(report.content_passed()),
    ));

    out.push_str("### Keys\n\n");
    out.push_str(&format!(
        "| | Count |\n\
         |---|---|\n\
         | Fresh | {} |\n\
         | Baseline | {} |\n\
         | Compared | {} |\n\
         | Excluded | {} |\n\n",
        report.fresh_key_count,
        report.baseline_key_count,
        report.values.compared.len(),
        report.values.excluded.len(),
    ));

    let diff = &report.key_diff;
    if !diff.is_empty() {
        out.push_str("### Structural Differences\n\n");
        if !diff.only_in_fresh.is_empty() {
            out.push_str(&format!(
                "- **Only in fresh** ({}): {}\n",
                diff.only_in_fresh.len(),
                join_keys(diff.only_in_fresh.iter())
            ));
        }
        if !diff.only_in_baseline.is_empty() {
            out.push_str(&format!(
                "- **Only in baseline** ({}): {}\n",
                diff.only_in_baseline.len(),
                join_keys(diff.only_in_baseline.iter())
            ));
        }
        out.push('\n');
    }

    if !report.values.mismatches.is_empty() {
        out.push_str("### Value Mismatches\n\n");
        for m in &report.values.mismatches {
            let policy = match m.nan_policy {
                NanPolicy::SentinelSubstitution => "nan=sentinel",
                NanPolicy::Exact => "exact",
            };
            out.push_str(&format!("- `{}` ({}): {}\n", m.key, policy, m.detail));
        }
        out.push('\n');
    }

    if report.passed() {
        out.push_str("_No differences detected._\n");
    }

    out
}

fn pass_label(passed: bool) -> &'static str {
    if passed {
        "pass"
    } else {
        "fail"
    }
}

fn join_keys<'a>(keys: impl Iterator<Item = &'a String>) -> String {
    keys.map(|k| format!("`{}`", k)).collect::<Vec<_>>().join(", ")
}
