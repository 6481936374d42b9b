//! Tutorial output stability checks against the real reference workflow.
//!
//! Run with `cargo test -p stablex-engine --features regression`. The
//! workflow and baseline come from `STABLEX_CONFIG`, or the workspace's
//! `stablex.toml`.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use stablex_core::logging_facility::{init, Profile};
use stablex_core::TracingDiagnostics;
use stablex_engine::config::CONFIG_ENV_VAR;
use stablex_engine::{
    build_fixture_from_config, FixtureCache, RegressionFixture, RegressionSuite, StablexConfig,
};
use std::path::PathBuf;
use std::sync::Arc;

static FIXTURE: FixtureCache = FixtureCache::new();

fn config() -> StablexConfig {
    let explicit = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../stablex.toml")
        });
    StablexConfig::load(Some(&explicit)).unwrap_or_else(|e| panic!("{}", e))
}

fn fixture() -> Arc<RegressionFixture> {
    init(Profile::Development);
    FIXTURE
        .get_or_init(|| build_fixture_from_config(&config()))
        .unwrap_or_else(|e| panic!("regression fixture unavailable: {}", e))
}

fn suite() -> RegressionSuite {
    RegressionSuite::from_config(&config(), Arc::new(TracingDiagnostics))
}

#[test]
#[cfg_attr(
    not(feature = "regression"),
    ignore = "runs the reference workflow; enable the `regression` feature"
)]
fn test_what_output_is_there() {
    let fixture = fixture();
    if let Err(e) = suite().what_output_is_there(&fixture) {
        panic!("{}", e);
    }
}

#[test]
#[cfg_attr(
    not(feature = "regression"),
    ignore = "runs the reference workflow; enable the `regression` feature"
)]
fn test_content_of_outputs() {
    let fixture = fixture();
    if let Err(e) = suite().content_of_outputs(&fixture) {
        panic!("{}", e);
    }
}
