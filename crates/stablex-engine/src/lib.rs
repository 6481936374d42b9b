//! Stablex Engine - regression harness orchestration
//!
//! Wires the comparator in stablex-core to the outside world: configuration,
//! running the reference workflow, the shared fixture, the two regression
//! checks, and baseline export.

pub mod config;
pub mod export;
pub mod fixture;
pub mod normalize;
pub mod suite;
pub mod workflow;

pub use config::StablexConfig;
pub use export::{export_baseline, ExportSummary};
pub use fixture::{
    build_fixture, build_fixture_from_config, produce_fresh_snapshot, FixtureCache,
    RegressionFixture,
};
pub use suite::{CheckRun, CheckSelection, RegressionSuite, SuiteOutcome};
pub use workflow::{Bindings, BindingsDocument, ScriptWorkflow, Workflow};
