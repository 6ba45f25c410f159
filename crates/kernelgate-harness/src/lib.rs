//! Conformance harnesses for the kernelgate suite.
//!
//! The pure engines in `kernelgate-core` predict behavior; this crate
//! drives a [`kernelgate_runtime::KernelRuntime`] through the predicted
//! situations and records every disagreement:
//!
//! - [`scenario`]: the table-driven catalog of capability/declaration
//!   shapes, expanded over all tracked capabilities by one generic runner;
//! - [`exerciser`]: drives each scenario through every submission shape
//!   and checks verdict, error classification, and the sentinel side
//!   effect;
//! - [`bundle_verify`]: gathers per-kernel existence facts through
//!   single-kernel queries, folds them, and checks the batched query for
//!   every state and non-empty kernel subset;
//! - [`skip`]: the known-nonconformant-backend matrix;
//! - [`config`] / [`report`]: harness configuration and the serializable
//!   conformance report.

pub mod bundle_verify;
pub mod config;
pub mod exerciser;
pub mod report;
pub mod runner;
pub mod scenario;
pub mod skip;

pub use bundle_verify::{gather_facts, verify_state, verify_all_states};
pub use config::{ConfigError, HarnessConfig};
pub use exerciser::{CheckFailure, ShapeObservation, exercise_scenario};
pub use report::{CheckStatus, ConformanceReport, ScenarioRecord};
pub use runner::{run_bundle_checks, run_catalog};
pub use scenario::{CalleeKind, DeclChoice, Scenario, catalog};
pub use skip::{SkipEntry, SkipMatrix};
