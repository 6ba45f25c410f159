//! Generic catalog runner.
//!
//! Iterates the scenario catalog over every tracked capability, consults
//! the skip matrix, exercises each selected scenario through all
//! submission shapes, and optionally verifies bundle-existence
//! combinatorics — producing one [`ConformanceReport`].

use tracing::{debug, info, warn};

use kernelgate_core::{Capability, KernelId};
use kernelgate_runtime::{Device, KernelRuntime};

use crate::bundle_verify::verify_all_states;
use crate::config::HarnessConfig;
use crate::exerciser::exercise_scenario;
use crate::report::{CheckStatus, ConformanceReport, ScenarioRecord};
use crate::scenario::catalog;
use crate::skip::SkipMatrix;

/// Run the capability-gating catalog against `runtime` on `device`.
pub fn run_catalog<R: KernelRuntime>(
    runtime: &mut R,
    device: &Device,
    config: &HarnessConfig,
    skips: &SkipMatrix,
) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    info!(device = %device, backend = %config.backend, "running capability-gating catalog");

    'scenarios: for scenario in catalog() {
        if !config.selects(scenario.name) {
            continue;
        }
        if let Some(reason) = skips.should_skip(device.backend(), scenario.tag) {
            warn!(scenario = scenario.name, reason, "skipping scenario");
            report.push(ScenarioRecord {
                scenario: scenario.name.to_string(),
                capability: None,
                shape: None,
                status: CheckStatus::Skip,
                detail: Some(reason.to_string()),
            });
            continue;
        }

        for &capability in Capability::ALL {
            let observations = exercise_scenario(runtime, device, scenario, capability);
            let mut scenario_failed = false;
            for obs in observations {
                let status = if obs.passed() { CheckStatus::Pass } else { CheckStatus::Fail };
                scenario_failed |= !obs.passed();
                report.push(ScenarioRecord {
                    scenario: scenario.name.to_string(),
                    capability: Some(capability.to_string()),
                    shape: Some(obs.shape.to_string()),
                    status,
                    detail: obs.result.err().map(|e| e.to_string()),
                });
            }
            if scenario_failed && config.fail_fast {
                debug!(scenario = scenario.name, "fail-fast stop");
                break 'scenarios;
            }
        }
    }
    report
}

/// Verify bundle-existence combinatorics for `kernels` on `device` and
/// append the results to a report.
pub fn run_bundle_checks<R: KernelRuntime>(
    runtime: &R,
    device: &Device,
    kernels: &[KernelId],
) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    info!(device = %device, kernels = kernels.len(), "running bundle-existence checks");

    match verify_all_states(runtime, device, kernels) {
        Ok(mismatches) if mismatches.is_empty() => {
            report.push(ScenarioRecord {
                scenario: "bundle_existence".to_string(),
                capability: None,
                shape: None,
                status: CheckStatus::Pass,
                detail: None,
            });
        }
        Ok(mismatches) => {
            for mismatch in mismatches {
                report.push(ScenarioRecord {
                    scenario: "bundle_existence".to_string(),
                    capability: None,
                    shape: None,
                    status: CheckStatus::Fail,
                    detail: Some(mismatch.to_string()),
                });
            }
        }
        Err(err) => {
            report.push(ScenarioRecord {
                scenario: "bundle_existence".to_string(),
                capability: None,
                shape: None,
                status: CheckStatus::Fail,
                detail: Some(format!("runtime setup error: {err}")),
            });
        }
    }
    report
}
