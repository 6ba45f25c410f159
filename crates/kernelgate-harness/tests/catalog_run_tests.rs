//! End-to-end runner tests: catalog × capabilities × shapes against the
//! reference runtime, with skip-matrix and fail-fast behavior.

use kernelgate_core::{Capability, CapabilitySet};
use kernelgate_harness::report::CheckStatus;
use kernelgate_harness::runner::run_catalog;
use kernelgate_harness::scenario::catalog;
use kernelgate_harness::skip::SkipMatrix;
use kernelgate_harness::HarnessConfig;
use kernelgate_runtime::{Backend, Device, FaultConfig, ReferenceRuntime, SubmissionShape};

fn reference_device(caps: &[Capability]) -> Device {
    Device::new("ref0", Backend::Reference, caps.iter().copied().collect())
}

#[test]
fn conformant_runtime_passes_the_whole_catalog() {
    let mut rt = ReferenceRuntime::new();
    let dev = reference_device(&[Capability::Fp16]);
    let report =
        run_catalog(&mut rt, &dev, &HarnessConfig::default(), &SkipMatrix::empty());

    assert!(report.is_conforming(), "{report}");
    // 8 scenarios × 3 capabilities × 5 shapes.
    let expected =
        catalog().len() * Capability::ALL.len() * SubmissionShape::ALL.len();
    assert_eq!(report.records.len(), expected);
    assert_eq!(report.passed(), expected);
}

#[test]
fn skip_matrix_suppresses_scenarios_per_backend() {
    let mut rt = ReferenceRuntime::new();
    let dev = Device::new("hip0", Backend::Hip, CapabilitySet::all());
    let report =
        run_catalog(&mut rt, &dev, &HarnessConfig::default(), &SkipMatrix::builtin());

    // Everything is tagged kernel_features, and HIP skips that tag.
    assert_eq!(report.skipped(), catalog().len());
    assert_eq!(report.passed(), 0);
    assert!(report.is_conforming(), "skips must not fail conformance");
    assert!(report
        .records
        .iter()
        .all(|r| r.status == CheckStatus::Skip && r.detail.is_some()));
}

#[test]
fn scenario_filter_limits_the_run() {
    let mut rt = ReferenceRuntime::new();
    let dev = reference_device(&[]);
    let config = HarnessConfig {
        scenario_filter: Some("external".into()),
        ..HarnessConfig::default()
    };
    let report = run_catalog(&mut rt, &dev, &config, &SkipMatrix::empty());

    let matching =
        catalog().iter().filter(|s| s.name.contains("external")).count();
    assert!(matching > 0);
    assert_eq!(
        report.records.len(),
        matching * Capability::ALL.len() * SubmissionShape::ALL.len()
    );
}

#[test]
fn faulted_runtime_fails_and_names_the_mismatch() {
    let mut rt = ReferenceRuntime::with_faults(FaultConfig {
        ignore_capability_gate: true,
        ..FaultConfig::none()
    });
    // Empty capability set: every scenario expects rejection somewhere.
    let dev = reference_device(&[]);
    let report =
        run_catalog(&mut rt, &dev, &HarnessConfig::default(), &SkipMatrix::empty());

    assert!(!report.is_conforming());
    let detail = report.failures().next().and_then(|r| r.detail.clone()).unwrap_or_default();
    assert!(
        detail.contains("expected reject"),
        "failure detail should describe the mismatch: {detail}"
    );
}

#[test]
fn fail_fast_stops_after_first_failing_scenario() {
    let mut rt = ReferenceRuntime::with_faults(FaultConfig {
        ignore_capability_gate: true,
        ..FaultConfig::none()
    });
    let dev = reference_device(&[]);
    let config = HarnessConfig { fail_fast: true, ..HarnessConfig::default() };
    let report = run_catalog(&mut rt, &dev, &config, &SkipMatrix::empty());

    assert!(!report.is_conforming());
    // Only the first (scenario, capability) block is recorded.
    assert_eq!(report.records.len(), SubmissionShape::ALL.len());
}

#[test]
fn report_serializes_for_machine_consumption() {
    let mut rt = ReferenceRuntime::new();
    let dev = reference_device(&[Capability::Atomic64]);
    let report =
        run_catalog(&mut rt, &dev, &HarnessConfig::default(), &SkipMatrix::empty());
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("use_no_declaration"));
}
