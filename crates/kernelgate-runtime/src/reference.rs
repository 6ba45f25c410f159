//! In-memory reference runtime.
//!
//! A conformant [`KernelRuntime`] used by the suite's own tests and the
//! CLI demo: it enforces the capability gate from each submission's
//! callable profile, serves bundle queries from registered ground-truth
//! facts, and counts sentinel side effects per (kernel, shape).
//!
//! [`FaultConfig`] turns individual defects on, so every harness failure
//! path can be demonstrated against a deliberately broken runtime:
//! ignoring the gate, misclassifying rejections, or lying about bundle
//! existence for selected (kernel, state) pairs.

use std::collections::BTreeMap;

use tracing::debug;

use kernelgate_core::{
    BundleState, CallableProfile, CapabilitySet, ErrorClass, ExistenceFacts, KernelId, Verdict,
    resolve,
};

use crate::device::Device;
use crate::runtime::{KernelRuntime, RuntimeError, SubmitOutcome};
use crate::shape::SubmissionShape;

// ---------------------------------------------------------------------------
// FaultConfig
// ---------------------------------------------------------------------------

/// Deliberate defects the reference runtime can simulate.
#[derive(Debug, Clone, Default)]
pub struct FaultConfig {
    /// Accept every submission, even when the gate requires rejection.
    pub ignore_capability_gate: bool,
    /// Reject with [`ErrorClass::RuntimeFailure`] instead of the required
    /// classification.
    pub misclassify_errors: bool,
    /// Force the batched query result for specific (kernel, state) pairs,
    /// overriding the registered facts for any query containing that
    /// kernel.
    pub existence_overrides: BTreeMap<(KernelId, BundleState), bool>,
    /// Invert the result of every multi-kernel query while answering
    /// single-kernel queries truthfully — the inconsistency a batched-query
    /// conformance check exists to catch.
    pub invert_batched_queries: bool,
}

impl FaultConfig {
    /// No faults: fully conformant behavior.
    pub fn none() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// ReferenceRuntime
// ---------------------------------------------------------------------------

/// Conformant in-memory runtime with optional fault injection.
#[derive(Debug, Default)]
pub struct ReferenceRuntime {
    facts: BTreeMap<String, ExistenceFacts>,
    sentinels: BTreeMap<(KernelId, SubmissionShape), u64>,
    faults: FaultConfig,
}

impl ReferenceRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// A runtime with the given deliberate defects.
    pub fn with_faults(faults: FaultConfig) -> Self {
        Self { faults, ..Self::default() }
    }

    /// Register the ground-truth existence facts for one device.
    pub fn register_facts(&mut self, device: &Device, facts: ExistenceFacts) {
        self.facts.insert(device.name().to_string(), facts);
    }

    fn facts_for(&self, device: &Device) -> Result<&ExistenceFacts, RuntimeError> {
        self.facts
            .get(device.name())
            .ok_or_else(|| RuntimeError::UnknownDevice(device.name().to_string()))
    }
}

impl KernelRuntime for ReferenceRuntime {
    fn device_capabilities(&self, device: &Device) -> CapabilitySet {
        device.capabilities().clone()
    }

    fn submit(
        &mut self,
        device: &Device,
        kernel: &KernelId,
        profile: &CallableProfile,
        shape: SubmissionShape,
    ) -> Result<SubmitOutcome, RuntimeError> {
        let requirement = profile.effective_requirement();
        let verdict = resolve(device.capabilities(), &requirement);
        debug!(%kernel, %shape, %verdict, device = %device.name(), "reference submit");

        let outcome = match verdict {
            Verdict::Reject(class) if !self.faults.ignore_capability_gate => {
                let reported = if self.faults.misclassify_errors {
                    ErrorClass::RuntimeFailure
                } else {
                    class
                };
                // Rejected before launch: no partial work is committed.
                SubmitOutcome::Rejected(reported)
            }
            _ => {
                *self.sentinels.entry((kernel.clone(), shape)).or_insert(0) += 1;
                SubmitOutcome::Completed
            }
        };
        Ok(outcome)
    }

    fn has_bundle(
        &self,
        device: &Device,
        state: BundleState,
        kernels: &[KernelId],
    ) -> Result<bool, RuntimeError> {
        let facts = self.facts_for(device)?;
        let mut result = true;
        for kernel in kernels {
            let fact = match self.faults.existence_overrides.get(&(kernel.clone(), state)) {
                Some(&forced) => forced,
                None => facts.fact(kernel, state),
            };
            result = result && fact;
        }
        if self.faults.invert_batched_queries && kernels.len() > 1 {
            result = !result;
        }
        Ok(result)
    }

    fn sentinel_count(&self, kernel: &KernelId, shape: SubmissionShape) -> u64 {
        self.sentinels.get(&(kernel.clone(), shape)).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kernelgate_core::Capability;
    use crate::device::Backend;

    fn device(caps: &[Capability]) -> Device {
        Device::new("dev0", Backend::Reference, caps.iter().copied().collect())
    }

    fn gated_profile(cap: Capability) -> CallableProfile {
        CallableProfile { declares: None, uses: Some(cap), callees: vec![] }
    }

    #[test]
    fn conformant_runtime_rejects_unsupported_use() {
        let mut rt = ReferenceRuntime::new();
        let dev = device(&[]);
        let kid = KernelId::new("k");
        let outcome = rt
            .submit(&dev, &kid, &gated_profile(Capability::Fp64), SubmissionShape::NoArg)
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(ErrorClass::KernelNotSupported));
        assert_eq!(rt.sentinel_count(&kid, SubmissionShape::NoArg), 0, "no partial work");
    }

    #[test]
    fn conformant_runtime_accepts_supported_use_once() {
        let mut rt = ReferenceRuntime::new();
        let dev = device(&[Capability::Fp64]);
        let kid = KernelId::new("k");
        let outcome = rt
            .submit(&dev, &kid, &gated_profile(Capability::Fp64), SubmissionShape::Functor)
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Completed);
        assert_eq!(rt.sentinel_count(&kid, SubmissionShape::Functor), 1);
        // A second submission commits a second sentinel.
        rt.submit(&dev, &kid, &gated_profile(Capability::Fp64), SubmissionShape::Functor)
            .unwrap();
        assert_eq!(rt.sentinel_count(&kid, SubmissionShape::Functor), 2);
    }

    #[test]
    fn sentinels_are_tracked_per_shape() {
        let mut rt = ReferenceRuntime::new();
        let dev = device(&[Capability::Fp16]);
        let kid = KernelId::new("k");
        rt.submit(&dev, &kid, &gated_profile(Capability::Fp16), SubmissionShape::NoArg).unwrap();
        assert_eq!(rt.sentinel_count(&kid, SubmissionShape::NoArg), 1);
        assert_eq!(rt.sentinel_count(&kid, SubmissionShape::ItemArg), 0);
    }

    #[test]
    fn gate_fault_accepts_everything() {
        let mut rt = ReferenceRuntime::with_faults(FaultConfig {
            ignore_capability_gate: true,
            ..FaultConfig::none()
        });
        let dev = device(&[]);
        let kid = KernelId::new("k");
        let outcome =
            rt.submit(&dev, &kid, &gated_profile(Capability::Fp64), SubmissionShape::NoArg);
        assert_eq!(outcome.unwrap(), SubmitOutcome::Completed);
        // The faulty acceptance also commits the side effect.
        assert_eq!(rt.sentinel_count(&kid, SubmissionShape::NoArg), 1);
    }

    #[test]
    fn misclassify_fault_changes_error_kind_only() {
        let mut rt = ReferenceRuntime::with_faults(FaultConfig {
            misclassify_errors: true,
            ..FaultConfig::none()
        });
        let dev = device(&[]);
        let kid = KernelId::new("k");
        let outcome = rt
            .submit(&dev, &kid, &gated_profile(Capability::Atomic64), SubmissionShape::NoArg)
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected(ErrorClass::RuntimeFailure));
    }

    #[test]
    fn bundle_query_folds_registered_facts() {
        let mut rt = ReferenceRuntime::new();
        let dev = device(&[]);
        let mut facts = ExistenceFacts::new();
        facts.set(KernelId::new("k1"), BundleState::Executable, true);
        facts.set(KernelId::new("k2"), BundleState::Executable, false);
        rt.register_facts(&dev, facts);

        assert!(rt.has_bundle(&dev, BundleState::Executable, &[KernelId::new("k1")]).unwrap());
        assert!(!rt
            .has_bundle(
                &dev,
                BundleState::Executable,
                &[KernelId::new("k1"), KernelId::new("k2")]
            )
            .unwrap());
    }

    #[test]
    fn bundle_query_unknown_device_is_an_error() {
        let rt = ReferenceRuntime::new();
        let dev = device(&[]);
        let err = rt.has_bundle(&dev, BundleState::Source, &[KernelId::new("k")]).unwrap_err();
        assert_eq!(err, RuntimeError::UnknownDevice("dev0".to_string()));
    }

    #[test]
    fn existence_override_fault_flips_single_pair() {
        let mut faults = FaultConfig::none();
        faults
            .existence_overrides
            .insert((KernelId::new("k1"), BundleState::Object), false);
        let mut rt = ReferenceRuntime::with_faults(faults);
        let dev = device(&[]);
        let mut facts = ExistenceFacts::new();
        facts.set_all_states(KernelId::new("k1"), true);
        rt.register_facts(&dev, facts);

        // Overridden state lies; the others still tell the truth.
        assert!(!rt.has_bundle(&dev, BundleState::Object, &[KernelId::new("k1")]).unwrap());
        assert!(rt.has_bundle(&dev, BundleState::Source, &[KernelId::new("k1")]).unwrap());
        assert!(rt.has_bundle(&dev, BundleState::Executable, &[KernelId::new("k1")]).unwrap());
    }

    #[test]
    fn invert_batched_fault_spares_single_kernel_queries() {
        let mut rt = ReferenceRuntime::with_faults(FaultConfig {
            invert_batched_queries: true,
            ..FaultConfig::none()
        });
        let dev = device(&[]);
        let mut facts = ExistenceFacts::new();
        facts.set(KernelId::new("k1"), BundleState::Executable, true);
        facts.set(KernelId::new("k2"), BundleState::Executable, true);
        rt.register_facts(&dev, facts);

        assert!(rt.has_bundle(&dev, BundleState::Executable, &[KernelId::new("k1")]).unwrap());
        // The pair query lies.
        assert!(!rt
            .has_bundle(
                &dev,
                BundleState::Executable,
                &[KernelId::new("k1"), KernelId::new("k2")]
            )
            .unwrap());
    }

    #[test]
    fn device_list_overload_is_any_device() {
        let mut rt = ReferenceRuntime::new();
        let dev_a = Device::new("a", Backend::Reference, CapabilitySet::empty());
        let dev_b = Device::new("b", Backend::Reference, CapabilitySet::empty());
        let kid = KernelId::new("k");

        let mut facts_a = ExistenceFacts::new();
        facts_a.set(kid.clone(), BundleState::Executable, false);
        rt.register_facts(&dev_a, facts_a);

        let mut facts_b = ExistenceFacts::new();
        facts_b.set(kid.clone(), BundleState::Executable, true);
        rt.register_facts(&dev_b, facts_b);

        let devices = [dev_a.clone(), dev_b.clone()];
        assert!(rt
            .has_bundle_for_devices(&devices, BundleState::Executable, &[kid.clone()])
            .unwrap());
        assert!(!rt
            .has_bundle_for_devices(&devices[..1], BundleState::Executable, &[kid])
            .unwrap());
    }
}
