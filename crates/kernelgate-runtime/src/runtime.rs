//! The runtime collaborator trait.
//!
//! [`KernelRuntime`] is the seam between the conformance harness and the
//! system under test. The harness treats every method as an opaque,
//! possibly slow call that completes before any comparison happens; the
//! only things it inspects are whether a submission raised a classified
//! error and what a batched existence query returned.

use kernelgate_core::{BundleState, CallableProfile, CapabilitySet, ErrorClass, KernelId};

use crate::device::Device;
use crate::shape::SubmissionShape;

/// Result of one kernel submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The submission ran to completion.
    Completed,
    /// The runtime raised exactly one classified error.
    Rejected(ErrorClass),
}

impl SubmitOutcome {
    pub fn is_completed(self) -> bool {
        matches!(self, SubmitOutcome::Completed)
    }
}

/// Errors a runtime may raise outside the conformance-visible outcome,
/// e.g. when the harness asks about a kernel that was never registered.
/// These are harness bugs or setup failures, never conformance verdicts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown kernel {0}")]
    UnknownKernel(KernelId),
    #[error("unknown device {0:?}")]
    UnknownDevice(String),
}

/// The surface of the system under test.
pub trait KernelRuntime {
    /// The capability set the runtime reports for `device`. Read-only.
    fn device_capabilities(&self, device: &Device) -> CapabilitySet;

    /// Submit one kernel through one shape. Exactly one submission per
    /// call; the outcome is either normal completion or a single
    /// classified error.
    fn submit(
        &mut self,
        device: &Device,
        kernel: &KernelId,
        profile: &CallableProfile,
        shape: SubmissionShape,
    ) -> Result<SubmitOutcome, RuntimeError>;

    /// Batched existence query: does a compiled bundle in `state` covering
    /// every kernel in `kernels` exist for `device`?
    fn has_bundle(
        &self,
        device: &Device,
        state: BundleState,
        kernels: &[KernelId],
    ) -> Result<bool, RuntimeError>;

    /// Batched existence query keyed by an explicit device list: `true`
    /// when at least one listed device can obtain every kernel in
    /// `kernels` in `state`.
    fn has_bundle_for_devices(
        &self,
        devices: &[Device],
        state: BundleState,
        kernels: &[KernelId],
    ) -> Result<bool, RuntimeError> {
        for device in devices {
            if self.has_bundle(device, state, kernels)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// How many times the sentinel side effect of `kernel` has been
    /// committed through `shape`. Used by the exerciser to check that an
    /// accepted submission ran exactly once and a rejected one committed
    /// no partial work.
    fn sentinel_count(&self, kernel: &KernelId, shape: SubmissionShape) -> u64;
}
