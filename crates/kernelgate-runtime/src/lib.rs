//! Runtime-facing surface for the kernelgate conformance suite.
//!
//! The engines in `kernelgate-core` are pure; everything that talks to a
//! real (or simulated) runtime lives here: the device model, the submission
//! shapes a runtime exposes, the [`KernelRuntime`] collaborator trait, and
//! an in-memory reference implementation with fault-injection knobs so the
//! harness's failure paths can be tested without a non-conformant vendor
//! runtime on hand.

pub mod device;
pub mod reference;
pub mod runtime;
pub mod shape;

pub use device::{Backend, Device, ParseBackendError};
pub use reference::{FaultConfig, ReferenceRuntime};
pub use runtime::{KernelRuntime, RuntimeError, SubmitOutcome};
pub use shape::SubmissionShape;
