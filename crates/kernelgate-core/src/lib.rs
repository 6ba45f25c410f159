//! Pure decision engines for the kernelgate conformance suite.
//!
//! Two engines live here, both side-effect-free functions over immutable
//! inputs:
//!
//! - the **capability compatibility resolver** ([`resolve`]): given the
//!   capability set a device supports and the effective requirement of a
//!   callable, predict whether a submission must be accepted or rejected,
//!   and with which error classification;
//! - the **bundle-existence aggregator** ([`ExistenceFacts::aggregate`]):
//!   fold per-kernel ground-truth existence facts into the expected result
//!   of a batched "does a bundle covering these kernels exist" query.
//!
//! Neither engine performs I/O or touches the runtime under test; the
//! comparison harnesses in `kernelgate-harness` compute an expectation here
//! first and only then exercise the real runtime surface.

pub mod bundle;
pub mod capability;
pub mod declaration;
pub mod mismatch;
pub mod resolver;

pub use bundle::{BundleState, ExistenceFacts, KernelId, non_empty_subsets};
pub use capability::{Capability, CapabilitySet, ParseCapabilityError};
pub use declaration::{CallEdge, CallableProfile, EffectiveRequirement, Linkage};
pub use mismatch::Mismatch;
pub use resolver::{ErrorClass, RejectReason, Verdict, reject_reason, resolve};
