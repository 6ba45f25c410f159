//! Conformance-failure taxonomy.
//!
//! Every disagreement between a predicted verdict and observed runtime
//! behavior is one of these variants. There is no recovery path: a mismatch
//! terminates its scenario with a failure record. The engines themselves
//! never raise — they return comparison results for the harness to assert
//! on.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bundle::{BundleState, KernelId};
use crate::resolver::ErrorClass;

/// A conformance violation observed by the harness.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum Mismatch {
    /// The runtime rejected a submission the resolver predicted should
    /// succeed.
    #[error("expected accept but runtime rejected with {actual}")]
    ExpectedAcceptGotReject {
        /// Classification the runtime reported.
        actual: ErrorClass,
    },

    /// The runtime silently accepted an unsupported-feature submission:
    /// a capability-gating defect in the system under test.
    #[error("expected reject({expected}) but runtime accepted the submission")]
    ExpectedRejectGotAccept {
        /// Classification the runtime was required to raise.
        expected: ErrorClass,
    },

    /// The runtime rejected, but with a classification other than the
    /// single expected kind.
    #[error("runtime rejected with {actual}, expected {expected}")]
    WrongErrorKind { expected: ErrorClass, actual: ErrorClass },

    /// A batched existence query disagreed with the folded per-kernel
    /// facts.
    #[error(
        "bundle existence mismatch in state {state} for {subset:?}: \
         expected {expected}, runtime reported {actual}"
    )]
    AggregateMismatch {
        state: BundleState,
        subset: Vec<KernelId>,
        expected: bool,
        actual: bool,
    },
}
