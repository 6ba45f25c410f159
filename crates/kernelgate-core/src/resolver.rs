//! Capability compatibility resolver.
//!
//! Given the capability set a device supports and the effective requirement
//! of a callable, [`resolve`] predicts the outcome the runtime is required
//! to produce for a submission of that callable:
//!
//! - no declaration and no use anywhere in the call chain: accept;
//! - a capability is *declared* (on the kernel or any reachable callee,
//!   internal or external) but the device lacks it: reject, whether or not
//!   the capability is actually exercised — a declaration is a contractual
//!   requirement on its own;
//! - a capability is *used* without any reachable declaration naming it:
//!   reject exactly when the device lacks it — declarations are optional
//!   when the device happens to satisfy the need;
//! - declared for one feature while using another: the declaration gives no
//!   protection for the used feature, so the used feature's support decides
//!   (and the mismatched declaration still imposes its own requirement).
//!
//! Every rejection collapses to the single conformance-visible
//! classification [`ErrorClass::KernelNotSupported`]; the finer-grained
//! [`RejectReason`] exists only for diagnostics, never to vary the
//! reported error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilitySet};
use crate::declaration::EffectiveRequirement;

// ---------------------------------------------------------------------------
// ErrorClass
// ---------------------------------------------------------------------------

/// Classification of a rejected submission as reported by the runtime.
///
/// Conformant capability-gate rejections always carry
/// [`ErrorClass::KernelNotSupported`]; the other variants exist so the
/// harness can detect a runtime that rejects with the wrong class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorClass {
    /// The kernel requires a feature the device does not support.
    KernelNotSupported,
    /// An argument or configuration of the submission was invalid.
    InvalidParameter,
    /// A generic runtime failure unrelated to capability gating.
    RuntimeFailure,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorClass::KernelNotSupported => write!(f, "kernel_not_supported"),
            ErrorClass::InvalidParameter => write!(f, "invalid_parameter"),
            ErrorClass::RuntimeFailure => write!(f, "runtime_failure"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Expected outcome of a capability-gated submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The submission must complete normally.
    Accept,
    /// The submission must raise exactly one error of the given class.
    Reject(ErrorClass),
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        matches!(self, Verdict::Accept)
    }

    pub fn is_reject(self) -> bool {
        !self.is_accept()
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => write!(f, "accept"),
            Verdict::Reject(class) => write!(f, "reject({class})"),
        }
    }
}

// ---------------------------------------------------------------------------
// RejectReason
// ---------------------------------------------------------------------------

/// Why a submission must be rejected. Diagnostic only: every reason maps to
/// [`ErrorClass::KernelNotSupported`] at the conformance surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A declared capability (anywhere in the call chain) is unsupported.
    DeclaredUnsupported(Capability),
    /// A capability is used without any reachable declaration and the
    /// device does not support it.
    UndeclaredUseUnsupported(Capability),
}

impl RejectReason {
    /// The externally observable classification for this reason.
    pub fn error_class(self) -> ErrorClass {
        ErrorClass::KernelNotSupported
    }

    /// The capability whose absence triggered the rejection.
    pub fn capability(self) -> Capability {
        match self {
            RejectReason::DeclaredUnsupported(c) => c,
            RejectReason::UndeclaredUseUnsupported(c) => c,
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::DeclaredUnsupported(c) => {
                write!(f, "declared capability {c} unsupported by device")
            }
            RejectReason::UndeclaredUseUnsupported(c) => {
                write!(f, "capability {c} used without declaration and unsupported by device")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// resolve
// ---------------------------------------------------------------------------

/// Find the first reason the submission must be rejected, if any.
///
/// Declared-but-unsupported takes precedence over undeclared-use so that
/// the diagnostic names the contractual violation first; the precedence has
/// no conformance-visible effect since both collapse to the same class.
/// Iteration order over the requirement sets is canonical, so the result is
/// deterministic for identical inputs.
pub fn reject_reason(
    device_supports: &CapabilitySet,
    requirement: &EffectiveRequirement,
) -> Option<RejectReason> {
    for cap in requirement.declared.iter() {
        if !device_supports.supports(cap) {
            return Some(RejectReason::DeclaredUnsupported(cap));
        }
    }
    for cap in requirement.used.iter() {
        if !device_supports.supports(cap) {
            return Some(RejectReason::UndeclaredUseUnsupported(cap));
        }
    }
    None
}

/// Predict the accept/reject verdict for one kernel submission.
///
/// Pure and idempotent: identical inputs always yield identical verdicts.
pub fn resolve(device_supports: &CapabilitySet, requirement: &EffectiveRequirement) -> Verdict {
    match reject_reason(device_supports, requirement) {
        Some(reason) => Verdict::Reject(reason.error_class()),
        None => Verdict::Accept,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
