//! Callable profiles and effective-requirement resolution.
//!
//! A callable unit (a kernel body, or a function it calls) may *declare* a
//! capability requirement, *use* a capability-gated operation, both, or
//! neither. Declarations and uses compose along the call graph: the kernel's
//! effective requirement is the union of its own declaration/use and those
//! reachable through its callees. A callee compiled in another translation
//! unit and reached through external linkage contributes exactly like an
//! internal one; linkage is carried on the edge only so scenarios can state
//! which boundary they exercise.

use crate::capability::{Capability, CapabilitySet};

// ---------------------------------------------------------------------------
// CallEdge
// ---------------------------------------------------------------------------

/// Linkage of a callee reachable from a kernel body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    /// Same translation unit as the kernel.
    Internal,
    /// Separately compiled, externally linked.
    External,
}

/// One call-graph edge from a kernel body to a callee, annotated with the
/// callee's own declaration and use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEdge {
    pub linkage: Linkage,
    /// Capability the callee declares, if any.
    pub declares: Option<Capability>,
    /// Capability the callee actually exercises, if any.
    pub uses: Option<Capability>,
}

impl CallEdge {
    /// A callee that neither declares nor uses anything ("dummy" body).
    pub fn dummy(linkage: Linkage) -> Self {
        Self { linkage, declares: None, uses: None }
    }
}

// ---------------------------------------------------------------------------
// CallableProfile
// ---------------------------------------------------------------------------

/// The capability-relevant facts about one logical kernel: its own
/// declaration and use, plus the callees reachable from its body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallableProfile {
    /// Capability declared on the kernel body itself, if any.
    pub declares: Option<Capability>,
    /// Capability the kernel body exercises directly, if any.
    pub uses: Option<Capability>,
    /// Callees reachable from the kernel body.
    pub callees: Vec<CallEdge>,
}

impl CallableProfile {
    /// A kernel that neither declares nor uses anything and calls nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve the call graph into the flat requirement the resolver
    /// consumes. Declarations and uses are unioned across the kernel body
    /// and every reachable callee, regardless of linkage.
    pub fn effective_requirement(&self) -> EffectiveRequirement {
        let declared = self
            .declares
            .into_iter()
            .chain(self.callees.iter().filter_map(|e| e.declares))
            .collect();
        let used = self
            .uses
            .into_iter()
            .chain(self.callees.iter().filter_map(|e| e.uses))
            .collect();
        EffectiveRequirement { declared, used }
    }
}

// ---------------------------------------------------------------------------
// EffectiveRequirement
// ---------------------------------------------------------------------------

/// The resolved requirement of a callable: everything declared anywhere in
/// its reachable call chain, and everything actually used there.
///
/// A capability in `used` but not in `declared` is the violating
/// "uses without declaration" case; the two sets are kept separate because
/// the resolver classifies them differently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveRequirement {
    /// Capabilities declared on the kernel or any reachable callee.
    pub declared: CapabilitySet,
    /// Capabilities exercised by the kernel or any reachable callee.
    pub used: CapabilitySet,
}

impl EffectiveRequirement {
    /// Returns `true` when the callable neither declares nor uses any
    /// tracked capability.
    pub fn is_unconstrained(&self) -> bool {
        self.declared.is_empty() && self.used.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
