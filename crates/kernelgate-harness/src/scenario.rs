//! Table-driven scenario catalog.
//!
//! The original suite generated its capability test cases by instantiating
//! attribute-decorated templates over (type, capability) pairs. Here the
//! same cross product is a static table: each [`Scenario`] states where
//! declarations sit, where the feature is used, and what kind of callee is
//! in the chain; [`Scenario::profile`] expands one entry for a concrete
//! capability, and the runner iterates entries × capabilities × shapes.

use kernelgate_core::{CallEdge, CallableProfile, Capability, CapabilitySet, Linkage, Verdict, resolve};

// ---------------------------------------------------------------------------
// Table vocabulary
// ---------------------------------------------------------------------------

/// Which capability a declaration names, relative to the tested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclChoice {
    /// No declaration.
    None,
    /// Declares the tested capability.
    Tested,
    /// Declares the paired "other" capability.
    Other,
}

impl DeclChoice {
    fn expand(self, tested: Capability) -> Option<Capability> {
        match self {
            DeclChoice::None => None,
            DeclChoice::Tested => Some(tested),
            DeclChoice::Other => Some(tested.paired_other()),
        }
    }
}

/// What sits at the far end of the kernel's call edge, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalleeKind {
    /// The kernel body calls nothing.
    None,
    /// A callee in the same translation unit.
    Internal,
    /// A separately compiled, externally linked callee.
    External,
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

/// One row of the catalog: a capability/declaration shape to exercise.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Stable scenario name, unique within the catalog.
    pub name: &'static str,
    /// Grouping tag consulted by the skip matrix.
    pub tag: &'static str,
    /// Declaration on the kernel body itself.
    pub kernel_declares: DeclChoice,
    /// Whether the kernel body exercises the tested feature directly.
    pub kernel_uses: bool,
    /// Callee reachable from the kernel body.
    pub callee: CalleeKind,
    /// Declaration on the callee.
    pub callee_declares: DeclChoice,
    /// Whether the callee exercises the tested feature.
    pub callee_uses: bool,
}

impl Scenario {
    /// Expand this row into a concrete callable profile for `tested`.
    pub fn profile(&self, tested: Capability) -> CallableProfile {
        let callees = match self.callee {
            CalleeKind::None => vec![],
            CalleeKind::Internal | CalleeKind::External => {
                let linkage = if self.callee == CalleeKind::External {
                    Linkage::External
                } else {
                    Linkage::Internal
                };
                vec![CallEdge {
                    linkage,
                    declares: self.callee_declares.expand(tested),
                    uses: self.callee_uses.then_some(tested),
                }]
            }
        };
        CallableProfile {
            declares: self.kernel_declares.expand(tested),
            uses: self.kernel_uses.then_some(tested),
            callees,
        }
    }

    /// The verdict the runtime must produce for this scenario on a device
    /// with the given capability set.
    pub fn expected(&self, device_supports: &CapabilitySet, tested: Capability) -> Verdict {
        resolve(device_supports, &self.profile(tested).effective_requirement())
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The eight capability-gating shapes of the original suite, one row each.
pub fn catalog() -> &'static [Scenario] {
    const CATALOG: &[Scenario] = &[
        // Kernel uses the feature with no declaration anywhere.
        Scenario {
            name: "use_no_declaration",
            tag: "kernel_features",
            kernel_declares: DeclChoice::None,
            kernel_uses: true,
            callee: CalleeKind::None,
            callee_declares: DeclChoice::None,
            callee_uses: false,
        },
        // Kernel calls an undecorated internal function that uses the
        // feature; neither is decorated.
        Scenario {
            name: "undecorated_callee_uses",
            tag: "kernel_features",
            kernel_declares: DeclChoice::None,
            kernel_uses: false,
            callee: CalleeKind::Internal,
            callee_declares: DeclChoice::None,
            callee_uses: true,
        },
        // Undecorated kernel calls a decorated externally linked function
        // that uses the feature.
        Scenario {
            name: "decorated_external_callee_uses",
            tag: "kernel_features",
            kernel_declares: DeclChoice::None,
            kernel_uses: false,
            callee: CalleeKind::External,
            callee_declares: DeclChoice::Tested,
            callee_uses: true,
        },
        // Kernel is decorated but neither it nor its dummy callee uses the
        // feature: the declaration alone must gate.
        Scenario {
            name: "decorated_kernel_dummy_callee",
            tag: "kernel_features",
            kernel_declares: DeclChoice::Tested,
            kernel_uses: false,
            callee: CalleeKind::Internal,
            callee_declares: DeclChoice::None,
            callee_uses: false,
        },
        // Undecorated kernel calls a decorated callee; nobody uses the
        // feature.
        Scenario {
            name: "decorated_dummy_callee",
            tag: "kernel_features",
            kernel_declares: DeclChoice::None,
            kernel_uses: false,
            callee: CalleeKind::Internal,
            callee_declares: DeclChoice::Tested,
            callee_uses: false,
        },
        // Undecorated kernel calls a decorated callee that uses the
        // feature.
        Scenario {
            name: "decorated_callee_uses",
            tag: "kernel_features",
            kernel_declares: DeclChoice::None,
            kernel_uses: false,
            callee: CalleeKind::Internal,
            callee_declares: DeclChoice::Tested,
            callee_uses: true,
        },
        // Kernel uses the tested feature but is decorated for another one:
        // the mismatched declaration protects nothing.
        Scenario {
            name: "decorated_for_other_feature",
            tag: "kernel_features",
            kernel_declares: DeclChoice::Other,
            kernel_uses: true,
            callee: CalleeKind::None,
            callee_declares: DeclChoice::None,
            callee_uses: false,
        },
        // Kernel decorated for another feature calls a decorated external
        // callee that uses the tested one.
        Scenario {
            name: "decorated_other_with_decorated_external_callee",
            tag: "kernel_features",
            kernel_declares: DeclChoice::Other,
            kernel_uses: false,
            callee: CalleeKind::External,
            callee_declares: DeclChoice::Tested,
            callee_uses: true,
        },
    ];
    CATALOG
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
