//! Kernel identities, bundle states, and the bundle-existence aggregator.
//!
//! The ground truth is a set of per-kernel facts: "a compiled artifact for
//! this kernel in this state is obtainable for this device". The aggregator
//! folds those facts with logical AND to predict the result of a batched
//! existence query over an arbitrary kernel subset — a bundle covering a
//! set of kernels exists exactly when every member kernel is individually
//! obtainable; there is no partial-bundle semantics.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// KernelId
// ---------------------------------------------------------------------------

/// Stable token identifying one compiled kernel, independent of which
/// device or backend compiled it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KernelId(String);

impl KernelId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KernelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for KernelId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ---------------------------------------------------------------------------
// BundleState
// ---------------------------------------------------------------------------

/// Readiness stage of a kernel bundle, ordered by how much compilation work
/// has been done. Existence in one state never implies existence in any
/// other unless explicitly derived.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BundleState {
    /// Source form is available.
    Source,
    /// Intermediate object form is available.
    Object,
    /// Fully linked, directly executable form is available.
    Executable,
}

impl BundleState {
    /// All bundle states, in readiness order.
    pub const ALL: &'static [BundleState] =
        &[BundleState::Source, BundleState::Object, BundleState::Executable];
}

impl fmt::Display for BundleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BundleState::Source => write!(f, "source"),
            BundleState::Object => write!(f, "object"),
            BundleState::Executable => write!(f, "executable"),
        }
    }
}

// ---------------------------------------------------------------------------
// ExistenceFacts
// ---------------------------------------------------------------------------

/// Ground-truth existence facts for one device: (kernel, state) → bool.
///
/// The aggregator only reads these; a missing entry reads as `false`, the
/// same default the runtime reports for a kernel it cannot obtain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistenceFacts {
    facts: BTreeMap<(KernelId, BundleState), bool>,
}

impl ExistenceFacts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the ground-truth fact for one (kernel, state) pair.
    pub fn set(&mut self, kernel: KernelId, state: BundleState, obtainable: bool) {
        self.facts.insert((kernel, state), obtainable);
    }

    /// Record the same fact for a kernel in every bundle state.
    pub fn set_all_states(&mut self, kernel: KernelId, obtainable: bool) {
        for &state in BundleState::ALL {
            self.set(kernel.clone(), state, obtainable);
        }
    }

    /// The per-kernel ground truth; absent entries read as `false`.
    pub fn fact(&self, kernel: &KernelId, state: BundleState) -> bool {
        self.facts.get(&(kernel.clone(), state)).copied().unwrap_or(false)
    }

    /// Expected result of a batched existence query over `kernels` in
    /// `state`: the AND-fold of the per-kernel facts.
    ///
    /// The fold is associative and commutative, so the result is
    /// independent of grouping and ordering of `kernels`. An empty slice
    /// folds to `true` (the AND identity); the harness only exercises
    /// non-empty subsets.
    pub fn aggregate(&self, state: BundleState, kernels: &[KernelId]) -> bool {
        kernels.iter().all(|k| self.fact(k, state))
    }

    /// Number of recorded facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Subset enumeration
// ---------------------------------------------------------------------------

/// Enumerate every non-empty subset of `kernels`, in ascending-bitmask
/// order over the input ordering (singletons first among equal sizes is
/// *not* guaranteed; the order is deterministic, nothing more).
///
/// Intended for the small kernel counts the harness exercises; callers
/// with more than ~16 kernels should enumerate incrementally instead.
pub fn non_empty_subsets(kernels: &[KernelId]) -> Vec<Vec<KernelId>> {
    let n = kernels.len();
    let mut subsets = Vec::with_capacity((1usize << n).saturating_sub(1));
    for mask in 1u32..(1u32 << n) {
        let subset = kernels
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, k)| k.clone())
            .collect();
        subsets.push(subset);
    }
    subsets
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn kid(name: &str) -> KernelId {
        KernelId::new(name)
    }

    #[test]
    fn bundle_state_ordering_follows_readiness() {
        assert!(BundleState::Source < BundleState::Object);
        assert!(BundleState::Object < BundleState::Executable);
    }

    #[test]
    fn bundle_state_all_has_3_variants() {
        assert_eq!(BundleState::ALL.len(), 3);
    }

    #[test]
    fn bundle_state_display() {
        assert_eq!(BundleState::Source.to_string(), "source");
        assert_eq!(BundleState::Object.to_string(), "object");
        assert_eq!(BundleState::Executable.to_string(), "executable");
    }

    #[test]
    fn missing_fact_reads_false() {
        let facts = ExistenceFacts::new();
        assert!(!facts.fact(&kid("k1"), BundleState::Executable));
    }

    #[test]
    fn single_kernel_aggregate_is_the_fact() {
        let mut facts = ExistenceFacts::new();
        facts.set(kid("k1"), BundleState::Object, true);
        assert!(facts.aggregate(BundleState::Object, &[kid("k1")]));
        assert!(!facts.aggregate(BundleState::Source, &[kid("k1")]));
    }

    #[test]
    fn facts_are_per_state() {
        // Existence in one state must not leak into another.
        let mut facts = ExistenceFacts::new();
        facts.set(kid("k1"), BundleState::Source, true);
        assert!(facts.fact(&kid("k1"), BundleState::Source));
        assert!(!facts.fact(&kid("k1"), BundleState::Object));
        assert!(!facts.fact(&kid("k1"), BundleState::Executable));
    }

    #[test]
    fn multi_kernel_aggregate_is_and_fold() {
        let mut facts = ExistenceFacts::new();
        facts.set(kid("k1"), BundleState::Executable, true);
        facts.set(kid("k2"), BundleState::Executable, true);
        facts.set(kid("k3"), BundleState::Executable, false);

        assert!(facts.aggregate(BundleState::Executable, &[kid("k1"), kid("k2")]));
        assert!(!facts.aggregate(BundleState::Executable, &[kid("k1"), kid("k3")]));
        assert!(!facts.aggregate(BundleState::Executable, &[kid("k1"), kid("k2"), kid("k3")]));
    }

    #[test]
    fn aggregate_is_order_independent() {
        let mut facts = ExistenceFacts::new();
        facts.set(kid("a"), BundleState::Object, true);
        facts.set(kid("b"), BundleState::Object, false);
        assert_eq!(
            facts.aggregate(BundleState::Object, &[kid("a"), kid("b")]),
            facts.aggregate(BundleState::Object, &[kid("b"), kid("a")]),
        );
    }

    #[test]
    fn aggregate_grouping_identity() {
        // aggregate({A,B,C}) == aggregate({A,B}) && fact(C)
        let mut facts = ExistenceFacts::new();
        facts.set(kid("a"), BundleState::Executable, true);
        facts.set(kid("b"), BundleState::Executable, true);
        facts.set(kid("c"), BundleState::Executable, false);

        let whole = facts.aggregate(BundleState::Executable, &[kid("a"), kid("b"), kid("c")]);
        let grouped = facts.aggregate(BundleState::Executable, &[kid("a"), kid("b")])
            && facts.fact(&kid("c"), BundleState::Executable);
        assert_eq!(whole, grouped);
    }

    #[test]
    fn set_all_states_covers_every_state() {
        let mut facts = ExistenceFacts::new();
        facts.set_all_states(kid("k"), true);
        for &state in BundleState::ALL {
            assert!(facts.fact(&kid("k"), state));
        }
        assert_eq!(facts.len(), 3);
    }

    #[test]
    fn non_empty_subsets_count() {
        let ids = [kid("a"), kid("b"), kid("c")];
        let subsets = non_empty_subsets(&ids);
        assert_eq!(subsets.len(), 7);
        assert!(subsets.iter().all(|s| !s.is_empty()));
    }

    #[test]
    fn non_empty_subsets_are_distinct_and_deterministic() {
        let ids = [kid("a"), kid("b"), kid("c")];
        let first = non_empty_subsets(&ids);
        let second = non_empty_subsets(&ids);
        assert_eq!(first, second);
        let unique: std::collections::BTreeSet<_> = first.iter().collect();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn non_empty_subsets_of_empty_input() {
        assert!(non_empty_subsets(&[]).is_empty());
    }

    #[test]
    fn kernel_id_display_and_from() {
        let id: KernelId = "kernel_cpu".into();
        assert_eq!(id.to_string(), "kernel_cpu");
        assert_eq!(id.as_str(), "kernel_cpu");
    }
}
