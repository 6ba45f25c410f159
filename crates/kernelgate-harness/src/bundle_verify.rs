//! Bundle query verifier.
//!
//! Follows the original suite's recipe: ask the runtime about every kernel
//! individually, fold those single-kernel answers with the aggregator, and
//! compare against the batched query for every non-empty kernel subset.
//! Each bundle state is verified independently — the result for one state
//! is never inferred from another's.

use tracing::debug;

use kernelgate_core::{BundleState, ExistenceFacts, KernelId, Mismatch, non_empty_subsets};
use kernelgate_runtime::{Device, KernelRuntime, RuntimeError};

/// Gather per-kernel ground truth through single-kernel queries.
///
/// These answers *are* the facts the aggregator folds; the batched query is
/// then required to agree with the fold. Gathering must happen before any
/// combinatorics.
pub fn gather_facts<R: KernelRuntime>(
    runtime: &R,
    device: &Device,
    kernels: &[KernelId],
) -> Result<ExistenceFacts, RuntimeError> {
    let mut facts = ExistenceFacts::new();
    for kernel in kernels {
        for &state in BundleState::ALL {
            let fact = runtime.has_bundle(device, state, std::slice::from_ref(kernel))?;
            facts.set(kernel.clone(), state, fact);
        }
    }
    Ok(facts)
}

/// Verify the batched query against the folded facts for one state and one
/// kernel subset.
pub fn verify_subset<R: KernelRuntime>(
    runtime: &R,
    device: &Device,
    facts: &ExistenceFacts,
    state: BundleState,
    subset: &[KernelId],
) -> Result<Result<(), Mismatch>, RuntimeError> {
    let expected = facts.aggregate(state, subset);
    let actual = runtime.has_bundle(device, state, subset)?;
    debug!(%state, ?subset, expected, actual, "bundle subset check");
    if expected == actual {
        Ok(Ok(()))
    } else {
        Ok(Err(Mismatch::AggregateMismatch {
            state,
            subset: subset.to_vec(),
            expected,
            actual,
        }))
    }
}

/// Verify every non-empty subset of `kernels` in one state, returning the
/// mismatches found.
pub fn verify_state<R: KernelRuntime>(
    runtime: &R,
    device: &Device,
    facts: &ExistenceFacts,
    state: BundleState,
    kernels: &[KernelId],
) -> Result<Vec<Mismatch>, RuntimeError> {
    let mut mismatches = Vec::new();
    for subset in non_empty_subsets(kernels) {
        if let Err(mismatch) = verify_subset(runtime, device, facts, state, &subset)? {
            mismatches.push(mismatch);
        }
    }
    Ok(mismatches)
}

/// Verify every bundle state independently over every non-empty subset of
/// `kernels`. Facts are gathered once up front via single-kernel queries.
pub fn verify_all_states<R: KernelRuntime>(
    runtime: &R,
    device: &Device,
    kernels: &[KernelId],
) -> Result<Vec<Mismatch>, RuntimeError> {
    let facts = gather_facts(runtime, device, kernels)?;
    let mut mismatches = Vec::new();
    for &state in BundleState::ALL {
        mismatches.extend(verify_state(runtime, device, &facts, state, kernels)?);
    }
    Ok(mismatches)
}
