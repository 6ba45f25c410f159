//! Submission-shape exerciser.
//!
//! Drives one logical kernel through every submission shape the runtime
//! exposes and checks each shape independently against the resolver's
//! verdict. A pass on one shape is never taken as evidence about another;
//! the result is one observation per shape.
//!
//! Exactly one submission is issued per shape. On an expected rejection
//! the runtime must raise the single classified error and commit no
//! observable partial work; on an expected acceptance the submission must
//! complete with the sentinel side effect committed exactly once.

use std::fmt;

use tracing::debug;

use kernelgate_core::{Capability, KernelId, Mismatch, Verdict};
use kernelgate_runtime::{Device, KernelRuntime, RuntimeError, SubmissionShape, SubmitOutcome};

use crate::scenario::Scenario;

// ---------------------------------------------------------------------------
// CheckFailure
// ---------------------------------------------------------------------------

/// Why one shape observation failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckFailure {
    /// The runtime's outcome disagreed with the predicted verdict.
    #[error(transparent)]
    Mismatch(#[from] Mismatch),

    /// The outcome agreed but the sentinel side effect ran the wrong
    /// number of times (partial work on reject, or not-exactly-once on
    /// accept).
    #[error("sentinel side effect ran {actual} times, expected {expected}")]
    SentinelCount { expected: u64, actual: u64 },

    /// The runtime raised a setup error unrelated to conformance.
    #[error("runtime setup error: {0}")]
    Setup(#[from] RuntimeError),
}

// ---------------------------------------------------------------------------
// ShapeObservation
// ---------------------------------------------------------------------------

/// One conformance observation: a single shape of a single scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeObservation {
    pub shape: SubmissionShape,
    pub expected: Verdict,
    pub result: Result<(), CheckFailure>,
}

impl ShapeObservation {
    pub fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

impl fmt::Display for ShapeObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            Ok(()) => write!(f, "{}: pass (expected {})", self.shape, self.expected),
            Err(failure) => write!(f, "{}: FAIL — {failure}", self.shape),
        }
    }
}

// ---------------------------------------------------------------------------
// exercise
// ---------------------------------------------------------------------------

/// Compare one submission outcome against the predicted verdict.
fn check_outcome(expected: Verdict, outcome: SubmitOutcome) -> Result<(), Mismatch> {
    match (expected, outcome) {
        (Verdict::Accept, SubmitOutcome::Completed) => Ok(()),
        (Verdict::Accept, SubmitOutcome::Rejected(actual)) => {
            Err(Mismatch::ExpectedAcceptGotReject { actual })
        }
        (Verdict::Reject(expected), SubmitOutcome::Completed) => {
            Err(Mismatch::ExpectedRejectGotAccept { expected })
        }
        (Verdict::Reject(expected), SubmitOutcome::Rejected(actual)) => {
            if expected == actual {
                Ok(())
            } else {
                Err(Mismatch::WrongErrorKind { expected, actual })
            }
        }
    }
}

/// Sentinel commits an accepted submission must add; a rejection must add
/// none.
fn expected_sentinel_delta(expected: Verdict) -> u64 {
    match expected {
        Verdict::Accept => 1,
        Verdict::Reject(_) => 0,
    }
}

/// Drive `scenario`, expanded for `tested`, through every submission shape
/// on `device`, and return one observation per shape.
///
/// The expectation is computed from the pure resolver *before* the runtime
/// is touched; each shape then gets exactly one real submission.
pub fn exercise_scenario<R: KernelRuntime>(
    runtime: &mut R,
    device: &Device,
    scenario: &Scenario,
    tested: Capability,
) -> Vec<ShapeObservation> {
    let device_caps = runtime.device_capabilities(device);
    let expected = scenario.expected(&device_caps, tested);
    let profile = scenario.profile(tested);
    debug!(scenario = scenario.name, %tested, %expected, "exercising scenario");

    SubmissionShape::ALL
        .iter()
        .map(|&shape| {
            let kernel = KernelId::new(format!("{}_{tested}_{shape}", scenario.name));
            let before = runtime.sentinel_count(&kernel, shape);
            let result = runtime
                .submit(device, &kernel, &profile, shape)
                .map_err(CheckFailure::from)
                .and_then(|outcome| {
                    check_outcome(expected, outcome).map_err(CheckFailure::from)
                })
                .and_then(|()| {
                    let delta = runtime.sentinel_count(&kernel, shape) - before;
                    let wanted = expected_sentinel_delta(expected);
                    if delta == wanted {
                        Ok(())
                    } else {
                        Err(CheckFailure::SentinelCount { expected: wanted, actual: delta })
                    }
                });
            ShapeObservation { shape, expected, result }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
