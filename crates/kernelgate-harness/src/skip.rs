//! Backend skip matrix.
//!
//! Some backends are known not to implement parts of the submission
//! contract; the original suite disabled the affected test cases per
//! backend with macros. Here the same knowledge is a data table the runner
//! consults before exercising a scenario. Skipping is reporting policy
//! only — it never feeds into the decision engines.

use kernelgate_runtime::Backend;

/// One known-nonconformant (backend, scenario tag) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipEntry {
    pub backend: Backend,
    pub tag: &'static str,
    pub reason: &'static str,
}

/// Table of scenarios to skip per backend.
#[derive(Debug, Clone, Default)]
pub struct SkipMatrix {
    entries: Vec<SkipEntry>,
}

impl SkipMatrix {
    /// An empty matrix: nothing is skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shipped defect list: backends that do not yet raise the
    /// capability-gate error classification.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                SkipEntry {
                    backend: Backend::Hip,
                    tag: "kernel_features",
                    reason: "capability-gate errors not raised by this backend",
                },
                SkipEntry {
                    backend: Backend::OpenCl,
                    tag: "kernel_features",
                    reason: "capability declarations ignored at submission time",
                },
            ],
        }
    }

    /// Add an entry.
    pub fn add(&mut self, entry: SkipEntry) {
        self.entries.push(entry);
    }

    /// Reason to skip `tag` on `backend`, if any.
    pub fn should_skip(&self, backend: Backend, tag: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|e| e.backend == backend && e.tag == tag)
            .map(|e| e.reason)
    }

    pub fn entries(&self) -> &[SkipEntry] {
        &self.entries
    }
}
