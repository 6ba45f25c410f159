//! Submission shapes.
//!
//! A runtime exposes several syntactically distinct ways to submit the same
//! logical kernel. Conformance must be observed per shape: a pass on one
//! shape predicts nothing about another, so the exerciser drives each one
//! independently.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One way of handing a kernel body to the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionShape {
    /// Free-standing callable with no arguments.
    NoArg,
    /// Callable parameterized by a per-work-item index descriptor.
    ItemArg,
    /// Callable parameterized by a group/team descriptor.
    GroupArg,
    /// Stateful object/functor form.
    Functor,
    /// Reached through one extra indirection (a named inner call).
    NestedCall,
}

impl SubmissionShape {
    /// Every shape the exerciser drives, in a fixed order.
    pub const ALL: &'static [SubmissionShape] = &[
        SubmissionShape::NoArg,
        SubmissionShape::ItemArg,
        SubmissionShape::GroupArg,
        SubmissionShape::Functor,
        SubmissionShape::NestedCall,
    ];
}

impl fmt::Display for SubmissionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmissionShape::NoArg => write!(f, "no_arg"),
            SubmissionShape::ItemArg => write!(f, "item_arg"),
            SubmissionShape::GroupArg => write!(f, "group_arg"),
            SubmissionShape::Functor => write!(f, "functor"),
            SubmissionShape::NestedCall => write!(f, "nested_call"),
        }
    }
}
