//! Capability tags and device capability sets.
//!
//! A [`Capability`] names one optional hardware/runtime feature a device may
//! or may not support. The suite parameterizes its scenarios over the three
//! features the submission contract gates on; the set is `#[non_exhaustive]`
//! so more can be added without breaking downstream matches.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// A hardware/runtime feature a device may or may not support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Capability {
    /// Half-precision (16-bit) floating point arithmetic.
    Fp16,
    /// Double-precision (64-bit) floating point arithmetic.
    Fp64,
    /// 64-bit wide atomic operations.
    Atomic64,
}

impl Capability {
    /// All capabilities the suite exercises.
    pub const ALL: &'static [Capability] =
        &[Capability::Fp16, Capability::Fp64, Capability::Atomic64];

    /// A fixed, distinct "other" capability, used by the scenarios where a
    /// callable is declared for one feature while exercising another.
    ///
    /// The mapping is a cycle over [`Capability::ALL`], so the result is
    /// never equal to `self`.
    pub fn paired_other(self) -> Capability {
        match self {
            Capability::Fp16 => Capability::Fp64,
            Capability::Fp64 => Capability::Atomic64,
            Capability::Atomic64 => Capability::Fp16,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Fp16 => write!(f, "fp16"),
            Capability::Fp64 => write!(f, "fp64"),
            Capability::Atomic64 => write!(f, "atomic64"),
        }
    }
}

/// Error returned when parsing an unknown capability name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown capability {0:?} (expected one of: fp16, fp64, atomic64)")]
pub struct ParseCapabilityError(pub String);

impl FromStr for Capability {
    type Err = ParseCapabilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fp16" | "half" => Ok(Capability::Fp16),
            "fp64" | "double" => Ok(Capability::Fp64),
            "atomic64" => Ok(Capability::Atomic64),
            _ => Err(ParseCapabilityError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// CapabilitySet
// ---------------------------------------------------------------------------

/// The set of capabilities one device supports.
///
/// Queried, never mutated, by the resolver. Construct once per device and
/// hand out shared references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    caps: BTreeSet<Capability>,
}

impl CapabilitySet {
    /// A device supporting nothing the suite gates on.
    pub fn empty() -> Self {
        Self { caps: BTreeSet::new() }
    }

    /// A device supporting every capability in [`Capability::ALL`].
    pub fn all() -> Self {
        Capability::ALL.iter().copied().collect()
    }

    /// Returns `true` when the device supports `cap`.
    pub fn supports(&self, cap: Capability) -> bool {
        self.caps.contains(&cap)
    }

    /// Returns `true` when every capability in `caps` is supported.
    pub fn supports_all<I: IntoIterator<Item = Capability>>(&self, caps: I) -> bool {
        caps.into_iter().all(|c| self.supports(c))
    }

    /// Number of supported capabilities.
    pub fn len(&self) -> usize {
        self.caps.len()
    }

    /// Returns `true` when no capability is supported.
    pub fn is_empty(&self) -> bool {
        self.caps.is_empty()
    }

    /// Iterate over supported capabilities in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.caps.iter().copied()
    }

    /// Parse a comma-separated capability list, e.g. `"fp16,atomic64"`.
    ///
    /// The strings `"none"` and `""` yield the empty set; `"all"` yields
    /// [`CapabilitySet::all`].
    pub fn parse_list(s: &str) -> Result<Self, ParseCapabilityError> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Self::empty());
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }
        trimmed.split(',').map(Capability::from_str).collect()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self { caps: iter.into_iter().collect() }
    }
}

impl fmt::Display for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.caps.is_empty() {
            return write!(f, "none");
        }
        let mut first = true;
        for cap in &self.caps {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{cap}")?;
            first = false;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
