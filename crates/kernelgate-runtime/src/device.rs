//! Device and backend model.
//!
//! A [`Device`] is one submission target with an immutable capability set.
//! For deterministic testing without hardware, the capability set can be
//! faked through `KERNELGATE_DEVICE_FAKE` (comma-separated capability
//! names, `none`, or `all`); `KERNELGATE_STRICT_MODE=1` disables the fake
//! so suites running against real hardware cannot be spoofed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use kernelgate_core::CapabilitySet;

/// Environment variable carrying a faked capability list.
pub const DEVICE_FAKE_ENV: &str = "KERNELGATE_DEVICE_FAKE";
/// Environment variable that disables all fakes when set to `1`/`true`.
pub const STRICT_MODE_ENV: &str = "KERNELGATE_STRICT_MODE";

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// The runtime backend a device belongs to. Used by the harness's skip
/// matrix to avoid scenarios on backends with known conformance defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Backend {
    /// The in-process reference implementation.
    Reference,
    /// NVIDIA CUDA driver stack.
    Cuda,
    /// AMD HIP/ROCm stack.
    Hip,
    /// Generic OpenCL stack.
    #[serde(rename = "opencl")]
    OpenCl,
    /// Intel Level Zero stack.
    LevelZero,
}

impl Backend {
    /// All known backends.
    pub const ALL: &'static [Backend] = &[
        Backend::Reference,
        Backend::Cuda,
        Backend::Hip,
        Backend::OpenCl,
        Backend::LevelZero,
    ];
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Reference => write!(f, "reference"),
            Backend::Cuda => write!(f, "cuda"),
            Backend::Hip => write!(f, "hip"),
            Backend::OpenCl => write!(f, "opencl"),
            Backend::LevelZero => write!(f, "level-zero"),
        }
    }
}

/// Error returned when parsing an unknown backend name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown backend {0:?} (expected one of: reference, cuda, hip, opencl, level-zero)")]
pub struct ParseBackendError(pub String);

impl FromStr for Backend {
    type Err = ParseBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reference" => Ok(Backend::Reference),
            "cuda" => Ok(Backend::Cuda),
            "hip" | "rocm" => Ok(Backend::Hip),
            "opencl" => Ok(Backend::OpenCl),
            "level-zero" | "levelzero" | "l0" => Ok(Backend::LevelZero),
            _ => Err(ParseBackendError(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Device
// ---------------------------------------------------------------------------

/// One submission target with a fixed capability set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    name: String,
    backend: Backend,
    capabilities: CapabilitySet,
}

impl Device {
    /// Construct a device with an explicit capability set.
    pub fn new(name: impl Into<String>, backend: Backend, capabilities: CapabilitySet) -> Self {
        Self { name: name.into(), backend, capabilities }
    }

    /// Construct a device whose capability set comes from
    /// `KERNELGATE_DEVICE_FAKE` when present (and strict mode is off),
    /// falling back to `default_caps` otherwise.
    pub fn with_env_fake(
        name: impl Into<String>,
        backend: Backend,
        default_caps: CapabilitySet,
    ) -> Self {
        let capabilities = fake_capabilities_from_env().unwrap_or(default_caps);
        Self { name: name.into(), backend, capabilities }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The declared capability set. Read-only: conformance checks query
    /// this, they never mutate it.
    pub fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] caps={}", self.name, self.backend, self.capabilities)
    }
}

/// Read a faked capability set from the environment, if configured.
///
/// Returns `None` when the variable is unset, unparsable, or strict mode
/// is active. An unparsable value is logged and ignored rather than
/// failing device construction.
pub fn fake_capabilities_from_env() -> Option<CapabilitySet> {
    if strict_mode() {
        return None;
    }
    let raw = std::env::var(DEVICE_FAKE_ENV).ok()?;
    match CapabilitySet::parse_list(&raw) {
        Ok(caps) => {
            debug!(%caps, "using faked device capabilities from {}", DEVICE_FAKE_ENV);
            Some(caps)
        }
        Err(err) => {
            warn!(%err, value = %raw, "ignoring invalid {}", DEVICE_FAKE_ENV);
            None
        }
    }
}

/// Returns `true` when `KERNELGATE_STRICT_MODE` requests real behavior.
pub fn strict_mode() -> bool {
    std::env::var(STRICT_MODE_ENV)
        .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use kernelgate_core::Capability;
    use serial_test::serial;

    #[test]
    fn backend_display_and_parse_roundtrip() {
        for &backend in Backend::ALL {
            assert_eq!(backend.to_string().parse::<Backend>(), Ok(backend));
        }
    }

    #[test]
    fn backend_parse_aliases() {
        assert_eq!("rocm".parse::<Backend>(), Ok(Backend::Hip));
        assert_eq!("l0".parse::<Backend>(), Ok(Backend::LevelZero));
    }

    #[test]
    fn backend_parse_unknown_fails() {
        assert!("vulkan".parse::<Backend>().is_err());
    }

    #[test]
    fn device_exposes_its_capability_set() {
        let caps: CapabilitySet = [Capability::Fp16].into_iter().collect();
        let dev = Device::new("dev0", Backend::Reference, caps.clone());
        assert_eq!(dev.capabilities(), &caps);
        assert_eq!(dev.backend(), Backend::Reference);
        assert_eq!(dev.name(), "dev0");
    }

    #[test]
    #[serial(kernelgate_env)]
    fn env_fake_overrides_default_caps() {
        temp_env::with_var(DEVICE_FAKE_ENV, Some("fp16,fp64"), || {
            let dev =
                Device::with_env_fake("dev0", Backend::Reference, CapabilitySet::empty());
            assert!(dev.capabilities().supports(Capability::Fp16));
            assert!(dev.capabilities().supports(Capability::Fp64));
            assert!(!dev.capabilities().supports(Capability::Atomic64));
        });
    }

    #[test]
    #[serial(kernelgate_env)]
    fn env_fake_none_yields_empty_set() {
        temp_env::with_var(DEVICE_FAKE_ENV, Some("none"), || {
            let dev = Device::with_env_fake("dev0", Backend::Reference, CapabilitySet::all());
            assert!(dev.capabilities().is_empty());
        });
    }

    #[test]
    #[serial(kernelgate_env)]
    fn strict_mode_ignores_env_fake() {
        temp_env::with_vars(
            [(DEVICE_FAKE_ENV, Some("all")), (STRICT_MODE_ENV, Some("1"))],
            || {
                let dev =
                    Device::with_env_fake("dev0", Backend::Reference, CapabilitySet::empty());
                assert!(dev.capabilities().is_empty(), "fake must be ignored in strict mode");
            },
        );
    }

    #[test]
    #[serial(kernelgate_env)]
    fn invalid_env_fake_falls_back_to_default() {
        temp_env::with_var(DEVICE_FAKE_ENV, Some("fp16,bogus"), || {
            let dev = Device::with_env_fake("dev0", Backend::Reference, CapabilitySet::all());
            assert_eq!(dev.capabilities(), &CapabilitySet::all());
        });
    }

    #[test]
    #[serial(kernelgate_env)]
    fn unset_env_uses_default_caps() {
        temp_env::with_var(DEVICE_FAKE_ENV, None::<&str>, || {
            let caps: CapabilitySet = [Capability::Atomic64].into_iter().collect();
            let dev = Device::with_env_fake("dev0", Backend::Reference, caps.clone());
            assert_eq!(dev.capabilities(), &caps);
        });
    }
}
