//! Harness configuration.
//!
//! Loaded from TOML with `KERNELGATE_*` environment overrides applied on
//! top, then validated. Defaults target the in-process reference backend.
//!
//! Recognized overrides:
//! - `KERNELGATE_BACKEND` — backend name (`reference`, `cuda`, ...)
//! - `KERNELGATE_SCENARIO_FILTER` — substring filter on scenario names
//! - `KERNELGATE_FAIL_FAST` — stop at the first failing scenario
//! - `KERNELGATE_STRICT_MODE` — disable environment fakes

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use kernelgate_runtime::Backend;
use kernelgate_runtime::device::STRICT_MODE_ENV;

/// Errors that can occur when loading or validating a [`HarnessConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("invalid environment override {key}={value}: {reason}")]
    EnvOverride { key: String, value: String, reason: String },
}

/// Runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Backend the device under test belongs to.
    /// Override: `KERNELGATE_BACKEND`
    pub backend: Backend,

    /// Run only scenarios whose name contains this substring.
    /// Override: `KERNELGATE_SCENARIO_FILTER`
    pub scenario_filter: Option<String>,

    /// Stop after the first scenario with a failure.
    /// Override: `KERNELGATE_FAIL_FAST`
    pub fail_fast: bool,

    /// Ignore environment fakes.
    /// Override: `KERNELGATE_STRICT_MODE`
    pub strict_mode: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Reference,
            scenario_filter: None,
            fail_fast: false,
            strict_mode: false,
        }
    }
}

impl HarnessConfig {
    /// Load from a TOML file, apply environment overrides, validate.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Load from a TOML string (useful for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let mut cfg: HarnessConfig = toml::from_str(toml_str)?;
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults plus environment overrides only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        cfg.apply_env_overrides()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `KERNELGATE_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("KERNELGATE_BACKEND") {
            self.backend =
                Backend::from_str(&val).map_err(|err| ConfigError::EnvOverride {
                    key: "KERNELGATE_BACKEND".into(),
                    value: val.clone(),
                    reason: err.to_string(),
                })?;
        }
        if let Ok(val) = std::env::var("KERNELGATE_SCENARIO_FILTER") {
            self.scenario_filter = if val.is_empty() { None } else { Some(val) };
        }
        if let Ok(val) = std::env::var("KERNELGATE_FAIL_FAST") {
            self.fail_fast = matches!(val.as_str(), "1" | "true" | "yes");
        }
        if let Ok(val) = std::env::var(STRICT_MODE_ENV) {
            self.strict_mode = matches!(val.as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(filter) = &self.scenario_filter {
            if filter.len() > 128 {
                return Err(ConfigError::Validation(
                    "scenario_filter must be <= 128 characters".into(),
                ));
            }
        }
        Ok(())
    }

    /// Returns `true` when `name` passes the scenario filter.
    pub fn selects(&self, name: &str) -> bool {
        match &self.scenario_filter {
            Some(filter) => name.contains(filter.as_str()),
            None => true,
        }
    }
}
