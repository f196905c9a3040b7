//! Configuration types for the CPM engine.

use pyo3::prelude::*;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while interpreting a [`CpmConfig`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown independent reserve rule: {0} (expected \"first_predecessor\" or \"latest_predecessor\")")]
    UnknownReserveRule(String),
}

/// Which predecessor's early finish bounds a task's independent reserve.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndependentReserveRule {
    /// Early finish of the first declared predecessor (0 for start tasks).
    /// Reproduces the values reported by the original planning tool.
    #[default]
    FirstPredecessor,
    /// Latest early finish over all predecessors, i.e. the value that
    /// actually fixes the task's early start in the forward pass.
    LatestPredecessor,
}

impl IndependentReserveRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstPredecessor => "first_predecessor",
            Self::LatestPredecessor => "latest_predecessor",
        }
    }
}

impl FromStr for IndependentReserveRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_predecessor" => Ok(Self::FirstPredecessor),
            "latest_predecessor" => Ok(Self::LatestPredecessor),
            other => Err(ConfigError::UnknownReserveRule(other.to_string())),
        }
    }
}

/// Configuration for a CPM computation.
#[pyclass]
#[derive(Clone, Debug)]
pub struct CpmConfig {
    /// Independent reserve rule: "first_predecessor" or "latest_predecessor"
    #[pyo3(get, set)]
    pub independent_reserve: String,
    /// Verbosity level: 0=silent, 1=phases, 2=tasks, 3=debug.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for CpmConfig {
    fn default() -> Self {
        Self {
            independent_reserve: IndependentReserveRule::default().as_str().to_string(),
            verbosity: 0,
        }
    }
}

impl CpmConfig {
    pub fn with_rule(rule: IndependentReserveRule) -> Self {
        Self {
            independent_reserve: rule.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Parse the configured independent reserve rule.
    pub fn reserve_rule(&self) -> Result<IndependentReserveRule, ConfigError> {
        self.independent_reserve.parse()
    }
}

#[pymethods]
impl CpmConfig {
    #[new]
    #[pyo3(signature = (independent_reserve=None, verbosity=None))]
    fn new(independent_reserve: Option<String>, verbosity: Option<u8>) -> Self {
        let defaults = Self::default();
        Self {
            independent_reserve: independent_reserve.unwrap_or(defaults.independent_reserve),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "CpmConfig(independent_reserve={:?}, verbosity={})",
            self.independent_reserve, self.verbosity
        )
    }
}
