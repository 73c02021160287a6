//! Centralized detection configuration.
//!
//! Every tuning threshold of the engine lives here. The defaults are fixed so
//! that repeated runs over the same batch produce bit-exact reports.
//!
//! # Example
//!
//! ```rust
//! use muleflow_core::config::DetectionConfig;
//!
//! let config = DetectionConfig::default().with_smurf_threshold(12);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MS_PER_HOUR: i64 = 3_600_000;

/// Tuning thresholds and score weights for a detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Distinct counterparties required to flag a fan-in/fan-out burst.
    pub smurf_threshold: usize,
    /// Sliding window width for smurfing detection, in hours.
    pub smurf_window_hours: i64,

    /// Minimum hop count for a shell chain.
    pub shell_min_hops: usize,
    /// Maximum total transactions for a node to count as a shell intermediate.
    pub shell_max_intermediate_tx: u64,
    /// Hard depth cap on shell-chain traversal.
    pub shell_depth_cap: usize,

    /// Outbound transactions within the window required to flag high velocity.
    pub velocity_threshold: usize,
    /// Sliding window width for velocity detection, in hours.
    pub velocity_window_hours: i64,

    /// Minimum reported cycle length.
    pub cycle_min_len: usize,
    /// Maximum reported cycle length (DFS depth cap).
    pub cycle_max_len: usize,

    /// Score contribution for cycle membership.
    pub cycle_weight: f64,
    /// Score contribution for a fan-in flag.
    pub fan_in_weight: f64,
    /// Score contribution for a fan-out flag.
    pub fan_out_weight: f64,
    /// Score contribution for a shell-chain flag.
    pub shell_weight: f64,
    /// Score contribution for a high-velocity flag.
    pub velocity_weight: f64,

    /// Minimum outbound transaction count for the payroll exemption.
    pub payroll_min_count: usize,
    /// Coefficient-of-variation cap for the payroll exemption (strict `<`).
    pub payroll_cv_cap: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            smurf_threshold: 10,
            smurf_window_hours: 72,
            shell_min_hops: 3,
            shell_max_intermediate_tx: 3,
            shell_depth_cap: 6,
            velocity_threshold: 20,
            velocity_window_hours: 24,
            cycle_min_len: 3,
            cycle_max_len: 5,
            cycle_weight: 40.0,
            fan_in_weight: 25.0,
            fan_out_weight: 25.0,
            shell_weight: 20.0,
            velocity_weight: 10.0,
            payroll_min_count: 10,
            payroll_cv_cap: 0.05,
        }
    }
}

impl DetectionConfig {
    /// Smurfing window width in milliseconds.
    #[must_use]
    pub fn smurf_window_ms(&self) -> i64 {
        self.smurf_window_hours * MS_PER_HOUR
    }

    /// Velocity window width in milliseconds.
    #[must_use]
    pub fn velocity_window_ms(&self) -> i64 {
        self.velocity_window_hours * MS_PER_HOUR
    }

    /// Set the smurfing distinct-counterparty threshold.
    #[must_use]
    pub fn with_smurf_threshold(mut self, threshold: usize) -> Self {
        self.smurf_threshold = threshold;
        self
    }

    /// Set the smurfing window width in hours.
    #[must_use]
    pub fn with_smurf_window_hours(mut self, hours: i64) -> Self {
        self.smurf_window_hours = hours;
        self
    }

    /// Set the velocity threshold.
    #[must_use]
    pub fn with_velocity_threshold(mut self, threshold: usize) -> Self {
        self.velocity_threshold = threshold;
        self
    }

    /// Set the velocity window width in hours.
    #[must_use]
    pub fn with_velocity_window_hours(mut self, hours: i64) -> Self {
        self.velocity_window_hours = hours;
        self
    }

    /// Set the payroll exemption parameters.
    #[must_use]
    pub fn with_payroll_exemption(mut self, min_count: usize, cv_cap: f64) -> Self {
        self.payroll_min_count = min_count;
        self.payroll_cv_cap = cv_cap;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Recognized variables: `MULEFLOW_SMURF_THRESHOLD`,
    /// `MULEFLOW_SMURF_WINDOW_HOURS`, `MULEFLOW_VELOCITY_THRESHOLD`,
    /// `MULEFLOW_VELOCITY_WINDOW_HOURS`. Unset variables keep defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("MULEFLOW_SMURF_THRESHOLD") {
            config.smurf_threshold = val
                .parse()
                .map_err(|_| EngineError::config(format!("bad MULEFLOW_SMURF_THRESHOLD: {val}")))?;
        }
        if let Ok(val) = std::env::var("MULEFLOW_SMURF_WINDOW_HOURS") {
            config.smurf_window_hours = val.parse().map_err(|_| {
                EngineError::config(format!("bad MULEFLOW_SMURF_WINDOW_HOURS: {val}"))
            })?;
        }
        if let Ok(val) = std::env::var("MULEFLOW_VELOCITY_THRESHOLD") {
            config.velocity_threshold = val.parse().map_err(|_| {
                EngineError::config(format!("bad MULEFLOW_VELOCITY_THRESHOLD: {val}"))
            })?;
        }
        if let Ok(val) = std::env::var("MULEFLOW_VELOCITY_WINDOW_HOURS") {
            config.velocity_window_hours = val.parse().map_err(|_| {
                EngineError::config(format!("bad MULEFLOW_VELOCITY_WINDOW_HOURS: {val}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| EngineError::config(format!("failed to read config: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| EngineError::config(format!("failed to parse config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| EngineError::config(format!("failed to serialize config: {e}")))?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| EngineError::config(format!("failed to write config: {e}")))?;

        Ok(())
    }

    /// Render the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EngineError::config(format!("failed to serialize config: {e}")))
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.smurf_threshold == 0 || self.velocity_threshold == 0 {
            return Err(EngineError::config("thresholds must be positive"));
        }
        if self.smurf_window_hours <= 0 || self.velocity_window_hours <= 0 {
            return Err(EngineError::config("window widths must be positive"));
        }
        if self.cycle_min_len < 3 {
            return Err(EngineError::config(
                "cycle_min_len below 3 would report trivial back-and-forth cycles",
            ));
        }
        if self.cycle_max_len < self.cycle_min_len {
            return Err(EngineError::config("cycle_max_len below cycle_min_len"));
        }
        if self.shell_depth_cap < self.shell_min_hops {
            return Err(EngineError::config("shell_depth_cap below shell_min_hops"));
        }
        let weights = [
            self.cycle_weight,
            self.fan_in_weight,
            self.fan_out_weight,
            self.shell_weight,
            self.velocity_weight,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(EngineError::config("score weights must be non-negative"));
        }
        if !(0.0..=1.0).contains(&self.payroll_cv_cap) {
            return Err(EngineError::config("payroll_cv_cap must be in [0, 1]"));
        }
        Ok(())
    }
}
