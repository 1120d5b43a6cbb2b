use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SyncError};

/// Configuration for the offset estimation process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Probes per decision round, `m` (default: 8)
    pub candidates_per_round: usize,

    /// Survivors kept by clustering and combined (default: 3)
    pub target_survivors: usize,

    /// Delay between rounds (default: 5 seconds)
    pub round_interval: Duration,

    /// How long to wait for each probe response (default: 1 second)
    pub probe_timeout: Duration,

    /// Receive buffer size for probe responses (default: 64)
    pub recv_buf_size: usize,

    /// Where the offset estimate is published
    pub estimate_path: PathBuf,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            candidates_per_round: 8,
            target_survivors: 3,
            round_interval: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(1),
            recv_buf_size: 64,
            estimate_path: PathBuf::from("offset_estimate.bin"),
        }
    }
}

impl EstimatorConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> EstimatorConfigBuilder {
        EstimatorConfigBuilder::default()
    }

    /// Parse a configuration from JSON, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the result is invalid
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SyncError::invalid("estimator config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the round parameters can produce an estimate
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidInput`] unless
    /// `2 <= target_survivors < candidates_per_round`, both periods are
    /// non-zero and the buffer holds a probe packet
    pub fn validate(&self) -> Result<()> {
        if self.target_survivors < 2 {
            return Err(SyncError::invalid(
                "target_survivors",
                format!("must be at least 2, got {}", self.target_survivors),
            ));
        }
        if self.target_survivors >= self.candidates_per_round {
            return Err(SyncError::invalid(
                "target_survivors",
                format!(
                    "must be less than candidates_per_round ({}), got {}",
                    self.candidates_per_round, self.target_survivors
                ),
            ));
        }
        for (name, period) in [
            ("round_interval", self.round_interval),
            ("probe_timeout", self.probe_timeout),
        ] {
            if period.is_zero() {
                return Err(SyncError::invalid(name, "must be non-zero"));
            }
        }
        if self.recv_buf_size < crate::protocol::timing::ProbePacket::SIZE {
            return Err(SyncError::invalid(
                "recv_buf_size",
                format!("too small for a probe packet: {}", self.recv_buf_size),
            ));
        }
        Ok(())
    }
}

/// Builder for `EstimatorConfig`
#[derive(Debug, Clone, Default)]
pub struct EstimatorConfigBuilder {
    config: EstimatorConfig,
}

impl EstimatorConfigBuilder {
    /// Set probes per round
    #[must_use]
    pub fn candidates_per_round(mut self, m: usize) -> Self {
        self.config.candidates_per_round = m;
        self
    }

    /// Set the number of survivors to combine
    #[must_use]
    pub fn target_survivors(mut self, target: usize) -> Self {
        self.config.target_survivors = target;
        self
    }

    /// Set delay between rounds
    #[must_use]
    pub fn round_interval(mut self, interval: Duration) -> Self {
        self.config.round_interval = interval;
        self
    }

    /// Set per-probe timeout
    #[must_use]
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    /// Set the probe receive buffer size
    #[must_use]
    pub fn recv_buf_size(mut self, size: usize) -> Self {
        self.config.recv_buf_size = size;
        self
    }

    /// Set where the estimate is published
    #[must_use]
    pub fn estimate_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.estimate_path = path.into();
        self
    }

    /// Build and validate the configuration
    ///
    /// # Errors
    ///
    /// See [`EstimatorConfig::validate`]
    pub fn build(self) -> Result<EstimatorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Configuration for latency smoothing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Gain of the smoothed mean (default: 0.1)
    pub alpha: f64,

    /// Gain of the smoothed deviation (default: 0.2)
    pub beta: f64,

    /// Deviations added to the mean for the upper bound (default: 0.5)
    pub kappa: f64,

    /// Append-only diagnostic log of samples (None = no log)
    pub log_path: Option<PathBuf>,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            beta: 0.2,
            kappa: 0.5,
            log_path: None,
        }
    }
}

impl LatencyConfig {
    /// Parse a configuration from JSON, filling omitted fields with defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the gains are invalid
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SyncError::invalid("latency config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the smoothing gains
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidInput`] unless `alpha` and `beta` are in
    /// `(0, 1]` and `kappa` is finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, gain) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(gain > 0.0 && gain <= 1.0) {
                return Err(SyncError::invalid(
                    name,
                    format!("must be in (0, 1], got {gain}"),
                ));
            }
        }
        if !(self.kappa.is_finite() && self.kappa >= 0.0) {
            return Err(SyncError::invalid(
                "kappa",
                format!("must be finite and non-negative, got {}", self.kappa),
            ));
        }
        Ok(())
    }

    /// Set the diagnostic log path
    #[must_use]
    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = Some(path.into());
        self
    }
}
