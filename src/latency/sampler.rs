//! Offset-corrected latency sampling.

use crate::error::{Result, SyncError};
use crate::protocol::timing::ProbeTimestamp;
use crate::publish::EstimateRegister;
use crate::types::LatencyConfig;

use super::estimator::LatencyEstimator;
use super::log::{LatencyLog, LatencyRecord};

/// Corrects raw transfer times with the published offset and smooths them.
///
/// `start` is a local timestamp and `finish` a remote one, so their
/// difference is off by the clock offset. Each sample reads the current
/// published estimate; a stale estimate is acceptable, a missing one is not.
pub struct LatencySampler<R> {
    register: R,
    estimator: LatencyEstimator,
    log: Option<LatencyLog>,
    samples: u64,
}

impl<R: EstimateRegister> LatencySampler<R> {
    /// Create a sampler without a diagnostic log.
    #[must_use]
    pub fn new(register: R, estimator: LatencyEstimator) -> Self {
        Self {
            register,
            estimator,
            log: None,
            samples: 0,
        }
    }

    /// Create a sampler from configuration, opening the log if configured.
    ///
    /// # Errors
    /// Returns an error if the gains are invalid or the log cannot be opened.
    pub async fn from_config(register: R, config: &LatencyConfig) -> Result<Self> {
        let estimator = LatencyEstimator::new(config)?;
        let log = match &config.log_path {
            Some(path) => Some(
                LatencyLog::open(path)
                    .await
                    .map_err(|e| SyncError::io(format!("open {}", path.display()), e))?,
            ),
            None => None,
        };
        Ok(Self {
            register,
            estimator,
            log,
            samples: 0,
        })
    }

    /// Attach a diagnostic log.
    #[must_use]
    pub fn with_log(mut self, log: LatencyLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Record a transfer that started locally at `start` and finished
    /// remotely at `finish`.
    ///
    /// # Errors
    /// Returns [`crate::SyncError::Publish`] if no estimate can be read, or
    /// an I/O error if the log write fails.
    pub async fn record(
        &mut self,
        start: ProbeTimestamp,
        finish: ProbeTimestamp,
    ) -> Result<LatencyRecord> {
        let offset = self.register.read().await?;
        self.record_corrected((finish - start) - offset).await
    }

    /// Record an already corrected latency sample.
    ///
    /// # Errors
    /// Returns an error for a non-finite sample or a failed log write.
    pub async fn record_corrected(&mut self, latency: f64) -> Result<LatencyRecord> {
        let state = self.estimator.observe(latency)?;
        let record = LatencyRecord { latency, state };
        self.samples += 1;

        tracing::debug!(
            sample = self.samples,
            latency,
            mean = state.smoothed_mean,
            deviation = state.smoothed_deviation,
            upper = state.upper_bound,
            "latency sample"
        );

        if let Some(log) = self.log.as_mut() {
            log.append(&record)
                .await
                .map_err(|e| SyncError::io(format!("append to {}", log.path().display()), e))?;
        }
        Ok(record)
    }

    /// Samples recorded so far.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// The underlying estimator.
    #[must_use]
    pub fn estimator(&self) -> &LatencyEstimator {
        &self.estimator
    }
}
