//! Adaptive latency smoothing.
//!
//! Tracks an exponentially weighted mean and mean deviation of latency
//! samples, the same shape as TCP's SRTT/RTTVAR estimator, and derives an
//! upper bound `mean + κ·deviation`.

use crate::error::{Result, SyncError};
use crate::types::LatencyConfig;

/// Smoothed view of the latency samples seen so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencyState {
    /// Smoothed mean latency.
    pub smoothed_mean: f64,
    /// Smoothed mean absolute deviation.
    pub smoothed_deviation: f64,
    /// `smoothed_mean + κ·smoothed_deviation`.
    pub upper_bound: f64,
}

/// Latency smoother.
///
/// Uninitialized until the first sample, which seeds all three values with
/// a quarter of the sample.
#[derive(Debug, Clone)]
pub struct LatencyEstimator {
    alpha: f64,
    beta: f64,
    kappa: f64,
    state: Option<LatencyState>,
}

impl Default for LatencyEstimator {
    fn default() -> Self {
        let config = LatencyConfig::default();
        Self {
            alpha: config.alpha,
            beta: config.beta,
            kappa: config.kappa,
            state: None,
        }
    }
}

impl LatencyEstimator {
    /// Divisor applied to the first sample.
    pub const INITIAL_DIVISOR: f64 = 4.0;

    /// Create an estimator with the gains from `config`.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] if the gains are out of range.
    pub fn new(config: &LatencyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            alpha: config.alpha,
            beta: config.beta,
            kappa: config.kappa,
            state: None,
        })
    }

    /// Feed one sample and return the updated state.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] for a non-finite sample; the
    /// state is left unchanged.
    pub fn observe(&mut self, sample: f64) -> Result<LatencyState> {
        if !sample.is_finite() {
            return Err(SyncError::invalid(
                "latency sample",
                format!("not finite: {sample}"),
            ));
        }

        let next = match self.state {
            None => {
                let seed = sample / Self::INITIAL_DIVISOR;
                LatencyState {
                    smoothed_mean: seed,
                    smoothed_deviation: seed,
                    upper_bound: seed,
                }
            }
            Some(prev) => {
                let smoothed_deviation = (1.0 - self.beta) * prev.smoothed_deviation
                    + self.beta * (prev.smoothed_mean - sample).abs();
                let smoothed_mean = (1.0 - self.alpha) * prev.smoothed_mean + self.alpha * sample;
                LatencyState {
                    smoothed_mean,
                    smoothed_deviation,
                    upper_bound: smoothed_mean + self.kappa * smoothed_deviation,
                }
            }
        };

        self.state = Some(next);
        Ok(next)
    }

    /// Current state, `None` before the first sample.
    #[must_use]
    pub fn state(&self) -> Option<LatencyState> {
        self.state
    }

    /// Whether a sample has been observed.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Forget all samples.
    pub fn reset(&mut self) {
        self.state = None;
    }
}
