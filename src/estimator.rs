//! Round driver for the estimation process.
//!
//! Each round collects `m` probes sequentially, reduces them to one offset
//! and publishes it. A failed round is logged and abandoned; the previous
//! estimate stays published until a later round succeeds.

use tokio::time::MissedTickBehavior;

use crate::error::{Result, SyncError};
use crate::estimate::{OffsetPipeline, ProbeRound, RoundEstimate};
use crate::net::ProbeTransport;
use crate::publish::EstimateRegister;
use crate::types::EstimatorConfig;


/// Periodically estimates and publishes the clock offset.
pub struct OffsetEstimator<T, R> {
    config: EstimatorConfig,
    pipeline: OffsetPipeline,
    transport: T,
    register: R,
    rounds: u64,
    last: Option<RoundEstimate>,
}

impl<T: ProbeTransport, R: EstimateRegister> OffsetEstimator<T, R> {
    /// Create an estimator.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::InvalidInput`] if the configuration is invalid.
    pub fn new(config: EstimatorConfig, transport: T, register: R) -> Result<Self> {
        config.validate()?;
        let pipeline = OffsetPipeline::new(config.target_survivors)?;
        Ok(Self {
            config,
            pipeline,
            transport,
            register,
            rounds: 0,
            last: None,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Register the estimate is published to.
    #[must_use]
    pub fn register(&self) -> &R {
        &self.register
    }

    /// Probe transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Rounds attempted so far, successful or not.
    #[must_use]
    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    /// Most recent successful round.
    #[must_use]
    pub fn last_estimate(&self) -> Option<&RoundEstimate> {
        self.last.as_ref()
    }

    /// Collect one full round of probes.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::IncompleteRound`] carrying the transport error if
    /// any probe fails; the measurements collected so far are discarded.
    pub async fn collect_round(&mut self) -> Result<ProbeRound> {
        let expected = self.config.candidates_per_round;
        let mut round = ProbeRound::new(expected);

        while !round.is_complete() {
            match self.transport.probe().await {
                Ok(measurement) => round.push(measurement)?,
                Err(e) => {
                    return Err(SyncError::IncompleteRound {
                        round: self.rounds,
                        collected: round.len(),
                        expected,
                        source: Some(Box::new(e)),
                    });
                }
            }
        }
        Ok(round)
    }

    /// Run one round: probe, estimate, publish.
    ///
    /// # Errors
    ///
    /// Returns the error that stopped the round. Nothing is published then.
    pub async fn run_round(&mut self) -> Result<RoundEstimate> {
        self.rounds += 1;
        let round = self.collect_round().await?;
        let estimate = self.pipeline.estimate_round(&round)?;
        self.register.publish(estimate.offset).await?;

        tracing::info!(
            round = self.rounds,
            offset = estimate.offset,
            falsetickers = estimate.interval.falsetickers,
            survivors = estimate.survivors.len(),
            "published offset estimate"
        );
        self.last = Some(estimate.clone());
        Ok(estimate)
    }

    /// Run rounds every `round_interval` until `shutdown` is set.
    ///
    /// Round failures are logged and never end the loop.
    pub async fn run(&mut self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        let mut round_timer = tokio::time::interval(self.config.round_interval);
        round_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = round_timer.tick() => {
                    if let Err(e) = self.run_round().await {
                        log_round_failure(self.rounds, &e);
                    }
                }

                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!(rounds = self.rounds, "offset estimator shutting down");
                        break;
                    }
                }
            }
        }
    }
}

fn log_round_failure(round: u64, err: &SyncError) {
    match err {
        SyncError::NoQuorum {
            candidates,
            falsetickers,
        } => {
            tracing::warn!(round, candidates, falsetickers, "round failed: no quorum");
        }
        SyncError::IncompleteRound {
            collected,
            expected,
            source,
            ..
        } => {
            tracing::warn!(
                round,
                collected,
                expected,
                cause = ?source.as_ref().map(ToString::to_string),
                "round failed: incomplete"
            );
        }
        _ => {
            tracing::warn!(
                round,
                error = %err,
                recoverable = err.is_recoverable(),
                "round failed"
            );
        }
    }
}
