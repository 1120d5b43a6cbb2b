//! One round of selection, clustering and combining.

use crate::error::Result;

use super::cluster::{Clusterer, Survivor};
use super::combine::Combiner;
use super::round::{Candidate, ProbeRound};
use super::select::{QuorumInterval, Selector};

/// Outcome of a successful round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundEstimate {
    /// Combined offset estimate in seconds.
    pub offset: f64,
    /// Quorum interval found by selection.
    pub interval: QuorumInterval,
    /// Survivors that were combined.
    pub survivors: Vec<Survivor>,
}

/// Reduces a round of candidates to a single offset.
#[derive(Debug, Clone, Copy)]
pub struct OffsetPipeline {
    clusterer: Clusterer,
}

impl OffsetPipeline {
    /// Create a pipeline that combines `target_survivors` candidates.
    ///
    /// # Errors
    /// Returns [`crate::SyncError::InvalidInput`] if `target_survivors < 2`.
    pub fn new(target_survivors: usize) -> Result<Self> {
        Ok(Self {
            clusterer: Clusterer::new(target_survivors)?,
        })
    }

    /// Survivor count the pipeline combines.
    #[must_use]
    pub fn target_survivors(&self) -> usize {
        self.clusterer.target()
    }

    /// Run the pipeline over candidate intervals.
    ///
    /// # Errors
    /// Returns [`crate::SyncError::NoQuorum`] if selection fails, or the
    /// clustering/combining error that stopped the round.
    pub fn estimate(&self, candidates: &[Candidate]) -> Result<RoundEstimate> {
        let interval = Selector::new(candidates).select()?;
        tracing::debug!(
            lower = interval.lower,
            upper = interval.upper,
            falsetickers = interval.falsetickers,
            "quorum interval selected"
        );

        let survivors = self.clusterer.cluster(candidates, &interval)?;
        let offset = Combiner::combine(&survivors)?;

        Ok(RoundEstimate {
            offset,
            interval,
            survivors,
        })
    }

    /// Run the pipeline over a complete probe round.
    ///
    /// # Errors
    /// Returns [`crate::SyncError::IncompleteRound`] for a partial round,
    /// otherwise as [`OffsetPipeline::estimate`].
    pub fn estimate_round(&self, round: &ProbeRound) -> Result<RoundEstimate> {
        self.estimate(&round.candidates()?)
    }
}
