//! Outlier pruning of the selected candidates.
//!
//! Survivors of selection are whittled down one at a time: each pass scores
//! every survivor by the RMS distance of its midpoint to all the others and
//! drops the worst, until the target count remains.

use std::cmp::Ordering;

use crate::error::{Result, SyncError};

use super::round::Candidate;
use super::select::QuorumInterval;

/// A candidate retained past selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Survivor {
    /// The candidate interval.
    pub candidate: Candidate,
    /// Index of the candidate within its round.
    pub index: usize,
    /// Deviation from its peers, as of the last pruning pass.
    pub deviation: f64,
}

impl Survivor {
    /// Wrap a candidate with a zeroed deviation.
    #[must_use]
    pub fn new(candidate: Candidate, index: usize) -> Self {
        Self {
            candidate,
            index,
            deviation: 0.0,
        }
    }

    /// Midpoint of the candidate.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        self.candidate.midpoint()
    }

    /// Width of the candidate.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.candidate.width()
    }

    /// Pruning order: higher deviation, then wider, then later index is worse.
    fn rank(&self, other: &Self) -> Ordering {
        self.deviation
            .total_cmp(&other.deviation)
            .then(self.width().total_cmp(&other.width()))
            .then(self.index.cmp(&other.index))
    }
}

/// RMS distance of `survivors[target]`'s midpoint to every survivor's.
///
/// # Errors
/// Returns [`SyncError::DivisionByZero`] for fewer than two survivors.
pub fn deviation(survivors: &[Survivor], target: usize) -> Result<f64> {
    let len = survivors.len();
    if len < 2 {
        return Err(SyncError::DivisionByZero {
            context: format!("deviation over {len} survivor(s)"),
        });
    }
    let mid = survivors[target].midpoint();
    let sum: f64 = survivors
        .iter()
        .map(|s| (mid - s.midpoint()).powi(2))
        .sum();
    #[allow(clippy::cast_precision_loss)]
    Ok((sum / (len - 1) as f64).sqrt())
}

/// Prunes survivors down to a fixed count.
#[derive(Debug, Clone, Copy)]
pub struct Clusterer {
    target: usize,
}

impl Clusterer {
    /// Smallest admissible target count.
    pub const MIN_TARGET: usize = 2;

    /// Create a clusterer that keeps `target` survivors.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] if `target < 2`.
    pub fn new(target: usize) -> Result<Self> {
        if target < Self::MIN_TARGET {
            return Err(SyncError::invalid(
                "target_survivors",
                format!("must be at least {}, got {target}", Self::MIN_TARGET),
            ));
        }
        Ok(Self { target })
    }

    /// Survivor count this clusterer prunes to.
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Candidates whose midpoint lies inside the quorum interval.
    #[must_use]
    pub fn survivors(candidates: &[Candidate], interval: &QuorumInterval) -> Vec<Survivor> {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| interval.contains_midpoint(c))
            .map(|(i, c)| Survivor::new(*c, i))
            .collect()
    }

    /// Drop the worst survivor until `target` remain.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] if fewer than `target` survivors
    /// are supplied.
    pub fn prune(&self, mut survivors: Vec<Survivor>) -> Result<Vec<Survivor>> {
        if survivors.len() < self.target {
            return Err(SyncError::invalid(
                "survivors",
                format!(
                    "{} survivor(s) left after selection, need {}",
                    survivors.len(),
                    self.target
                ),
            ));
        }

        while survivors.len() > self.target {
            let deviations = (0..survivors.len())
                .map(|i| deviation(&survivors, i))
                .collect::<Result<Vec<_>>>()?;
            for (survivor, dev) in survivors.iter_mut().zip(deviations) {
                survivor.deviation = dev;
            }

            let victim = survivors
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.rank(b))
                .map(|(i, _)| i)
                .ok_or_else(|| SyncError::invalid("survivors", "empty survivor set"))?;
            let removed = survivors.remove(victim);
            tracing::debug!(
                index = removed.index,
                deviation = removed.deviation,
                remaining = survivors.len(),
                "pruned survivor"
            );
        }

        Ok(survivors)
    }

    /// Select survivors from the interval and prune them.
    ///
    /// # Errors
    /// See [`Clusterer::prune`].
    pub fn cluster(
        &self,
        candidates: &[Candidate],
        interval: &QuorumInterval,
    ) -> Result<Vec<Survivor>> {
        self.prune(Self::survivors(candidates, interval))
    }
}
