//! Weighted combination of the final survivors.

use crate::error::{Result, SyncError};

use super::cluster::Survivor;

/// Combines survivors into one offset, weighting each by `2 / width`.
///
/// Narrow intervals come from short round trips and pull the estimate
/// harder than wide ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct Combiner;

impl Combiner {
    /// Weight of a single survivor.
    ///
    /// # Errors
    /// Returns [`SyncError::DivisionByZero`] for a zero-width interval and
    /// [`SyncError::InvalidInput`] for a negative or non-finite width.
    pub fn weight(survivor: &Survivor) -> Result<f64> {
        let width = survivor.width();
        if width == 0.0 {
            return Err(SyncError::DivisionByZero {
                context: format!("survivor {} has zero width", survivor.index),
            });
        }
        if !width.is_finite() || width < 0.0 {
            return Err(SyncError::invalid(
                "survivor",
                format!("survivor {} has width {width}", survivor.index),
            ));
        }
        Ok(2.0 / width)
    }

    /// Weighted mean of the survivors' midpoints.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] for an empty set and propagates
    /// [`Combiner::weight`] errors.
    pub fn combine(survivors: &[Survivor]) -> Result<f64> {
        if survivors.is_empty() {
            return Err(SyncError::invalid("survivors", "nothing to combine"));
        }

        let mut weighted = 0.0;
        let mut total = 0.0;
        for survivor in survivors {
            let weight = Self::weight(survivor)?;
            weighted += weight * survivor.midpoint();
            total += weight;
        }

        let estimate = weighted / total;
        if estimate.is_finite() {
            Ok(estimate)
        } else {
            Err(SyncError::invalid(
                "survivors",
                "combined estimate is not finite",
            ))
        }
    }
}
