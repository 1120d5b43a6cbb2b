//! Quorum interval intersection.
//!
//! Finds the interval shared by a majority of candidate intervals, in the
//! manner of Marzullo's algorithm as used by NTP's selection step. Each
//! candidate contributes three endpoints (low, mid, high). The endpoints are
//! scanned from both ends, counting how many intervals are open at each
//! point, until `m - f` intervals overlap. `f`, the number of tolerated
//! falsetickers, starts at zero and grows until the bracket is valid or a
//! majority can no longer be formed.

use std::cmp::Ordering;

use crate::error::{Result, SyncError};

use super::round::Candidate;

/// Which part of a candidate interval an endpoint marks.
///
/// The declaration order is the tie-break order for endpoints of equal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EndpointKind {
    /// Lower bound.
    Low,
    /// Midpoint.
    Mid,
    /// Upper bound.
    High,
}

/// One of the three tagged points of a candidate interval.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    /// Which bound this is.
    pub kind: EndpointKind,
    /// Position on the offset axis, in seconds.
    pub value: f64,
    /// Index of the owning candidate.
    pub owner: usize,
}

impl Endpoint {
    /// The three endpoints of a candidate.
    #[must_use]
    pub fn of(candidate: &Candidate, owner: usize) -> [Self; 3] {
        [
            Self {
                kind: EndpointKind::Low,
                value: candidate.lower,
                owner,
            },
            Self {
                kind: EndpointKind::Mid,
                value: candidate.midpoint(),
                owner,
            },
            Self {
                kind: EndpointKind::High,
                value: candidate.upper,
                owner,
            },
        ]
    }
}

// Total order: value, then kind (Low < Mid < High), then owner. Touching
// intervals overlap from either scan direction.
impl Ord for Endpoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value
            .total_cmp(&other.value)
            .then(self.kind.cmp(&other.kind))
            .then(self.owner.cmp(&other.owner))
    }
}

impl PartialOrd for Endpoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Endpoint {}

/// Raw result of scanning the endpoints for one falseticker count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket {
    /// Value at which `m - f` intervals first overlap, from the left.
    pub lower: f64,
    /// Value at which `m - f` intervals first overlap, from the right.
    pub upper: f64,
    /// Midpoints crossed before the threshold was reached, both scans.
    pub midpoints_outside: usize,
}

/// The interval agreed on by a quorum of sources.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuorumInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Number of falsetickers tolerated to reach agreement.
    pub falsetickers: usize,
}

impl QuorumInterval {
    /// Whether the candidate's midpoint lies within the interval.
    ///
    /// Evaluated as `2l <= lower + upper <= 2u` to avoid the division.
    #[must_use]
    pub fn contains_midpoint(&self, candidate: &Candidate) -> bool {
        let sum = candidate.lower + candidate.upper;
        sum >= 2.0 * self.lower && sum <= 2.0 * self.upper
    }

    /// Width of the interval.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Runs the intersection algorithm over one round of candidates.
#[derive(Debug, Clone)]
pub struct Selector {
    endpoints: Vec<Endpoint>,
    candidates: usize,
}

impl Selector {
    /// Build and sort the `3m` endpoints of the given candidates.
    #[must_use]
    pub fn new(candidates: &[Candidate]) -> Self {
        let mut endpoints: Vec<Endpoint> = candidates
            .iter()
            .enumerate()
            .flat_map(|(i, c)| Endpoint::of(c, i))
            .collect();
        endpoints.sort_unstable();
        Self {
            endpoints,
            candidates: candidates.len(),
        }
    }

    /// Sorted endpoints.
    #[must_use]
    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Number of candidates.
    #[must_use]
    pub fn candidate_count(&self) -> usize {
        self.candidates
    }

    /// First falseticker count at which the round is abandoned: `⌈m/2⌉`.
    #[must_use]
    pub fn falseticker_limit(&self) -> usize {
        self.candidates.div_ceil(2)
    }

    /// Scan for the bracket overlapped by `m - f` intervals.
    ///
    /// Returns `None` when either scan never reaches the threshold.
    #[must_use]
    pub fn scan(&self, falsetickers: usize) -> Option<Bracket> {
        let threshold = i64::try_from(self.candidates.checked_sub(falsetickers)?).ok()?;
        let mut midpoints = 0usize;

        let lower = Self::first_overlap(
            self.endpoints.iter(),
            EndpointKind::Low,
            threshold,
            &mut midpoints,
        )?;
        let upper = Self::first_overlap(
            self.endpoints.iter().rev(),
            EndpointKind::High,
            threshold,
            &mut midpoints,
        )?;

        Some(Bracket {
            lower,
            upper,
            midpoints_outside: midpoints,
        })
    }

    fn first_overlap<'a>(
        endpoints: impl Iterator<Item = &'a Endpoint>,
        opening: EndpointKind,
        threshold: i64,
        midpoints: &mut usize,
    ) -> Option<f64> {
        let mut open = 0i64;
        for endpoint in endpoints {
            match endpoint.kind {
                EndpointKind::Mid => *midpoints += 1,
                kind if kind == opening => open += 1,
                _ => open -= 1,
            }
            if open >= threshold {
                return Some(endpoint.value);
            }
        }
        None
    }

    /// Accept the bracket for `f` falsetickers if it is valid.
    ///
    /// Valid means at most `f` midpoints fall outside and `l < u`.
    #[must_use]
    pub fn try_falsetickers(&self, falsetickers: usize) -> Option<QuorumInterval> {
        let bracket = self.scan(falsetickers)?;
        tracing::trace!(
            falsetickers,
            lower = bracket.lower,
            upper = bracket.upper,
            midpoints_outside = bracket.midpoints_outside,
            "selection bracket"
        );
        (bracket.midpoints_outside <= falsetickers && bracket.lower < bracket.upper).then_some(
            QuorumInterval {
                lower: bracket.lower,
                upper: bracket.upper,
                falsetickers,
            },
        )
    }

    /// Find the quorum interval for the smallest admissible `f`.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] for an empty round and
    /// [`SyncError::NoQuorum`] if no majority of candidates agrees.
    pub fn select(&self) -> Result<QuorumInterval> {
        if self.candidates == 0 {
            return Err(SyncError::invalid("candidates", "round has no candidates"));
        }

        let limit = self.falseticker_limit();
        (0..limit)
            .find_map(|f| self.try_falsetickers(f))
            .ok_or(SyncError::NoQuorum {
                candidates: self.candidates,
                falsetickers: limit.saturating_sub(1),
            })
    }
}
