//! Measurements and the candidate intervals derived from them.

use crate::error::{Result, SyncError};
use crate::protocol::timing::{ProbePacket, ProbeTimestamp};

/// The four timestamps of one probe round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Local send time.
    pub origin: ProbeTimestamp,
    /// Remote receive time.
    pub receive: ProbeTimestamp,
    /// Remote send time.
    pub transmit: ProbeTimestamp,
    /// Local receive time.
    pub destination: ProbeTimestamp,
}

impl Measurement {
    /// Create a measurement from its four timestamps.
    #[must_use]
    pub fn new(
        origin: ProbeTimestamp,
        receive: ProbeTimestamp,
        transmit: ProbeTimestamp,
        destination: ProbeTimestamp,
    ) -> Self {
        Self {
            origin,
            receive,
            transmit,
            destination,
        }
    }

    /// Build a measurement from a probe response and its arrival time.
    #[must_use]
    pub fn from_response(response: &ProbePacket, destination: ProbeTimestamp) -> Self {
        Self::new(
            response.origin,
            response.receive,
            response.transmit,
            destination,
        )
    }

    /// Round-trip time in seconds, excluding the remote's processing time.
    ///
    /// RTT = (dst - org) - (tx - rx)
    #[must_use]
    pub fn rtt(&self) -> f64 {
        (self.destination - self.origin) - (self.transmit - self.receive)
    }

    /// Clock offset in seconds (remote - local).
    ///
    /// offset = ((rx - org) + (tx - dst)) / 2
    #[must_use]
    pub fn offset(&self) -> f64 {
        ((self.receive - self.origin) + (self.transmit - self.destination)) / 2.0
    }
}

/// Interval that contains the true offset if its source is a truechimer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Lower bound: offset - rtt/2.
    pub lower: f64,
    /// Upper bound: offset + rtt/2.
    pub upper: f64,
}

impl Candidate {
    /// Create a candidate from explicit bounds.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Derive the candidate interval of a measurement.
    #[must_use]
    pub fn from_measurement(measurement: &Measurement) -> Self {
        let offset = measurement.offset();
        let half_rtt = measurement.rtt() / 2.0;
        Self {
            lower: offset - half_rtt,
            upper: offset + half_rtt,
        }
    }

    /// Midpoint of the interval.
    #[must_use]
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Width of the interval. Negative when the clocks misbehaved.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether both bounds are finite numbers.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}

/// Collects the `m` measurements of one decision round.
#[derive(Debug, Clone)]
pub struct ProbeRound {
    expected: usize,
    measurements: Vec<Measurement>,
}

impl ProbeRound {
    /// Start a round that expects `expected` measurements.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            measurements: Vec::with_capacity(expected),
        }
    }

    /// Build a round from already collected measurements.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] if more than `expected`
    /// measurements are supplied.
    pub fn from_measurements(expected: usize, measurements: Vec<Measurement>) -> Result<Self> {
        if measurements.len() > expected {
            return Err(SyncError::invalid(
                "measurements",
                format!("got {} for a round of {expected}", measurements.len()),
            ));
        }
        Ok(Self {
            expected,
            measurements,
        })
    }

    /// Add a measurement to the round.
    ///
    /// # Errors
    /// Returns [`SyncError::InvalidInput`] if the round is already complete.
    pub fn push(&mut self, measurement: Measurement) -> Result<()> {
        if self.is_complete() {
            return Err(SyncError::invalid(
                "measurement",
                format!("round already holds {} measurements", self.expected),
            ));
        }
        self.measurements.push(measurement);
        Ok(())
    }

    /// Whether all expected measurements have arrived.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.measurements.len() >= self.expected
    }

    /// Number of measurements collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    /// Whether no measurement has been collected yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Number of measurements the round needs.
    #[must_use]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Collected measurements.
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Convert every measurement into its candidate interval.
    ///
    /// # Errors
    /// Returns [`SyncError::IncompleteRound`] if the round is not complete
    /// and [`SyncError::InvalidInput`] if a measurement produces a
    /// non-finite interval.
    pub fn candidates(&self) -> Result<Vec<Candidate>> {
        if self.expected == 0 || !self.is_complete() {
            return Err(SyncError::IncompleteRound {
                round: 0,
                collected: self.measurements.len(),
                expected: self.expected,
                source: None,
            });
        }

        self.measurements
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let candidate = Candidate::from_measurement(m);
                if candidate.is_finite() {
                    Ok(candidate)
                } else {
                    Err(SyncError::invalid(
                        "measurement",
                        format!("measurement {i} yields a non-finite interval"),
                    ))
                }
            })
            .collect()
    }
}
