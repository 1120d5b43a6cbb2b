//! Transport backed by a simulated remote clock.

use async_trait::async_trait;
use rand::Rng;

use crate::error::Result;
use crate::estimate::Measurement;
use crate::net::ProbeTransport;

use super::synthetic_measurement;

/// Remote clock with a fixed offset behind a jittery link.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    /// True offset of the remote clock in seconds.
    pub offset: f64,
    /// Base one-way delay in seconds.
    pub delay: f64,
    /// Maximum extra delay per leg in seconds.
    pub jitter: f64,
    probes: u64,
}

impl SimulatedSource {
    /// Create a source with no jitter.
    #[must_use]
    pub fn new(offset: f64, delay: f64) -> Self {
        Self {
            offset,
            delay,
            jitter: 0.0,
            probes: 0,
        }
    }

    /// Add up to `jitter` seconds to each leg, drawn independently.
    #[must_use]
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter.max(0.0);
        self
    }

    /// Probes answered so far.
    #[must_use]
    pub fn probes(&self) -> u64 {
        self.probes
    }

    /// Produce one measurement without going through the trait.
    #[must_use]
    pub fn measure(&mut self) -> Measurement {
        let mut rng = rand::thread_rng();
        let outbound = self.delay + rng.gen_range(0.0..=self.jitter);
        let inbound = self.delay + rng.gen_range(0.0..=self.jitter);
        self.probes += 1;
        synthetic_measurement(self.offset, outbound, inbound)
    }
}

#[async_trait]
impl ProbeTransport for SimulatedSource {
    async fn probe(&mut self) -> Result<Measurement> {
        Ok(self.measure())
    }
}
