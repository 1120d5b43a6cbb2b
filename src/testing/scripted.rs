//! Transport that replays a fixed script.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::error::{Result, SyncError};
use crate::estimate::Measurement;
use crate::net::ProbeTransport;

/// Replays queued probe outcomes in order.
///
/// Once the script runs out every probe times out.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: VecDeque<Result<Measurement>>,
    issued: usize,
}

impl ScriptedTransport {
    /// Create a transport that returns `measurements` in order.
    #[must_use]
    pub fn new(measurements: impl IntoIterator<Item = Measurement>) -> Self {
        Self {
            script: measurements.into_iter().map(Ok).collect(),
            issued: 0,
        }
    }

    /// Queue a successful probe.
    pub fn push(&mut self, measurement: Measurement) {
        self.script.push_back(Ok(measurement));
    }

    /// Queue a failed probe.
    pub fn push_error(&mut self, error: SyncError) {
        self.script.push_back(Err(error));
    }

    /// Outcomes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Probes issued so far.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued
    }
}

#[async_trait]
impl ProbeTransport for ScriptedTransport {
    async fn probe(&mut self) -> Result<Measurement> {
        self.issued += 1;
        self.script.pop_front().unwrap_or(Err(SyncError::Timeout))
    }
}
