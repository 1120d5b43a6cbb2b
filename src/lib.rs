//! # clockquorum
//!
//! Clock-offset estimation from a quorum of noisy time sources.
//!
//! ## Features
//!
//! - Round-trip timing probes over UDP
//! - Majority-quorum interval intersection (Marzullo)
//! - Outlier-pruning clustering and width-weighted combining
//! - Atomic cross-process publication of the estimate
//! - Offset-corrected latency smoothing with an upper bound
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use clockquorum::{EstimatorConfig, FileRegister, OffsetEstimator, UdpProbeTransport};
//!
//! # async fn example() -> Result<(), clockquorum::SyncError> {
//! let config = EstimatorConfig::builder()
//!     .candidates_per_round(8)
//!     .target_survivors(3)
//!     .build()?;
//!
//! let peer = "192.0.2.10:12300".parse().expect("valid address");
//! let transport = UdpProbeTransport::connect(peer, config.probe_timeout)
//!     .await?
//!     .with_recv_buf_size(config.recv_buf_size);
//! let register = FileRegister::new(&config.estimate_path);
//!
//! let mut estimator = OffsetEstimator::new(config, transport, register)?;
//! let estimate = estimator.run_round().await?;
//! println!("offset: {:.6}s", estimate.offset);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Process level**: `OffsetEstimator` (writer) and `LatencySampler` (reader)
//! - **Algorithm level**: `OffsetPipeline` - `Selector`, `Clusterer`, `Combiner`
//! - **Low level**: probe wire format, transports and the estimate register

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

pub mod estimate;
mod estimator;
pub mod latency;
pub mod net;
pub mod protocol;
pub mod publish;

// Re-exports
pub use error::{Result, SyncError};
pub use estimate::{
    Candidate, Clusterer, Combiner, Measurement, OffsetPipeline, ProbeRound, QuorumInterval,
    RoundEstimate, Selector,
};
pub use estimator::OffsetEstimator;
pub use latency::{LatencyEstimator, LatencySampler, LatencyState};
pub use net::{ProbeResponder, ProbeTransport, UdpProbeTransport};
pub use publish::{EstimateRegister, FileRegister, MemoryRegister, PublishError};
pub use types::{EstimatorConfig, EstimatorConfigBuilder, LatencyConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        EstimateRegister, EstimatorConfig, FileRegister, LatencyConfig, LatencySampler,
        OffsetEstimator, OffsetPipeline, ProbeResponder, ProbeTransport, SyncError,
        UdpProbeTransport,
    };
}
