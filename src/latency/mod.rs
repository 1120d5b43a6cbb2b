//! Latency smoothing for the consumer side of the published offset.

pub mod estimator;
pub mod log;
pub mod sampler;


pub use estimator::{LatencyEstimator, LatencyState};
pub use log::{LatencyLog, LatencyRecord};
pub use sampler::LatencySampler;
