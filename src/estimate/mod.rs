//! Offset estimation pipeline.
//!
//! Turns one round of `m` probe measurements into a single offset:
//!
//! ```text
//! Measurements -> Candidates -> Selector -> Clusterer -> Combiner -> offset
//!                 [lo, hi]      [l, u]      survivors    weighted mean
//! ```
//!
//! Selection tolerates up to `⌈m/2⌉ - 1` falsetickers. Clustering prunes the
//! selected candidates down to a fixed count, and combining weights what is
//! left by the inverse of each interval's width.

pub mod cluster;
pub mod combine;
pub mod pipeline;
pub mod round;
pub mod select;

#[cfg(test)]
mod tests;

pub use cluster::{Clusterer, Survivor};
pub use combine::Combiner;
pub use pipeline::{OffsetPipeline, RoundEstimate};
pub use round::{Candidate, Measurement, ProbeRound};
pub use select::{Bracket, Endpoint, EndpointKind, QuorumInterval, Selector};
