//! Core types module

mod config;

#[cfg(test)]
mod tests;

pub use config::{EstimatorConfig, EstimatorConfigBuilder, LatencyConfig};
