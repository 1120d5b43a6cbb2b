//! UDP probe exchange.
//!
//! [`UdpProbeTransport`] is the client half that turns one probe round trip
//! into a [`Measurement`](crate::estimate::Measurement); [`ProbeResponder`]
//! is the server half that stamps and echoes probes.

mod responder;
mod transport;

#[cfg(test)]
mod tests;

pub use responder::ProbeResponder;
pub use transport::{ProbeTransport, UdpProbeTransport};
