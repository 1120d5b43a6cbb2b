//! Round-trip timing probes.
//!
//! ## Probe Exchange
//!
//! ```text
//! Estimator                       Responder
//!   |--- probe (origin) ------------>|  (records receive)
//!   |<-- probe (receive, transmit) --|  (records transmit)
//!   |  (records destination)         |
//!   |                                |
//!   |  offset = ((rx-org)+(tx-dst))/2|
//!   |  RTT = (dst-org) - (tx-rx)     |
//! ```

pub mod packet;
pub mod timestamp;


pub use packet::{ProbePacket, ProbeParseError};
pub use timestamp::ProbeTimestamp;
