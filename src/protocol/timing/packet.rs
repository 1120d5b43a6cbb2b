//! Probe packet encoding and decoding.
//!
//! A probe is a fixed 32-byte datagram holding four timestamps. The client
//! fills `origin` before sending; the responder fills `receive` and
//! `transmit`; `reference` is reserved and echoed untouched.

use super::timestamp::ProbeTimestamp;

/// Timing probe exchanged between the estimator and a responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbePacket {
    /// Reserved reference timestamp.
    pub reference: ProbeTimestamp,
    /// Client send time.
    pub origin: ProbeTimestamp,
    /// Responder receive time.
    pub receive: ProbeTimestamp,
    /// Responder send time.
    pub transmit: ProbeTimestamp,
}

impl ProbePacket {
    /// Wire size in bytes.
    pub const SIZE: usize = 32;

    /// Create a request stamped with the given origin time.
    #[must_use]
    pub fn request(origin: ProbeTimestamp) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// Turn a received request into a response.
    #[must_use]
    pub fn respond(self, receive: ProbeTimestamp, transmit: ProbeTimestamp) -> Self {
        Self {
            receive,
            transmit,
            ..self
        }
    }

    /// Encode to bytes.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut data = [0u8; Self::SIZE];
        data[0..8].copy_from_slice(&self.reference.encode());
        data[8..16].copy_from_slice(&self.origin.encode());
        data[16..24].copy_from_slice(&self.receive.encode());
        data[24..32].copy_from_slice(&self.transmit.encode());
        data
    }

    /// Parse from bytes.
    ///
    /// # Errors
    /// Returns [`ProbeParseError::TooShort`] if fewer than [`Self::SIZE`]
    /// bytes are available and [`ProbeParseError::MicrosOutOfRange`] if any
    /// timestamp is malformed.
    pub fn decode(data: &[u8]) -> Result<Self, ProbeParseError> {
        if data.len() < Self::SIZE {
            return Err(ProbeParseError::TooShort {
                needed: Self::SIZE,
                have: data.len(),
            });
        }
        let field = |start: usize| ProbeTimestamp::decode(&data[start..start + 8]);
        Ok(Self {
            reference: field(0)?,
            origin: field(8)?,
            receive: field(16)?,
            transmit: field(24)?,
        })
    }
}

/// Errors from probe packet parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProbeParseError {
    /// Packet too short.
    #[error("packet too short: need {needed} bytes, have {have}")]
    TooShort {
        /// Minimum bytes needed.
        needed: usize,
        /// Bytes actually available.
        have: usize,
    },

    /// Microsecond word of a timestamp is one second or more.
    #[error("timestamp micros out of range: {micros}")]
    MicrosOutOfRange {
        /// The offending value.
        micros: u32,
    },
}
