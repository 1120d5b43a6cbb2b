//! Probe timestamp representation and conversions.
//!
//! Probes carry wall-clock readings as a pair of 32-bit words: whole seconds
//! since the Unix epoch and microseconds within that second. Arithmetic on
//! timestamps is done in `f64` seconds, which keeps microsecond resolution
//! for any timestamp a 32-bit seconds field can hold.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::packet::ProbeParseError;

/// Wall-clock timestamp: 32-bit seconds + 32-bit microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ProbeTimestamp {
    /// Seconds since the Unix epoch.
    pub seconds: u32,
    /// Microseconds within the current second (`0..999_999`).
    pub micros: u32,
}

impl ProbeTimestamp {
    /// Microseconds per second.
    pub const MICROS_PER_SEC: u32 = 1_000_000;

    /// Zero timestamp.
    pub const ZERO: Self = Self {
        seconds: 0,
        micros: 0,
    };

    /// Create a new timestamp, clamping microseconds to the valid range.
    #[must_use]
    pub fn new(seconds: u32, micros: u32) -> Self {
        Self {
            seconds,
            micros: micros.min(Self::MICROS_PER_SEC - 1),
        }
    }

    /// Create a timestamp from the current system time.
    #[must_use]
    pub fn now() -> Self {
        let dur = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO);
        Self::from_duration(dur)
    }

    /// Create from a duration since the Unix epoch.
    ///
    /// Seconds beyond the 32-bit range wrap, as they do on the wire.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Seconds field is 32 bits on the wire and wraps in 2106"
    )]
    pub fn from_duration(d: Duration) -> Self {
        Self {
            seconds: d.as_secs() as u32,
            micros: d.subsec_micros(),
        }
    }

    /// Create from total microseconds since the Unix epoch.
    #[must_use]
    pub fn from_micros(total: u64) -> Self {
        Self::from_duration(Duration::from_micros(total))
    }

    /// Create from fractional seconds since the Unix epoch.
    ///
    /// Negative or non-finite input yields [`Self::ZERO`].
    #[must_use]
    pub fn from_secs_f64(secs: f64) -> Self {
        Duration::try_from_secs_f64(secs).map_or(Self::ZERO, Self::from_duration)
    }

    /// Convert to total microseconds since the Unix epoch.
    #[must_use]
    pub fn to_micros(&self) -> u64 {
        u64::from(self.seconds) * u64::from(Self::MICROS_PER_SEC) + u64::from(self.micros)
    }

    /// Convert to fractional seconds.
    #[must_use]
    pub fn as_secs_f64(&self) -> f64 {
        f64::from(self.seconds) + f64::from(self.micros) / f64::from(Self::MICROS_PER_SEC)
    }

    /// Signed difference in seconds: `self - other`.
    #[must_use]
    pub fn diff_secs(&self, other: &Self) -> f64 {
        self.as_secs_f64() - other.as_secs_f64()
    }

    /// Encode as 8 bytes: seconds (BE) followed by microseconds (BE).
    #[must_use]
    pub fn encode(&self) -> [u8; 8] {
        let mut buf = [0u8; 8];
        buf[0..4].copy_from_slice(&self.seconds.to_be_bytes());
        buf[4..8].copy_from_slice(&self.micros.to_be_bytes());
        buf
    }

    /// Decode from 8 bytes.
    ///
    /// # Errors
    /// Returns [`ProbeParseError::TooShort`] if the slice is too short and
    /// [`ProbeParseError::MicrosOutOfRange`] if the microsecond word is not
    /// below one second.
    pub fn decode(data: &[u8]) -> Result<Self, ProbeParseError> {
        if data.len() < 8 {
            return Err(ProbeParseError::TooShort {
                needed: 8,
                have: data.len(),
            });
        }
        let seconds = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let micros = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        if micros >= Self::MICROS_PER_SEC {
            return Err(ProbeParseError::MicrosOutOfRange { micros });
        }
        Ok(Self { seconds, micros })
    }
}

impl std::fmt::Display for ProbeTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:06}", self.seconds, self.micros)
    }
}

impl std::ops::Sub for ProbeTimestamp {
    type Output = f64;

    fn sub(self, rhs: Self) -> Self::Output {
        self.diff_secs(&rhs)
    }
}

impl From<Duration> for ProbeTimestamp {
    fn from(d: Duration) -> Self {
        Self::from_duration(d)
    }
}
