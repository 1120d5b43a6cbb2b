//! Testing utilities: synthetic measurements and fake probe transports.

mod scripted;
mod simulated;

pub use scripted::ScriptedTransport;
pub use simulated::SimulatedSource;

use crate::estimate::Measurement;
use crate::protocol::timing::ProbeTimestamp;

/// Local clock reading used as the origin of synthetic measurements.
pub const SYNTHETIC_BASE_MICROS: u64 = 1_700_000_000_000_000;

/// Responder processing time inside synthetic measurements.
pub const SYNTHETIC_PROCESSING_MICROS: i64 = 50;

#[allow(clippy::cast_possible_truncation)]
fn micros(secs: f64) -> i64 {
    (secs * 1e6).round() as i64
}

fn shifted(base: u64, delta: i64) -> ProbeTimestamp {
    ProbeTimestamp::from_micros(base.saturating_add_signed(delta))
}

/// Build the measurement a responder with clock offset `offset` would
/// produce, given one-way delays `outbound` and `inbound` (all in seconds).
///
/// The derived offset is exact when the two legs are symmetric; otherwise
/// it is off by half their difference, as with any real probe.
#[must_use]
pub fn synthetic_measurement(offset: f64, outbound: f64, inbound: f64) -> Measurement {
    let origin = ProbeTimestamp::from_micros(SYNTHETIC_BASE_MICROS);
    let receive_delta = micros(outbound + offset);
    let transmit_delta = receive_delta + SYNTHETIC_PROCESSING_MICROS;
    let destination_delta = transmit_delta - micros(offset) + micros(inbound);

    Measurement::new(
        origin,
        shifted(SYNTHETIC_BASE_MICROS, receive_delta),
        shifted(SYNTHETIC_BASE_MICROS, transmit_delta),
        shifted(SYNTHETIC_BASE_MICROS, destination_delta),
    )
}
