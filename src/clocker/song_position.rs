//! Song Position Pointer calculation and encoding.
//!
//! MIDI counts song position in MIDI beats: one MIDI beat is six clock
//! ticks, four MIDI beats make one quarter note. The 3-byte wire message
//! carries the count as a 14-bit little-endian pair of 7-bit data bytes.

use super::emitter::{MidiSink, SONG_POSITION};
use crate::config::Config;
use crate::transport::TransportSnapshot;

/// Largest song position expressible in 14 bits.
pub const MAX_SONG_POSITION: i64 = 0x3fff;

/// How the MIDI-beat offset for [`calc`] is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOffset {
    /// No pre-roll at the song origin, otherwise a pre-roll of
    /// `resync_delay` seconds worth of MIDI beats. Gives a chasing device
    /// time to lock before the deferred Continue fires.
    Auto,
    /// A fixed offset in MIDI beats.
    Beats(i64),
}

/// Song position of the snapshot in MIDI beats, plus the requested offset.
///
/// Returns `None` when the snapshot has no valid BBT position. The result
/// may exceed the 14-bit wire range; [`encode_and_emit`] rejects that case.
/// Pure function of its inputs: calling it twice yields the same result.
pub fn calc(snap: &TransportSnapshot, offset: PositionOffset, cfg: &Config) -> Option<i64> {
    let bbt = snap.bbt.as_ref()?;
    let offset = match offset {
        PositionOffset::Beats(beats) => beats,
        PositionOffset::Auto => {
            if bbt.bar == 1 && bbt.beat == 1 && bbt.tick == 0 {
                0
            } else {
                (bbt.beats_per_minute * 4.0 * cfg.resync_delay / 60.0).round() as i64
            }
        }
    };
    let beats = 4 * ((i64::from(bbt.bar) - 1) * bbt.beats_per_bar as i64 + (i64::from(bbt.beat) - 1))
        + (4.0 * f64::from(bbt.tick) / bbt.ticks_per_beat).floor() as i64;
    Some(offset + beats)
}

/// The 3-byte Song Position Pointer message.
pub fn encode(beats: u16) -> [u8; 3] {
    [
        SONG_POSITION,
        (beats & 0x7f) as u8,
        ((beats >> 7) & 0x7f) as u8,
    ]
}

/// Emit an SPP for `beats` at the start of the block.
///
/// Returns the emitted beat count, or `None` when position messages are
/// suppressed, the position is unknown or outside the 14-bit range, or the
/// block buffer had no room. Callers store the result as the pending sync
/// target, so a suppressed emission also clears any pending sync.
pub fn encode_and_emit(
    beats: Option<i64>,
    sink: &mut dyn MidiSink,
    cfg: &Config,
) -> Option<u16> {
    if cfg.no_position {
        return None;
    }
    let beats = beats?;
    if !(0..=MAX_SONG_POSITION).contains(&beats) {
        return None;
    }
    let beats = beats as u16;
    if sink.write(0, &encode(beats)) {
        Some(beats)
    } else {
        None
    }
}
