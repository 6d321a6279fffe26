//! Sample-accurate clock tick scheduling within one block.
//!
//! The tick position is carried as a fractional frame count across blocks;
//! re-deriving it from integer sample counts would accumulate drift, while
//! rounding the running double keeps the error under one sample over
//! arbitrarily long runs.

use super::emitter::{MidiSink, RT_CLOCK, RT_CONTINUE};
use super::song_position::{self, PositionOffset};
use super::ClockerState;
use crate::config::Config;
use crate::transport::TransportSnapshot;

/// MIDI beat clock rate: ticks per quarter note.
pub const TICKS_PER_QUARTER: f64 = 24.0;

pub(super) fn schedule_ticks(
    state: &mut ClockerState,
    snap: &TransportSnapshot,
    n_frames: u32,
    sink: &mut dyn MidiSink,
    cfg: &Config,
) {
    let frame_rate = f64::from(snap.frame_rate);
    let mut bbt_offset: u64 = 0;

    let samples_per_beat = if cfg.force_bpm && cfg.bpm > 0.0 {
        frame_rate * 60.0 / cfg.bpm
    } else if let Some(bbt) = snap.bbt.as_ref() {
        bbt_offset = snap.bbt_offset.unwrap_or(0);
        frame_rate * 60.0 / bbt.beats_per_minute
    } else if cfg.bpm > 0.0 {
        frame_rate * 60.0 / cfg.bpm
    } else {
        // No tempo known this block; nothing to schedule.
        return;
    };

    let quarters_per_beat = if cfg.strict_bpm {
        1.0
    } else {
        snap.bbt.as_ref().map_or(1.0, |bbt| bbt.beat_type / 4.0)
    };
    let tick_interval = samples_per_beat / quarters_per_beat / TICKS_PER_QUARTER;
    if !tick_interval.is_finite() || tick_interval <= 0.0 {
        return;
    }

    let mut ticks_this_block: i64 = 0;
    loop {
        let next_tick = state.last_tick_frame + tick_interval + state.jitter_carry;
        let offset = next_tick.round() as i64 - snap.frame as i64 - bbt_offset as i64;
        if offset >= i64::from(n_frames) {
            // The next tick falls into a later block.
            break;
        }
        if offset >= 0 {
            if let Some(target) = state.pending_sync {
                if target > 0 && !cfg.no_position {
                    let current = song_position::calc(snap, PositionOffset::Beats(0), cfg)
                        .unwrap_or(-1);
                    if current + ticks_this_block / 4 >= i64::from(target) {
                        if !cfg.no_transport {
                            sink.write(offset as u32, &[RT_CONTINUE]);
                        }
                        state.pending_sync = None;
                    }
                }
            }
            sink.write(offset as u32, &[RT_CLOCK]);
        }
        // A tick before the block start is accounted but not emitted.
        state.jitter_carry = if cfg.jitter_level > 0.0 {
            state.rng.next_value() * cfg.jitter_level * tick_interval
        } else {
            0.0
        };
        state.last_tick_frame = next_tick;
        ticks_this_block += 1;
    }
}
