//! Transport transition handling.
//!
//! Runs once per block before any ticks are scheduled. The original
//! fall-through transition switch is expressed as an ordered decision table
//! over (previous state, current state, message filters, pending sync
//! target) so every branch can be exercised on its own.

use super::emitter::{MidiSink, RT_CLOCK, RT_CONTINUE, RT_START, RT_STOP};
use super::song_position::{self, PositionOffset};
use super::ClockerState;
use crate::config::Config;
use crate::transport::{TransportSnapshot, TransportState};

pub(super) fn track_block(
    state: &mut ClockerState,
    snap: &TransportSnapshot,
    sink: &mut dyn MidiSink,
    cfg: &Config,
) {
    // A locate while parked is announced right away so a chasing device can
    // pick up the new position before the next roll.
    if snap.state == TransportState::Stopped
        && state.last_transport_state == TransportState::Stopped
    {
        if let (Some(last), Some(bbt)) = (state.last_bbt, snap.bbt.as_ref()) {
            if last != (bbt.bar, bbt.beat, bbt.tick) {
                let beats = song_position::calc(snap, PositionOffset::Auto, cfg);
                state.pending_sync = song_position::encode_and_emit(beats, sink, cfg);
            }
        }
    }
    if let Some(bbt) = snap.bbt.as_ref() {
        state.last_bbt = Some((bbt.bar, bbt.beat, bbt.tick));
    }

    if snap.state == state.last_transport_state {
        return;
    }

    match snap.state {
        TransportState::Stopped => {
            if !cfg.no_transport {
                sink.write(0, &[RT_STOP]);
            }
            // The encoder decides whether the SPP actually goes out; its
            // result overwrites the pending sync target either way.
            let beats = song_position::calc(snap, PositionOffset::Auto, cfg);
            state.pending_sync = song_position::encode_and_emit(beats, sink, cfg);
        }
        TransportState::Rolling
            if state.last_transport_state == TransportState::Starting && !cfg.no_position =>
        {
            // Locate while rolling: the transport passed through Starting at
            // a new position. Re-announce the position and hold Continue
            // until the scheduler reaches the sync point.
            if state.pending_sync.is_none() && !cfg.no_transport {
                sink.write(0, &[RT_STOP]);
            }
            if state.pending_sync != Some(0) {
                let beats = song_position::calc(snap, PositionOffset::Auto, cfg);
                state.pending_sync = song_position::encode_and_emit(beats, sink, cfg);
                if state.pending_sync.is_none() && !cfg.no_transport {
                    // Position could not be announced, resume immediately.
                    sink.write(0, &[RT_CONTINUE]);
                }
            }
            if state.pending_sync == Some(0) {
                // Playback starts at the song origin anyway, no Continue
                // needed.
                state.pending_sync = None;
            }
        }
        TransportState::Rolling | TransportState::Starting
            if state.last_transport_state != TransportState::Starting =>
        {
            if snap.frame == 0 {
                if !cfg.no_transport {
                    sink.write(0, &[RT_START]);
                }
                state.pending_sync = Some(0);
            } else if cfg.no_position && !cfg.no_transport {
                // No position stream to sync against, resume right away.
                sink.write(0, &[RT_CONTINUE]);
            }
            // Otherwise the Continue stays deferred; the scheduler sends it
            // once the pending sync point is reached.
        }
        _ => {}
    }

    if snap.state == TransportState::Rolling && (snap.frame == 0 || cfg.no_position) {
        sink.write(0, &[RT_CLOCK]);
    }

    // Reset the tick accumulator to the block boundary on every transition.
    state.last_tick_frame = snap.frame as f64;
    state.last_transport_state = snap.state;
}
