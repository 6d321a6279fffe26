//! The MIDI beat clock core.
//!
//! Everything here runs inside the host's realtime callback, once per
//! fixed-size block: no locks, no allocation, no blocking, no logging. The
//! main components are:
//! - [`Clocker`], the per-block entry point owning all mutable state
//! - the transition tracker deciding Start/Stop/Continue and Song Position
//!   emissions (`tracker`)
//! - the tick scheduler placing clock ticks at exact sample offsets
//!   (`scheduler`)
//! - [`song_position`] for MIDI-beat arithmetic and SPP encoding
//! - [`jitter::JitterRng`] for bounded random tick displacement
//! - [`emitter::MidiSink`], the seam between the core and the host buffer

pub mod emitter;
pub mod jitter;
pub mod song_position;

mod scheduler;
mod tracker;

pub use scheduler::TICKS_PER_QUARTER;

use crate::config::Config;
use crate::transport::{TransportSnapshot, TransportState};
use emitter::MidiSink;
use jitter::JitterRng;

/// State owned exclusively by the realtime callback.
///
/// Created once at startup and mutated only from `process_block`; it is
/// never shared with the control thread.
#[derive(Debug)]
struct ClockerState {
    /// Transport state seen in the previous block.
    last_transport_state: TransportState,
    /// Fractional frame position of the last accounted clock tick.
    last_tick_frame: f64,
    /// Deferred-Continue bookkeeping: `None` means no sync pending,
    /// `Some(0)` means playback starts at the song origin and needs no
    /// Continue, `Some(n)` is the MIDI beat at which Continue must fire.
    pending_sync: Option<u16>,
    /// Last valid (bar, beat, tick), to detect locates while stopped.
    last_bbt: Option<(i32, i32, i32)>,
    /// Jitter displacement to apply to the next scheduled tick.
    jitter_carry: f64,
    rng: JitterRng,
}

impl ClockerState {
    fn new(rng: JitterRng) -> Self {
        Self {
            last_transport_state: TransportState::Stopped,
            last_tick_frame: 0.0,
            pending_sync: None,
            last_bbt: None,
            jitter_carry: 0.0,
            rng,
        }
    }
}

/// Sample-accurate MIDI beat clock follower.
///
/// Feed it one [`TransportSnapshot`] per block; it writes realtime and Song
/// Position messages for that block into the given sink.
#[derive(Debug)]
pub struct Clocker {
    state: ClockerState,
    cfg: Config,
}

impl Clocker {
    pub fn new(cfg: Config) -> Self {
        Self::with_rng(cfg, JitterRng::from_clock())
    }

    /// Deterministic construction for tests and replay.
    pub fn with_seed(cfg: Config, seed: u32) -> Self {
        Self::with_rng(cfg, JitterRng::new(seed))
    }

    fn with_rng(cfg: Config, rng: JitterRng) -> Self {
        Self {
            state: ClockerState::new(rng),
            cfg,
        }
    }

    /// Process one block: handle transport transitions first, then, if the
    /// transport is rolling, schedule clock ticks across the block.
    pub fn process_block(
        &mut self,
        snap: &TransportSnapshot,
        n_frames: u32,
        sink: &mut dyn MidiSink,
    ) {
        tracker::track_block(&mut self.state, snap, sink, &self.cfg);
        if snap.state == TransportState::Rolling {
            scheduler::schedule_ticks(&mut self.state, snap, n_frames, sink, &self.cfg);
        }
    }

    /// MIDI beat at which a deferred Continue will fire, if one is pending.
    pub fn pending_sync(&self) -> Option<u16> {
        self.state.pending_sync
    }
}
