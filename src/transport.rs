//! Transport position types shared between the host driver and the clock core.
//!
//! A [`TransportSnapshot`] is taken once per process block and describes the
//! host transport at the start of that block. The core never talks to the
//! host directly; it only sees snapshots.

/// Host transport run-state at the start of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Starting,
    Rolling,
    Looping,
    Unknown,
}

/// Bar|Beat|Tick position with the meter and tempo that were valid for it.
///
/// `bar` and `beat` are 1-based, `tick` is 0-based, matching the host
/// transport convention.
#[derive(Debug, Clone, PartialEq)]
pub struct Bbt {
    pub bar: i32,
    pub beat: i32,
    pub tick: i32,
    pub beats_per_bar: f64,
    pub beat_type: f64,
    pub ticks_per_beat: f64,
    pub beats_per_minute: f64,
}

impl Bbt {
    /// A 4/4 position at the given tempo with the common 1920 ticks per beat.
    pub fn new(bar: i32, beat: i32, tick: i32, beats_per_minute: f64) -> Self {
        Self {
            bar,
            beat,
            tick,
            beats_per_bar: 4.0,
            beat_type: 4.0,
            ticks_per_beat: 1920.0,
            beats_per_minute,
        }
    }
}

/// Everything the clock core needs to know about one block.
///
/// `bbt` is `None` when the transport does not carry a valid musical
/// position; `bbt_offset` is the frame offset of the BBT information when the
/// host supplies one.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportSnapshot {
    pub state: TransportState,
    pub frame: u64,
    pub frame_rate: u32,
    pub bbt: Option<Bbt>,
    pub bbt_offset: Option<u64>,
}

impl TransportSnapshot {
    pub fn new(state: TransportState, frame: u64, frame_rate: u32) -> Self {
        Self {
            state,
            frame,
            frame_rate,
            bbt: None,
            bbt_offset: None,
        }
    }

    pub fn with_bbt(mut self, bbt: Bbt) -> Self {
        self.bbt = Some(bbt);
        self
    }
}
