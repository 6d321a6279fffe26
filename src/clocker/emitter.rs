//! Best-effort MIDI output into a block buffer.
//!
//! The realtime callback writes through a [`MidiSink`] so the core stays
//! independent of the host API and tests can capture emissions. A failed
//! write means the block buffer is full; the message is dropped silently
//! because there is no safe recovery path inside a realtime deadline.

/// MIDI realtime Clock, 24 per quarter note.
pub const RT_CLOCK: u8 = 0xf8;
/// MIDI realtime Start.
pub const RT_START: u8 = 0xfa;
/// MIDI realtime Continue.
pub const RT_CONTINUE: u8 = 0xfb;
/// MIDI realtime Stop.
pub const RT_STOP: u8 = 0xfc;
/// Song Position Pointer status byte; followed by LSB and MSB data bytes.
pub const SONG_POSITION: u8 = 0xf2;

/// Sample-offset addressed MIDI output for one block.
pub trait MidiSink {
    /// Write `bytes` at `offset` samples into the block. Returns `false`
    /// when the buffer had no room; the caller must not retry.
    fn write(&mut self, offset: u32, bytes: &[u8]) -> bool;
}

/// Capturing sink for tests: records every event and can simulate a buffer
/// with limited capacity.
#[derive(Debug, Default)]
pub struct MockSink {
    pub events: Vec<(u32, Vec<u8>)>,
    pub capacity: Option<usize>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: Some(capacity),
        }
    }

    fn bytes_used(&self) -> usize {
        self.events.iter().map(|(_, bytes)| bytes.len()).sum()
    }

    /// Status bytes in emission order, for compact assertions.
    pub fn status_bytes(&self) -> Vec<u8> {
        self.events.iter().map(|(_, bytes)| bytes[0]).collect()
    }
}

impl MidiSink for MockSink {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> bool {
        if let Some(capacity) = self.capacity {
            if self.bytes_used() + bytes.len() > capacity {
                return false;
            }
        }
        self.events.push((offset, bytes.to_vec()));
        true
    }
}
