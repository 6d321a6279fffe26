//! JACK client plumbing around the clock core.
//!
//! The process callback queries the transport once per block, converts the
//! result into a [`TransportSnapshot`] and lets the core write into the
//! MIDI output port. Transport-level emissions are mirrored into a bounded
//! channel with a non-blocking send so the control thread can log them;
//! the callback itself never blocks, allocates or logs.

use crate::clocker::emitter::{MidiSink, RT_CONTINUE, RT_START, RT_STOP, SONG_POSITION};
use crate::clocker::Clocker;
use crate::config::Config;
use crate::transport::{Bbt, TransportSnapshot, TransportState};
use crossbeam::channel::{bounded, Receiver, Sender};
use log::warn;
use std::error::Error;
use std::fmt;

/// Transport-level events seen by the realtime callback, delivered to the
/// control thread for logging. Clock ticks are far too frequent to mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    Started,
    Stopped,
    Continued,
    PositionSent(u16),
}

/// Startup failures in the JACK client plumbing.
#[derive(Debug)]
pub enum ClientError {
    Open(jack::Error),
    Port(jack::Error),
    Activate(jack::Error),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Open(e) => write!(f, "cannot open JACK client: {}", e),
            ClientError::Port(e) => write!(f, "cannot register MIDI output port: {}", e),
            ClientError::Activate(e) => write!(f, "cannot activate JACK client: {}", e),
        }
    }
}

impl Error for ClientError {}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Events kept in flight between the callback and the control thread.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Sink writing into the block's MIDI buffer and mirroring transport-level
/// messages into the event channel.
struct PortSink<'a> {
    writer: jack::MidiWriter<'a>,
    events: &'a Sender<ClockEvent>,
}

impl MidiSink for PortSink<'_> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> bool {
        let written = self
            .writer
            .write(&jack::RawMidi {
                time: offset,
                bytes,
            })
            .is_ok();
        if written {
            let event = match bytes[0] {
                RT_START => Some(ClockEvent::Started),
                RT_STOP => Some(ClockEvent::Stopped),
                RT_CONTINUE => Some(ClockEvent::Continued),
                SONG_POSITION => {
                    let beats = u16::from(bytes[1]) | (u16::from(bytes[2]) << 7);
                    Some(ClockEvent::PositionSent(beats))
                }
                _ => None,
            };
            if let Some(event) = event {
                // Dropped when the control side lags; losing a log line is
                // acceptable, blocking the callback is not.
                let _ = self.events.try_send(event);
            }
        }
        written
    }
}

struct ClockerProcess {
    port: jack::Port<jack::MidiOut>,
    clocker: Clocker,
    events: Sender<ClockEvent>,
}

impl jack::ProcessHandler for ClockerProcess {
    fn process(&mut self, client: &jack::Client, ps: &jack::ProcessScope) -> jack::Control {
        let snapshot = query_transport(client);
        let mut sink = PortSink {
            writer: self.port.writer(ps),
            events: &self.events,
        };
        self.clocker.process_block(&snapshot, ps.n_frames(), &mut sink);
        jack::Control::Continue
    }
}

fn query_transport(client: &jack::Client) -> TransportSnapshot {
    let frame_rate = client.sample_rate() as u32;
    match client.transport().query() {
        Ok(tp) => {
            let state = match tp.state {
                jack::TransportState::Stopped => TransportState::Stopped,
                jack::TransportState::Starting => TransportState::Starting,
                jack::TransportState::Rolling => TransportState::Rolling,
                _ => TransportState::Unknown,
            };
            let bbt = tp.pos.bbt().map(|bbt| Bbt {
                bar: bbt.bar as i32,
                beat: bbt.beat as i32,
                tick: bbt.tick as i32,
                beats_per_bar: f64::from(bbt.sig_num),
                beat_type: f64::from(bbt.sig_denom),
                ticks_per_beat: bbt.ticks_per_beat,
                beats_per_minute: bbt.bpm,
            });
            TransportSnapshot {
                state,
                frame: u64::from(tp.pos.frame()),
                frame_rate,
                bbt,
                bbt_offset: None,
            }
        }
        Err(_) => TransportSnapshot::new(TransportState::Unknown, 0, frame_rate),
    }
}

/// A running clock client. Dropping it deactivates the JACK client.
pub struct ActiveClock {
    _client: jack::AsyncClient<(), ClockerProcess>,
    events: Receiver<ClockEvent>,
}

impl ActiveClock {
    /// Transport-level events mirrored out of the realtime callback.
    pub fn events(&self) -> &Receiver<ClockEvent> {
        &self.events
    }
}

/// Open a client, register the MIDI output port, activate the realtime
/// callback and connect any requested target ports.
pub fn launch(cfg: Config, client_name: &str, connect_to: &[String]) -> Result<ActiveClock> {
    let (client, _status) = jack::Client::new(client_name, jack::ClientOptions::NO_START_SERVER)
        .map_err(ClientError::Open)?;
    let port = client
        .register_port("mclk_out", jack::MidiOut::default())
        .map_err(ClientError::Port)?;
    let port_name = port.name().map_err(ClientError::Port)?;

    let (tx, rx) = bounded(EVENT_QUEUE_DEPTH);
    let process = ClockerProcess {
        port,
        clocker: Clocker::new(cfg),
        events: tx,
    };
    let active = client.activate_async((), process).map_err(ClientError::Activate)?;

    // Connections can only be made once the client is active.
    for target in connect_to {
        if let Err(e) = active.as_client().connect_ports_by_name(&port_name, target) {
            warn!("cannot connect {} to {}: {}", port_name, target, e);
            eprintln!("cannot connect {} to {}: {}", port_name, target, e);
        }
    }

    Ok(ActiveClock {
        _client: active,
        events: rx,
    })
}
