use beatclockrs::clocker::emitter::{MockSink, RT_CLOCK, RT_CONTINUE, RT_START, RT_STOP, SONG_POSITION};
use beatclockrs::clocker::Clocker;
use beatclockrs::config::Config;
use beatclockrs::transport::{Bbt, TransportSnapshot, TransportState};

// Small enough that the scheduler never places a tick inside the block at
// 120 BPM / 48 kHz, so these tests see transition messages only.
const BLOCK: u32 = 64;
const RATE: u32 = 48_000;

fn snap(state: TransportState, frame: u64) -> TransportSnapshot {
    TransportSnapshot::new(state, frame, RATE)
}

fn snap_bbt(state: TransportState, frame: u64, bar: i32, beat: i32, tick: i32) -> TransportSnapshot {
    snap(state, frame).with_bbt(Bbt::new(bar, beat, tick, 120.0))
}

fn run(clocker: &mut Clocker, snapshot: &TransportSnapshot) -> MockSink {
    let mut sink = MockSink::new();
    clocker.process_block(snapshot, BLOCK, &mut sink);
    sink
}

#[test]
fn test_stop_transition_emits_stop_then_position() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 48_000, 1, 3, 0));

    let sink = run(&mut clocker, &snap_bbt(TransportState::Stopped, 48_000, 1, 3, 0));
    assert_eq!(sink.status_bytes(), vec![RT_STOP, SONG_POSITION]);
    // Beat 3 of bar 1 is 8 MIDI beats, plus a 16-beat pre-roll at 120 BPM.
    assert_eq!(sink.events[1].1, vec![SONG_POSITION, 24, 0]);
    assert_eq!(clocker.pending_sync(), Some(24));
}

#[test]
fn test_stop_transition_with_transport_filter_keeps_position() {
    let cfg = Config {
        no_transport: true,
        ..Config::default()
    };
    let mut clocker = Clocker::with_seed(cfg, 1);
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 48_000, 1, 3, 0));

    let sink = run(&mut clocker, &snap_bbt(TransportState::Stopped, 48_000, 1, 3, 0));
    assert_eq!(sink.status_bytes(), vec![SONG_POSITION]);
}

#[test]
fn test_stop_transition_with_position_filter_clears_pending_sync() {
    let cfg = Config {
        no_position: true,
        ..Config::default()
    };
    let mut clocker = Clocker::with_seed(cfg, 1);
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 48_000, 1, 3, 0));

    let sink = run(&mut clocker, &snap_bbt(TransportState::Stopped, 48_000, 1, 3, 0));
    assert_eq!(sink.status_bytes(), vec![RT_STOP]);
    assert_eq!(clocker.pending_sync(), None);
}

#[test]
fn test_roll_from_zero_emits_start_and_first_tick() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    let sink = run(&mut clocker, &snap_bbt(TransportState::Rolling, 0, 1, 1, 0));
    assert_eq!(sink.status_bytes(), vec![RT_START, RT_CLOCK]);
    assert_eq!(sink.events[0].0, 0);
    assert_eq!(sink.events[1].0, 0);
    assert_eq!(clocker.pending_sync(), Some(0));
}

#[test]
fn test_starting_from_zero_emits_start_but_no_tick() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    let sink = run(&mut clocker, &snap_bbt(TransportState::Starting, 0, 1, 1, 0));
    assert_eq!(sink.status_bytes(), vec![RT_START]);
}

#[test]
fn test_resume_mid_timeline_defers_continue() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    let sink = run(&mut clocker, &snap_bbt(TransportState::Rolling, 48_000, 2, 1, 0));
    assert!(sink.events.is_empty(), "Continue must wait for the sync point");
}

#[test]
fn test_resume_mid_timeline_with_position_filter_continues_immediately() {
    let cfg = Config {
        no_position: true,
        ..Config::default()
    };
    let mut clocker = Clocker::with_seed(cfg, 1);
    let sink = run(&mut clocker, &snap_bbt(TransportState::Rolling, 48_000, 2, 1, 0));
    // Nothing to sync against, so resume right away; the position filter
    // also requests an immediate tick at the block boundary.
    assert_eq!(sink.status_bytes(), vec![RT_CONTINUE, RT_CLOCK]);
}

#[test]
fn test_locate_while_stopped_announces_new_position() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 0, 1, 1, 0));
    run(&mut clocker, &snap_bbt(TransportState::Stopped, 0, 1, 1, 0));

    // Same position: quiet.
    let sink = run(&mut clocker, &snap_bbt(TransportState::Stopped, 0, 1, 1, 0));
    assert!(sink.events.is_empty());

    // Locate to bar 3: one SPP, no transport message.
    let sink = run(&mut clocker, &snap_bbt(TransportState::Stopped, 192_000, 3, 1, 0));
    assert_eq!(sink.status_bytes(), vec![SONG_POSITION]);
    // Bar 3 is 32 MIDI beats, plus the 16-beat pre-roll.
    assert_eq!(clocker.pending_sync(), Some(48));
}

#[test]
fn test_locate_while_stopped_without_bbt_is_position_unknown() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 0, 1, 1, 0));
    run(&mut clocker, &snap_bbt(TransportState::Stopped, 0, 1, 1, 0));

    let sink = run(&mut clocker, &snap(TransportState::Stopped, 192_000));
    assert!(sink.events.is_empty());
}

#[test]
fn test_locate_while_rolling_stops_and_reannounces() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    // Roll mid-timeline with no pending sync, then pass through Starting.
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 48_000, 2, 1, 0));
    let sink = run(&mut clocker, &snap_bbt(TransportState::Starting, 288_000, 4, 1, 0));
    assert!(sink.events.is_empty());

    let sink = run(&mut clocker, &snap_bbt(TransportState::Rolling, 288_000, 4, 1, 0));
    assert_eq!(sink.status_bytes(), vec![RT_STOP, SONG_POSITION]);
    // Bar 4 is 48 MIDI beats, plus the 16-beat pre-roll.
    assert_eq!(clocker.pending_sync(), Some(64));
}

#[test]
fn test_locate_back_to_origin_needs_no_continue() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    run(&mut clocker, &snap_bbt(TransportState::Rolling, 0, 1, 1, 0));
    assert_eq!(clocker.pending_sync(), Some(0));

    run(&mut clocker, &snap_bbt(TransportState::Starting, 0, 1, 1, 0));
    let sink = run(&mut clocker, &snap_bbt(TransportState::Rolling, 0, 1, 1, 0));
    // The transport implicitly starts at 0; only the immediate tick goes out.
    assert_eq!(sink.status_bytes(), vec![RT_CLOCK]);
    assert_eq!(clocker.pending_sync(), None);
}

#[test]
fn test_unknown_state_produces_no_messages() {
    let mut clocker = Clocker::with_seed(Config::default(), 1);
    let sink = run(&mut clocker, &snap(TransportState::Unknown, 0));
    assert!(sink.events.is_empty());

    let sink = run(&mut clocker, &snap(TransportState::Looping, 0));
    assert!(sink.events.is_empty());
}

#[test]
fn test_suppressing_everything_still_ticks() {
    let cfg = Config {
        no_position: true,
        no_transport: true,
        ..Config::default()
    };
    let mut clocker = Clocker::with_seed(cfg, 1);
    let sink = run(&mut clocker, &snap_bbt(TransportState::Rolling, 0, 1, 1, 0));
    assert_eq!(sink.status_bytes(), vec![RT_CLOCK]);
}
