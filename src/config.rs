// config.rs

use crate::cli::Args;
use log::warn;

/// Pre-roll used between a relocate and the deferred Continue when the user
/// supplied an out-of-range value.
pub const DEFAULT_RESYNC_DELAY: f64 = 2.0;
/// Upper bound for the resync delay, in seconds.
pub const MAX_RESYNC_DELAY: f64 = 20.0;
/// Upper bound for the jitter option, in percent of one tick interval.
pub const MAX_JITTER_PERCENT: f64 = 20.0;

/// Runtime options for the clock core.
///
/// Built once on the control path before the realtime client is activated
/// and then moved into the process handler, which is the only reader. All
/// writes happen-before the callback starts, so no synchronization is
/// needed afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Fallback tempo in BPM, used when the transport has none. Zero
    /// disables the fallback.
    pub bpm: f64,
    /// Always use `bpm`, ignoring the transport tempo.
    pub force_bpm: bool,
    /// Seconds of pre-roll granted to downstream devices after a relocate,
    /// before the deferred Continue fires.
    pub resync_delay: f64,
    /// Tick timing jitter as a fraction of one tick interval, in [0, 0.2].
    pub jitter_level: f64,
    /// Suppress Song Position Pointer messages.
    pub no_position: bool,
    /// Suppress Start/Stop/Continue messages.
    pub no_transport: bool,
    /// Interpret tempo as quarter notes per minute regardless of meter.
    pub strict_bpm: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bpm: 0.0,
            force_bpm: false,
            resync_delay: DEFAULT_RESYNC_DELAY,
            jitter_level: 0.0,
            no_position: false,
            no_transport: false,
            strict_bpm: false,
        }
    }
}

impl Config {
    /// Validate parsed arguments into a runtime config.
    ///
    /// Out-of-range values are reset to a safe default with a diagnostic;
    /// they are never propagated into the realtime path.
    pub fn from_args(args: &Args) -> Self {
        let bpm = if args.bpm < 0.0 {
            warn!("Negative BPM {} rejected, fallback tempo disabled", args.bpm);
            0.0
        } else {
            args.bpm
        };

        let resync_delay = if (0.0..=MAX_RESYNC_DELAY).contains(&args.resync_delay) {
            args.resync_delay
        } else {
            warn!(
                "Resync delay {}s outside [0, {}], using {}s",
                args.resync_delay, MAX_RESYNC_DELAY, DEFAULT_RESYNC_DELAY
            );
            DEFAULT_RESYNC_DELAY
        };

        let jitter_level = if (0.0..=MAX_JITTER_PERCENT).contains(&args.jitter) {
            args.jitter / 100.0
        } else {
            warn!(
                "Jitter {}% outside [0, {}], jitter disabled",
                args.jitter, MAX_JITTER_PERCENT
            );
            0.0
        };

        Config {
            bpm,
            force_bpm: args.force_bpm,
            resync_delay,
            jitter_level,
            no_position: args.no_position,
            no_transport: args.no_transport,
            strict_bpm: args.strict_bpm,
        }
    }
}
