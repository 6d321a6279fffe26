use clap::Parser;

/// Generate a MIDI Beat Clock from the JACK transport.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Fallback tempo in BPM when the transport does not provide one (0 disables)
    #[arg(short = 'b', long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub bpm: f64,

    /// Always use the fallback tempo, ignoring the transport tempo
    #[arg(short = 'B', long)]
    pub force_bpm: bool,

    /// Seconds of pre-roll between a relocate and the deferred Continue (0-20)
    #[arg(short = 'd', long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub resync_delay: f64,

    /// Random tick timing jitter in percent of one tick interval (0-20)
    #[arg(short = 'J', long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub jitter: f64,

    /// Do not send Song Position Pointer messages
    #[arg(short = 'P', long)]
    pub no_position: bool,

    /// Do not send Start/Stop/Continue messages
    #[arg(short = 'T', long)]
    pub no_transport: bool,

    /// Interpret tempo as quarter notes per minute regardless of meter
    #[arg(short = 's', long)]
    pub strict_bpm: bool,

    /// JACK client name
    #[arg(short = 'n', long, default_value = "beatclockrs")]
    pub client_name: String,

    /// MIDI ports to connect the clock output to after activation
    pub connect_to: Vec<String>,
}
