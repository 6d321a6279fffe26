use beatclockrs::{
    cli::Args,
    config::Config,
    jack_driver::{self, ActiveClock, ClockEvent},
    logging,
};
use clap::Parser;

fn main() {
    initialize_logging();
    let args = Args::parse();
    let cfg = Config::from_args(&args);
    log::info!("Configuration: {:?}", cfg);

    match jack_driver::launch(cfg, &args.client_name, &args.connect_to) {
        Ok(clock) => run_event_loop(&clock),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn initialize_logging() {
    logging::init_logger().expect("Logger initialization failed");
    log::info!("Application starting");
}

fn run_event_loop(clock: &ActiveClock) {
    log::info!("MIDI clock running");
    println!("\nSending MIDI clock. Press Ctrl+C to exit...");
    loop {
        match clock.events().recv() {
            Ok(ClockEvent::Started) => log::info!("Transport started, clock running from 0"),
            Ok(ClockEvent::Stopped) => log::info!("Transport stopped"),
            Ok(ClockEvent::Continued) => log::info!("Transport continued"),
            Ok(ClockEvent::PositionSent(beats)) => {
                log::info!("Song position sent: {} MIDI beats", beats)
            }
            Err(_) => break,
        }
    }
}
