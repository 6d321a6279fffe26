pub mod cli;
pub mod clocker;
pub mod config;
pub mod jack_driver;
pub mod logging;
pub mod transport;
