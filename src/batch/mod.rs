/// JSON batch configuration.
pub mod config;
/// Sequential record runner.
pub mod runner;
