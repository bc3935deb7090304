//! `riskcast`: classify weather risk scores, estimate custom scenarios and
//! inspect prediction records from the command line.

pub mod cli;
pub mod commands;
pub mod config;

use std::io::{self, Write};

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

pub use cli::Cli;
pub use commands::CliError;
pub use config::Config;

/// Install the process logger. `-v` raises the level one step per flag;
/// `RUST_LOG`, when set, takes precedence.
pub fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut builder = Builder::new();
    builder
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}: {}", record.level(), record.target(), record.args()))
        .parse_default_env();
    // a second init (tests, embedding) keeps the first logger
    let _ = builder.try_init();
}

/// Run a parsed command line, writing to the given streams. Returns the
/// process exit code.
pub fn run(cli: &Cli, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    let config = match Config::discover(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            let _ = writeln!(err, "error: {e}");
            return CliError::from(e).exit_code();
        }
    };
    match commands::run(&cli.command, &config, out, err) {
        Ok(()) => 0,
        Err(e) => {
            log::debug!("command failed: {e:?}");
            let _ = writeln!(err, "error: {e}");
            e.exit_code()
        }
    }
}

pub fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logger(cli.verbose);
    let stdout = io::stdout();
    let stderr = io::stderr();
    run(&cli, &mut stdout.lock(), &mut stderr.lock())
}
