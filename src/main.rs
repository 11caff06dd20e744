//! kapsule CLI entry point.

use clap::error::ErrorKind;
use kapsule::{Dispatcher, KapsuleConfig};
use tracing_subscriber::EnvFilter;

mod cli;

/// Environment variable selecting the log format (`json` or text).
const LOG_FORMAT_ENV: &str = "KAPSULE_LOG_FORMAT";

fn main() {
    let parsed = match cli::parse_from(std::env::args_os()) {
        Ok(p) => p,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            // bare `kapsule` shows help on stderr but is not a failure
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = e.print();
                std::process::exit(0);
            }
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    // Initialize logging based on RUST_LOG or default to warn
    init_logging();

    tracing::debug!(version = kapsule::VERSION, command = parsed.spec.name, "starting kapsule");

    let config = match KapsuleConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            KapsuleConfig::from_env()
        }
    };

    let dispatcher = Dispatcher::new(&config.backend);
    if let Err(e) = dispatcher.dispatch(parsed.spec, &parsed.args) {
        tracing::error!(error = %e.source, command = parsed.spec.name, "command failed");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Initialize the tracing subscriber.
fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kapsule=warn"));

    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
