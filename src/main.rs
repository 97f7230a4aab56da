use std::ffi::OsString;
use std::{env, process};

use clap::Parser;
use cygport_helper::cli::commands::execute_command;
use cygport_helper::cli::{output, Cli};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

fn main() {
    let raw: Vec<OsString> = env::args_os().collect();
    let cli = Cli::parse_from(&raw);

    setup_logging(cli.debug);

    match execute_command(&cli, &raw) {
        Ok(status) => process::exit(status.code()),
        Err(e) => {
            if e.is_resolution() {
                output::error_with_usage_hint(&e);
            } else {
                output::error(&e);
            }
            process::exit(e.exit_code());
        }
    }
}

/// `RUST_LOG` wins; otherwise `--debug` selects debug, else warnings only.
fn setup_logging(debug: bool) {
    let level = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    tracing::debug!("Debug mode: {}", level);
}
