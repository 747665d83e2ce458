//! `logpack-dump`: render MessagePack log records as JSON lines.
//!
//! Usage:
//!   logpack-dump [--config FILE] [--hex] [INPUT]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use std::process::ExitCode;

use clap::Parser;
use logpack::cli::{run, DumpArgs};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "logpack=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = DumpArgs::parse();
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "logpack-dump failed");
            ExitCode::FAILURE
        }
    }
}
