//! Waypoint peer rendezvous and discovery point daemon.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use waypointd::cli::{Cli, Command};
use waypointd::{commands, logging};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init(&cli.log) {
        eprintln!("waypointd: {err}");
        return ExitCode::FAILURE;
    }

    let result = match cli.command {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Genkey(args) => commands::genkey::run(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // One line, no backtrace: everything terminal here is an
            // operator-correctable configuration or environment problem.
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
