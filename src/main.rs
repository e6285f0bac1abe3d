//! Stash CLI - token-addressed document storage

use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    if let Err(e) = stash_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
