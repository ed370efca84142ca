//! Entry point for the `confread` binary.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use confread_cli::{logging, run, Args};

fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(args.verbose);

    let stdout = io::stdout();
    match run(&args, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.already_reported() {
                tracing::error!("{e}");
            }
            ExitCode::FAILURE
        }
    }
}
