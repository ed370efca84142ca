//! Logging setup for the command-line tool.
//!
//! Initializes structured logging using `tracing` and `tracing-subscriber`.
//! `RUST_LOG` wins when set; otherwise the level follows the `-v` count.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directive for a `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the global subscriber, writing to stderr.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    init_with_writer(filter, fmt::writer::BoxMakeWriter::new(std::io::stderr));
}

/// Initialize the global subscriber with a custom filter and writer.
pub fn init_with_writer<W>(filter: EnvFilter, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false)
        .init();
}
