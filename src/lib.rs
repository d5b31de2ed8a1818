//! flatconv — flat-file converters.
//!
//! Command-line shell over the two library crates. The binaries are thin:
//! they parse arguments, resolve configuration, set up logging and hand off
//! to an adapter.
//!
//! # Architecture
//!
//! ```text
//! delimited file ──► flatconv-formats::delimited ──► flatconv-core::normalize ──► JSON file
//! Solr response  ──► flatconv-formats::trec ─────────────────────────────────────► run / qrels
//! ```

use clap::error::ErrorKind;

/// Default `--log-level` for the binaries.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Parse the command line, exiting with status 1 on any usage error.
///
/// `--help` and `--version` still exit 0.
pub fn parse_args<C: clap::Parser>() -> C {
    match C::try_parse() {
        Ok(cli) => cli,
        Err(err)
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
            ) =>
        {
            err.exit()
        }
        Err(err) => {
            let _ = err.print();
            std::process::exit(1);
        }
    }
}

/// Send `tracing` output to stderr, filtered at `level` (e.g. `debug`,
/// `flatconv_formats=trace`). Stdout is reserved for tool output.
pub fn init_logging(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_new(level)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_LEVEL));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(filter)
        .init();
}
