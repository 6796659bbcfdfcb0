//! Binary entry point: the interpreter's REPL over stdin/stdout.
//!
//! Takes no arguments. `ONLINE_JUDGE` in the environment suppresses the
//! prompt for batch input; `RUST_LOG` controls log verbosity (logs go to
//! stderr, never into the protocol on stdout).

use std::io;

use schemer::{Repl, ReplConfig};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = ReplConfig::from_env();
    let stdin = io::stdin();
    let stdout = io::stdout();
    Repl::new(stdin.lock(), stdout.lock(), config).run()
}
