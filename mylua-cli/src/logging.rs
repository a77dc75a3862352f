//! Diagnostic logging for the CLI.
//!
//! Quiet by default. `RUST_LOG` takes precedence over the `--verbose` flag:
//! ```bash
//! RUST_LOG=mylua=trace mylua-cli check file.lua
//! ```

use std::io;
use std::sync::Once;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: Once = Once::new();

/// Installs the global subscriber. Only the first call has an effect.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if verbose {
            EnvFilter::new("warn,mylua=debug,mylua_cli=debug")
        } else {
            EnvFilter::new("warn")
        };

        // stdout is reserved for tool output.
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_level(true)
            .with_filter(filter);

        tracing_subscriber::registry().with(fmt_layer).init();
    });
}
