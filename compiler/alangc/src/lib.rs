//! Alang command-line driver.
//!
//! `alang run` interprets a file with `alang_eval`; `alang build` lowers it
//! with `alang_graph`, verifies the graph and dumps it.

pub mod commands;
pub mod diagnostic;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Enable with e.g. `RUST_LOG=alang_eval=debug`
/// or `RUST_LOG=alang_graph=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
