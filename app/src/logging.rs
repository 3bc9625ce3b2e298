//! FILENAME: app/src/logging.rs
//! PURPOSE: Logger setup for the command-line binary.
//! CONTEXT: Library crates only use the `log` facade; the binary decides where
//! records go. `RUST_LOG` overrides the default `info` filter.

use std::sync::Once;

static INIT: Once = Once::new();

/// Installs an stderr logger. Later calls are no-ops, so tests and the binary
/// can both call it.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Stderr)
            .try_init();
    });
}
