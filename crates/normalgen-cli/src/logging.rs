//! Diagnostic logging setup.

use tracing::Level;

/// Install a stderr subscriber for the library's `tracing` events.
///
/// Only warnings are shown unless `verbose` is set. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
