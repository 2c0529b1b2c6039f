//! Diagnostic logging to stderr.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

/// Install the global subscriber. `RUST_LOG` wins over `level`; an unknown
/// level falls back to `warn`.
///
/// Calling it twice is harmless, the second call is ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_to_filter_str(level)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn level_to_filter_str(level: &str) -> &'static str {
    let wanted = level.trim().to_ascii_lowercase();
    LEVELS
        .iter()
        .find(|l| **l == wanted)
        .copied()
        .unwrap_or("warn")
}
