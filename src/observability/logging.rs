//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Pick the level from `RUST_LOG`, else config, raised by `-v`

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Raise `base` by `verbosity` steps (`info` + 1 → `debug`).
pub fn effective_level(base: &str, verbosity: u8) -> &'static str {
    let base = base.to_lowercase();
    let start = LEVELS.iter().position(|l| *l == base).unwrap_or(2);
    let index = (start + usize::from(verbosity)).min(LEVELS.len() - 1);
    LEVELS[index]
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("valet_nginx={level}").into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
