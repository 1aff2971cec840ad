use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `log_level` is mapped to a [`tracing_subscriber::EnvFilter`] directive.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let normalised = match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARNING" => "warn",
        "ERROR" => "error",
        other => {
            // EnvFilter rejects unknown names below and we default to info.
            return setup_logging_with(other);
        }
    };
    setup_logging_with(normalised)
}

fn setup_logging_with(directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .init();

    Ok(())
}

// ── Log-file discovery ─────────────────────────────────────────────────────────

/// The default location of the client loot log: `~/medivia/Loot.txt`.
///
/// The file does not have to exist yet; the tailer treats a missing
/// file as "no new events this poll".
pub fn default_log_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join("medivia").join("Loot.txt")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
