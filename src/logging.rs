// Logging - tracing subscriber setup for the binary
//
// Library code only emits `tracing` events; installing a subscriber is left
// to whoever embeds the ledger.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-oriented
    Pretty,
    /// One line per event
    Compact,
}

impl LogFormat {
    /// Parse "pretty" or "compact" (case-insensitive); anything else is Compact
    pub fn from_str_lossy(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides `default_level`.
///
/// Returns an error string if a subscriber was already installed.
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), String> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| e.to_string())
}
