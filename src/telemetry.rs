//! Logging and progress reporting handed to the reader.
//!
//! The reader never talks to a global logger. It receives a [`Telemetry`]
//! implementation and reports through it; [`TracingTelemetry`] forwards to
//! `tracing`, which the binary configures.

use tracing::Level;

/// Sink for log events and progress milestones of an extraction.
pub trait Telemetry: Send + Sync {
    fn log(&self, level: Level, message: &str);

    /// Progress of the current extraction, from 0.0 to 1.0. Purely
    /// informational.
    fn progress(&self, fraction: f32, stage: &str);

    fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    fn warn(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }
}

/// Forwards everything to `tracing` under the `webreader` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!(target: "webreader", "{}", message),
            Level::WARN => tracing::warn!(target: "webreader", "{}", message),
            Level::INFO => tracing::info!(target: "webreader", "{}", message),
            Level::DEBUG => tracing::debug!(target: "webreader", "{}", message),
            _ => tracing::trace!(target: "webreader", "{}", message),
        }
    }

    fn progress(&self, fraction: f32, stage: &str) {
        tracing::debug!(
            target: "webreader::progress",
            percent = (fraction * 100.0).round() as u32,
            "{}",
            stage
        );
    }
}

/// Install the global `tracing` subscriber used by the binary.
///
/// Logs go to stderr so stdout stays free for results and the MCP transport.
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_filter = if verbose {
        "webreader=debug"
    } else {
        "webreader=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
