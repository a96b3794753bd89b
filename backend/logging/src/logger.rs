//! Structured Logger
//!
//! Wraps `tracing` with a console layer, an optional daily-rolling JSON
//! file layer, and `RUST_LOG`-aware level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix for rolled log files (`activitylog.log.YYYY-MM-DD`).
const LOG_FILE_PREFIX: &str = "activitylog.log";

/// Initialize the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. With `log_dir = None` only the
/// console layer is installed. Returns `false` if a subscriber was already
/// set (tests, embedding hosts).
pub fn init_logger(log_dir: Option<&Path>, level: &str) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(appender)
            .with_ansi(false)
    });

    // Console goes to stderr so CLI JSON output on stdout stays clean.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        let _first = init_logger(None, "debug");
        assert!(!init_logger(None, "info"));
    }
}
