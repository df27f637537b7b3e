//! Tracing initialization and subscriber setup.
//!
//! This module configures the tracing subscriber, setting up the pipeline from
//! `tracing` macros to a daily rolling JSON log file.

use crate::Config;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the tracing subscriber with file-based JSON output.
///
/// Sets up a tracing subscriber pipeline that:
/// 1. Filters events based on `RUST_LOG` or the configured trace level
/// 2. Formats each event as one JSON object, with its span context
/// 3. Writes through a non-blocking writer to a daily rolling file
///
/// # Parameters
///
/// * `config` - Configuration providing `trace_level` and `log_dir`
///
/// # Returns
///
/// The writer guard; buffered log lines are flushed when it is dropped, so the
/// caller keeps it alive for the lifetime of the program. `None` if the log
/// directory cannot be created, in which case logging stays off.
///
/// # Trace Level Resolution
///
/// 1. `RUST_LOG` environment variable, if set and valid
/// 2. `config.trace_level`, if set
/// 3. Default: `"info"`
///
/// # File Location
///
/// `<log_dir>/roster.log.<date>`, where `log_dir` defaults to
/// `<data dir>/roster/logs`. Nothing is ever written to stdout, which belongs
/// to the terminal front-end.
///
/// # Initialization Behavior
///
/// Idempotent: safe to call multiple times, only the first call installs a
/// subscriber.
///
/// # Example
///
/// ```no_run
/// use roster::observability::init_tracing;
/// use roster::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// let _guard = init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let level = config
        .trace_level
        .clone()
        .unwrap_or_else(|| "info".to_string());

    let log_dir = config.log_dir();
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, "roster.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(writer),
        );

    let _ = subscriber.try_init();
    Some(guard)
}
