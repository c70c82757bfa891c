use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_subscriber::util::SubscriberInitExt;

use crate::model::config::LoggingConfig;

use super::config_io::default_log_dir;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// Terminal owned by the TUI: file only, never the screen
    Tui,
    /// One-shot CLI command: warnings to stderr, plus the file when enabled
    Cli,
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_logging(logging: &LoggingConfig, target: LogTarget) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }

    let from_env = std::env::var("RUST_LOG").is_ok_and(|v| !v.trim().is_empty());
    let filter = if from_env {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&logging.level).map_err(|e| e.to_string())?
    };
    // Command output shares the terminal; only problems reach stderr by default
    let console_level = if from_env {
        LevelFilter::TRACE
    } else {
        LevelFilter::WARN
    };

    let mut maybe_writer = None;
    if logging.file || target == LogTarget::Tui {
        let dir = logging.directory.clone().unwrap_or_else(default_log_dir);
        std::fs::create_dir_all(&dir).map_err(|e| format!("create log dir failed: {e}"))?;
        let appender = tracing_appender::rolling::daily(dir, "atria.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        let _ = LOG_GUARD.set(guard);
        maybe_writer = Some(non_blocking);
    }

    let console_layer = (target == LogTarget::Cli).then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(console_level)
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| e.to_string())
}
