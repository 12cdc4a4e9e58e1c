use anyhow::Result;
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

/// `~/.config/recordsheet/logs`, if the platform has a config directory
pub fn default_log_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("recordsheet").join("logs"))
}

/// File name for a log started at the current local time
fn log_file_name() -> String {
    format!("recordsheet-{}.log", Local::now().format("%Y-%m-%d-%H-%M-%S"))
}

/// Initialize tracing with file-based logging plus warnings on stderr
///
/// Logs are written to `<logs_dir>/recordsheet-YYYY-MM-DD-HH-MM-SS.log`. The
/// returned guard flushes the file writer when dropped, so keep it alive for
/// the lifetime of the program.
pub fn init_logging(logs_dir: &Path) -> Result<(PathBuf, WorkerGuard)> {
    std::fs::create_dir_all(logs_dir)?;

    let log_filename = log_file_name();
    let log_path = logs_dir.join(&log_filename);

    // Create file appender (non-blocking)
    let file_appender = tracing_appender::rolling::never(logs_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false) // No ANSI codes in log file
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    // Default to INFO, can be overridden with RUST_LOG env var
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()?;

    Ok((log_path, guard))
}
