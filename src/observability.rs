//! Logging and observability helpers.

pub mod masked;

pub use masked::Masked;

use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "dbguard.log";
const LOG_RETENTION_DAYS: u64 = 14;

/// Initializes the diagnostic `tracing` pipeline for embedding applications.
///
/// Daily-rolling JSON log files under `log_dir`, filtered by
/// `RUST_LOG` (default `dbguard=info`), with a panic hook that records the
/// panic before the default handler runs. Library code only emits through
/// `tracing` macros; hosts that already install a subscriber should skip
/// this.
pub fn init_tracing(log_dir: &Path) {
    let _ = fs::create_dir_all(log_dir);

    if let Err(e) = cleanup_old_logs(log_dir, LOG_RETENTION_DAYS) {
        eprintln!("Failed to clean up old logs: {}", e);
    }

    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbguard=info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .json()
        .with_ansi(false)
        .try_init();

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let payload = panic_info.payload();
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown cause".to_string()
        };

        tracing::error!(target: "panic", location = %location, message = %msg, "panicked");

        previous_hook(panic_info);
    }));

    tracing::info!("tracing initialized, logs under {:?}", log_dir);
}

/// Removes rolled log files older than `retention_days`.
fn cleanup_old_logs(log_dir: &Path, retention_days: u64) -> std::io::Result<()> {
    let cutoff = SystemTime::now()
        .checked_sub(Duration::from_secs(retention_days * 24 * 60 * 60))
        .unwrap_or(SystemTime::UNIX_EPOCH);

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();

        let is_log = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| name.starts_with(LOG_FILE_PREFIX))
            .unwrap_or(false);
        if !is_log {
            continue;
        }

        let modified = entry.metadata()?.modified()?;
        if modified < cutoff {
            let _ = fs::remove_file(&path);
        }
    }

    Ok(())
}
