use once_cell::sync::OnceCell;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// Flushes the file writer on drop; kept for the whole process.
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

pub const LOG_ENV: &str = "CLIPTRANS_LOG";

pub fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Install the global subscriber: `log.txt` next to the exe plus stderr.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init() {
    if FILE_GUARD.get().is_some() {
        return;
    }
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    let appender = tracing_appender::rolling::never(exe_dir(), "log.txt");
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok();

    if installed {
        let _ = FILE_GUARD.set(guard);
        tracing::info!("===== cliptrans start =====");
    }
}
