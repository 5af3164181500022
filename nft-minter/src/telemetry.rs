use std::path::Path;

use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Default directory for the rolling debug log.
pub const LOG_DIR: &str = "logs";

fn stdout_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber: human-readable output on stdout filtered by
/// `RUST_LOG`, plus an hourly rolling file in `log_dir` that always records
/// this crate at debug level.
///
/// The returned guard flushes the file writer when dropped and must be held
/// for the life of the process. Without a writable `log_dir` only stdout is
/// used.
pub fn setup_telemetry(log_dir: &Path) -> Option<WorkerGuard> {
    let stdout_layer = fmt::Layer::new()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_filter(stdout_filter());

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::HOURLY)
        .filename_prefix("nft-minter")
        .filename_suffix("log")
        .max_log_files(24)
        .build(log_dir);

    match file_appender {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::Layer::new()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(EnvFilter::new("info,nft_minter=debug,nft_mint_client=debug"));
            let installed = tracing_subscriber::registry()
                .with(stdout_layer)
                .with(file_layer)
                .try_init();
            installed.ok().map(|_| guard)
        }
        Err(e) => {
            eprintln!(
                "Warning: cannot write logs to {}: {}. Logging to stdout only.",
                log_dir.display(),
                e
            );
            let _ = tracing_subscriber::registry().with(stdout_layer).try_init();
            None
        }
    }
}
