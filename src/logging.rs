use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Worker guards of the non-blocking writers.
///
/// Must stay alive for the lifetime of the process; dropping them flushes
/// and detaches the writers, after which log lines are lost.
pub struct LogGuards {
    _stdout: tracing_appender::non_blocking::WorkerGuard,
    _file: tracing_appender::non_blocking::WorkerGuard,
}

/// Initializes the global tracing subscriber: stdout plus a daily rotated
/// file under the configured directory.
///
/// Call once at startup. Fails if another subscriber was installed first.
pub fn init(cfg: &LoggingConfig) -> anyhow::Result<LogGuards> {
    std::fs::create_dir_all(&cfg.directory)?;

    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily(&cfg.directory, &cfg.file_prefix);
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cfg.filter.clone().into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .try_init()?;

    // Guards am Leben halten, damit die Non-Blocking Writer korrekt flushen
    Ok(LogGuards { _stdout: stdout_guard, _file: file_guard })
}
