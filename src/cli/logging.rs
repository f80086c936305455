use super::LogArgs;

use std::str::FromStr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_error::ErrorLayer;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::Layer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn get_log_level(args: LogArgs, rust_log: Option<&str>) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }

    if let Some(level) = rust_log.and_then(|l| LevelFilter::from_str(l).ok()) {
        return level;
    }

    match args.verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber, logging to stderr: human readable on a
/// terminal, JSON otherwise.
///
/// The returned guard flushes buffered logs when dropped and must be held
/// until the program exits. The flag reports whether ANSI colors are enabled.
pub fn init_global_subscriber(args: LogArgs) -> (WorkerGuard, bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let log_level = get_log_level(args, rust_log.as_deref());

    let env_filter = EnvFilter::from_default_env().add_directive(log_level.into());

    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    let mut ansi: bool = true;

    use std::io::IsTerminal;
    let fmt = if std::io::stderr().is_terminal() {
        fmt::layer()
            .without_time()
            .with_target(false)
            .with_writer(non_blocking)
            .boxed()
    } else {
        ansi = false;
        fmt::layer()
            .with_ansi(ansi)
            .json()
            .with_writer(non_blocking)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(fmt)
        .with(env_filter)
        .with(ErrorLayer::default())
        .init();

    tracing::trace!(level = %log_level, "Initialized logging");

    (guard, ansi)
}
