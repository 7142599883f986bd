//! Logging setup
//!
//! - JSON file logging (daily rolling, non-blocking writer)
//! - Compact console logging on stderr (verbose mode only, stdout is the REPL)

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug,hyper=info,reqwest=info,h2=info,rustls=info")
        } else {
            EnvFilter::new("info,hyper=warn,reqwest=warn,h2=warn,rustls=warn")
        }
    })
}

/// Initialize logging for interactive binaries.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// lifetime of `main`.
pub fn init_logging(log_dir: &Path, file_prefix: &str, verbose: bool) -> anyhow::Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;

    let file_appender = tracing_appender::rolling::daily(log_dir, format!("{}.log", file_prefix));
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter(verbose))
            .with(
                fmt::layer()
                    .with_target(false)
                    .compact()
                    .with_writer(std::io::stderr),
            )
            .with(fmt::layer().json().with_writer(non_blocking))
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter(verbose))
            .with(fmt::layer().json().with_writer(non_blocking))
            .try_init()
            .ok();
    }

    tracing::info!(log_dir = %log_dir.display(), verbose, "Logging initialized");
    Ok(guard)
}

/// Initialize console-only logging (for the HTTP service)
pub fn init_console_logging(verbose: bool) {
    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_target(false).compact())
        .try_init()
        .ok();
}
