use std::path::Path;

use anyhow::{Result, anyhow};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Filter directive for the given verbosity.
pub fn filter_directive(verbose: bool) -> &'static str {
    if verbose {
        "staffquiz=debug,warn"
    } else {
        "staffquiz=info,warn"
    }
}

/// Initialize the logging system with tracing.
///
/// Logs go to stderr so they do not mix with the game's own output. If
/// `log_dir` is provided, logs are also written to a daily file in that
/// directory. `RUST_LOG` overrides the default filter.
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose)));

    let registry = tracing_subscriber::registry().with(filter);
    let stderr_layer = fmt::layer().with_target(true).with_writer(std::io::stderr);

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)?;
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "staffquiz.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        // The guard flushes on drop; logging lives for the whole process.
        std::mem::forget(guard);

        registry
            .with(stderr_layer)
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
    } else {
        registry
            .with(stderr_layer)
            .try_init()
            .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_parse() {
        for verbose in [false, true] {
            assert!(EnvFilter::try_new(filter_directive(verbose)).is_ok());
        }
    }
}
