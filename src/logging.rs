use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::state_dir;

pub const LOG_ENV: &str = "ISSUEDECK_LOG";
const DEFAULT_LEVEL: &str = "info";

/// Starts file logging under the state directory. The terminal belongs to the
/// UI, so nothing is written to stdout. When the log directory is unusable
/// the viewer still runs, without a log file. Keep the guard alive until exit
/// so buffered lines are flushed.
pub fn init() -> Option<WorkerGuard> {
    match init_in(&state_dir().join("logs")) {
        Ok(guard) => Some(guard),
        Err(error) => {
            eprintln!("issuedeck: file logging disabled: {:#}", error);
            None
        }
    }
}

fn init_in(log_dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "issuedeck.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow!("Failed to initialise logging: {}", error))?;

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::init_in;
    use std::fs;

    #[test]
    fn unusable_log_directory_is_reported() {
        let blocker = std::env::temp_dir().join(format!("issuedeck-log-{}", std::process::id()));
        fs::write(&blocker, "not a directory").expect("write blocker file");

        let result = init_in(&blocker.join("logs"));
        let _ = fs::remove_file(&blocker);

        let error = result.err().expect("log directory under a file must fail");
        assert!(error.to_string().contains("Failed to create log directory"));
    }
}
