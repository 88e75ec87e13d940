//! Process logging: console plus a timestamped file per run

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use chrono::{DateTime, Local};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Mode;
use crate::utils::file_stamp;

/// `<logs_dir>/logs-<mode>-<YYYY-mm-dd_HH-MM-SS>.log`
pub fn log_file_path(logs_dir: &Path, mode: Mode, started: DateTime<Local>) -> PathBuf {
    logs_dir.join(format!("logs-{}-{}.log", mode, file_stamp(started)))
}

/// Install the global subscriber
///
/// `RUST_LOG` overrides the mode's default level. Console output goes to
/// stderr so stdout stays free for the feed. Returns the log file path.
pub fn init_logging(mode: Mode, logs_dir: &Path) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("creating logs directory {}", logs_dir.display()))?;

    let path = log_file_path(logs_dir, mode, Local::now());
    let file = File::create(&path).with_context(|| format!("creating log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(mode.default_log_level()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_path() {
        let started = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let path = log_file_path(Path::new("logs"), Mode::Prod, started);
        assert_eq!(path, PathBuf::from("logs/logs-prod-2024-03-09_07-05-01.log"));
    }
}
