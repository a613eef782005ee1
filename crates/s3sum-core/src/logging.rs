//! Logging init for the CLI: append to a log file under the XDG state dir
//! so checksum output on stdout stays clean; fall back to stderr when the
//! state dir is unwritable.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Where log output ended up after [`init`].
#[derive(Debug)]
pub enum LogSink {
    /// Appending to the given log file.
    File(PathBuf),
    /// State dir was unusable; logging to stderr.
    Stderr,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,s3sum=debug"))
}

fn open_log_file() -> anyhow::Result<(PathBuf, fs::File)> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("s3sum")?;
    let dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&dir)?;
    let path = dir.join("s3sum.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    Ok((path, file))
}

/// Initialize structured logging. The sink is chosen once, up front: the
/// state-dir log file when it can be opened, stderr otherwise, so the CLI
/// never fails just because logging is unavailable.
pub fn init() -> LogSink {
    match open_log_file() {
        Ok((path, file)) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            tracing::info!("s3sum logging to {}", path.display());
            LogSink::File(path)
        }
        Err(err) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .with_ansi(false)
                .init();
            tracing::warn!("state dir unavailable, logging to stderr: {:#}", err);
            LogSink::Stderr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_log_file_creates_file_under_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("XDG_STATE_HOME", dir.path());
        let (path, _file) = open_log_file().unwrap();
        assert!(path.starts_with(dir.path()));
        assert!(path.ends_with("s3sum.log"));
        assert!(path.exists());
        std::env::remove_var("XDG_STATE_HOME");
    }
}
