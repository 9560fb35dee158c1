//! File logging.
//!
//! The TUI owns stdout and stderr while it runs, so log records go to
//! `newsdeck.log` in the config directory instead.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "newsdeck.log";

/// Open (creating if needed) the log file under `dir` for appending.
pub fn open_log_file(dir: &Path) -> io::Result<(PathBuf, File)> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Install the global subscriber writing to the log file under `dir`.
///
/// Level comes from `RUST_LOG` (default `info`). The returned guard flushes
/// buffered records on drop and must live until exit. Returns `None` with
/// logging disabled when the file cannot be opened.
pub fn init(dir: &Path) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match open_log_file(dir) {
        Ok((path, file)) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
            Some(guard)
        }
        Err(e) => {
            eprintln!(
                "newsdeck: logging disabled, cannot open log file in {}: {}",
                dir.display(),
                e
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_open_log_file_creates_dir_and_appends() {
        let dir = std::env::temp_dir()
            .join("newsdeck_logging_test")
            .join("nested");
        std::fs::remove_dir_all(&dir).ok();

        let (path, mut file) = open_log_file(&dir).unwrap();
        assert_eq!(path, dir.join(LOG_FILE_NAME));
        writeln!(file, "first").unwrap();
        drop(file);

        let (_, mut file) = open_log_file(&dir).unwrap();
        writeln!(file, "second").unwrap();
        drop(file);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");

        if let Some(parent) = dir.parent() {
            std::fs::remove_dir_all(parent).ok();
        }
    }

    #[test]
    fn test_open_log_file_fails_when_dir_is_a_file() {
        let blocker = std::env::temp_dir().join("newsdeck_logging_blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        assert!(open_log_file(&blocker).is_err());
        std::fs::remove_file(&blocker).ok();
    }
}
