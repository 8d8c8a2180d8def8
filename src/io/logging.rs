use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::Level;

/// Log file written inside the config directory
pub const LOG_FILE: &str = "debug.log";

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to create log file {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Install the global subscriber. The terminal belongs to the UI, so all
/// output goes to `<config-dir>/debug.log` as JSON lines.
pub fn init(config_dir: &Path, debug: bool) -> Result<(), LogError> {
    let path = config_dir.join(LOG_FILE);
    fs::create_dir_all(config_dir).map_err(|e| LogError::Open {
        path: path.clone(),
        source: e,
    })?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| LogError::Open {
            path: path.clone(),
            source: e,
        })?;

    let level = if debug { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt()
        .json()
        .with_max_level(level)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(file))
        .finish();

    // Already-installed subscriber (e.g. a second init in tests) is fine
    let _ = tracing::subscriber::set_global_default(subscriber);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_log_file_in_new_config_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join(".soq");
        init(&dir, true).unwrap();
        assert!(dir.join(LOG_FILE).exists());
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("file");
        fs::write(&blocker, "").unwrap();
        // A regular file where the directory should be
        let err = init(&blocker, false).unwrap_err();
        assert!(err.to_string().contains("debug.log"));
    }
}
