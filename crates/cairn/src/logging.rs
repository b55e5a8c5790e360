//! Log setup for cairn hosts.
//!
//! Terminal hosts own stdout, so logs go to a file. The filter comes from
//! the `CAIRN_LOG` environment variable (same syntax as `RUST_LOG`) and
//! defaults to `info`.

use std::path::Path;
use std::sync::Mutex;

use cairn_core::log_to_file;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const ENV_VAR: &str = "CAIRN_LOG";

/// Errors from [`init`].
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to install the global subscriber: {0}")]
    Init(String),
}

/// Install a global `tracing` subscriber appending to the file at `path`.
///
/// Fails if the file cannot be opened or a global subscriber is already
/// installed.
pub fn init(path: impl AsRef<Path>) -> Result<(), LoggingError> {
    let file = log_to_file(path)?;
    let filter = EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        let path = std::env::temp_dir().join(format!("cairn-logging-{}.log", std::process::id()));
        init(&path).unwrap();
        tracing::info!("logging ready");
        assert!(path.exists());

        assert!(matches!(init(&path), Err(LoggingError::Init(_))));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn unopenable_path_is_an_io_error() {
        let path = std::env::temp_dir().join("cairn-missing-dir").join("nested").join("x.log");
        assert!(matches!(init(path), Err(LoggingError::Io(_))));
    }
}
