//! File logging.
//!
//! The terminal is in raw mode on the alternate screen while the game runs,
//! so log records go to a file or nowhere. Level filtering follows
//! `RUST_LOG` (default `info`).

use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file: {0}")]
    Open(#[from] io::Error),

    #[error("logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

/// Install the global logger writing to `path`. Returns `Ok(false)` when no
/// path is configured.
pub fn init(path: Option<&Path>) -> Result<bool, LoggingError> {
    let Some(path) = path else {
        return Ok(false);
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_path_means_no_logger() {
        assert!(!init(None).unwrap());
    }

    #[test]
    fn unopenable_path_is_an_error() {
        let err = init(Some(Path::new("/nonexistent-dir/for/sure/log.txt"))).unwrap_err();
        assert!(matches!(err, LoggingError::Open(_)));
    }
}
