//! Runtime configuration loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `TUI_TARGET_SEED` | time-based | Seed for the round generator |
//! | `TUI_TARGET_LOG_PATH` | unset (no logging) | File that receives log output |
//! | `TUI_TARGET_PREFS_PATH` | `$HOME/.tui-target.json` | Preference store |
//! | `TUI_TARGET_FRAME_MS` | 16 | Input poll / redraw interval |
//!
//! Unparsable values fall back to the default.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DEFAULT_FRAME_MS: u64 = 16;
const PREFS_FILE_NAME: &str = ".tui-target.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub seed: u64,
    pub log_path: Option<PathBuf>,
    pub prefs_path: PathBuf,
    pub frame: Duration,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable source (tests pass a map instead of the
    /// process environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let seed = non_empty("TUI_TARGET_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(time_seed);

        let log_path = non_empty("TUI_TARGET_LOG_PATH").map(PathBuf::from);

        let prefs_path = non_empty("TUI_TARGET_PREFS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| match non_empty("HOME") {
                Some(home) => PathBuf::from(home).join(PREFS_FILE_NAME),
                None => PathBuf::from(PREFS_FILE_NAME),
            });

        let frame_ms = non_empty("TUI_TARGET_FRAME_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_FRAME_MS);

        Self {
            seed,
            log_path,
            prefs_path,
            frame: Duration::from_millis(frame_ms),
        }
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> RuntimeConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        RuntimeConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn reads_every_variable() {
        let c = config(&[
            ("TUI_TARGET_SEED", "42"),
            ("TUI_TARGET_LOG_PATH", "/tmp/target.log"),
            ("TUI_TARGET_PREFS_PATH", "/tmp/prefs.json"),
            ("TUI_TARGET_FRAME_MS", "33"),
        ]);
        assert_eq!(c.seed, 42);
        assert_eq!(c.log_path, Some(PathBuf::from("/tmp/target.log")));
        assert_eq!(c.prefs_path, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(c.frame, Duration::from_millis(33));
    }

    #[test]
    fn falls_back_on_missing_or_bad_values() {
        let c = config(&[
            ("HOME", "/home/someone"),
            ("TUI_TARGET_LOG_PATH", "   "),
            ("TUI_TARGET_FRAME_MS", "0"),
        ]);
        assert_eq!(c.log_path, None);
        assert_eq!(c.prefs_path, PathBuf::from("/home/someone/.tui-target.json"));
        assert_eq!(c.frame, Duration::from_millis(DEFAULT_FRAME_MS));

        let c = config(&[("TUI_TARGET_FRAME_MS", "fast")]);
        assert_eq!(c.prefs_path, PathBuf::from(PREFS_FILE_NAME));
        assert_eq!(c.frame, Duration::from_millis(DEFAULT_FRAME_MS));
    }

    #[test]
    fn test_config_from_env() {
        // only checks that reading the real environment does not panic
        let _config = RuntimeConfig::from_env();
    }
}
