//! Persisted preferences.
//!
//! A single flag, whether audio cues are on, stored under `isAudioEnabled`
//! as a JSON boolean in a string key-value store. Storage problems never
//! reach the caller: reads fall back to the default and writes are logged
//! and dropped.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::warn;
use serde_json::{Map, Value};
use thiserror::Error;

pub const AUDIO_ENABLED_KEY: &str = "isAudioEnabled";

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("preference store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("preference value is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preference file {0} does not hold a JSON object")]
    NotAnObject(PathBuf),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        (**self).set(key, value)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk: `{"key": "value", ...}`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>, PrefsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&text)? {
            Value::Object(map) => Ok(map),
            _ => Err(PrefsError::NotAnObject(self.path.clone())),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.read_map()?.get(key).map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

/// The audio flag, backed by a store.
pub struct AudioPreference<S> {
    store: S,
    enabled: bool,
}

impl<S: KeyValueStore> AudioPreference<S> {
    /// Read the flag. Absent means enabled (and is written back); anything
    /// unreadable also means enabled.
    pub fn load(mut store: S) -> Self {
        let enabled = match store.get(AUDIO_ENABLED_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!("ignoring stored {}={:?}: {}", AUDIO_ENABLED_KEY, raw, e);
                true
            }),
            Ok(None) => {
                if let Err(e) = store.set(AUDIO_ENABLED_KEY, "true") {
                    warn!("could not save default audio preference: {}", e);
                }
                true
            }
            Err(e) => {
                warn!("could not read audio preference: {}", e);
                true
            }
        };
        Self { store, enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        let raw = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set(AUDIO_ENABLED_KEY, raw) {
            warn!("could not save audio preference: {}", e);
        }
    }

    /// Flip the flag and persist it. Returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PrefsError> {
            Err(io::Error::other("disk on fire").into())
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), PrefsError> {
            Err(io::Error::other("disk on fire").into())
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tui-target-prefs-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let _ = fs::remove_file(&path);
        path
    }

    #[test]
    fn absent_flag_defaults_on_and_is_written_back() {
        let pref = AudioPreference::load(MemoryStore::new());
        assert!(pref.is_enabled());
        assert_eq!(
            pref.store().get(AUDIO_ENABLED_KEY).unwrap().as_deref(),
            Some("true")
        );
    }

    #[test]
    fn toggle_persists() {
        let mut pref = AudioPreference::load(MemoryStore::new());
        assert!(!pref.toggle());
        let reloaded = AudioPreference::load(pref.store().clone());
        assert!(!reloaded.is_enabled());
    }

    #[test]
    fn garbage_value_means_enabled() {
        let mut store = MemoryStore::new();
        store.set(AUDIO_ENABLED_KEY, "loud").unwrap();
        assert!(AudioPreference::load(store).is_enabled());
    }

    #[test]
    fn broken_store_never_fails() {
        let mut pref = AudioPreference::load(BrokenStore);
        assert!(pref.is_enabled());
        assert!(!pref.toggle());
    }

    #[test]
    fn file_store_round_trips_and_keeps_other_keys() {
        let path = temp_path("round-trip.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let mut pref = AudioPreference::load(FileStore::new(&path));
        assert!(pref.is_enabled());
        pref.toggle();

        let store = FileStore::new(&path);
        assert_eq!(store.get(AUDIO_ENABLED_KEY).unwrap().as_deref(), Some("false"));
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
        assert!(!AudioPreference::load(store).is_enabled());
    }

    #[test]
    fn file_store_rejects_non_object() {
        let path = temp_path("array.json");
        fs::write(&path, "[1, 2]").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(
            store.get(AUDIO_ENABLED_KEY),
            Err(PrefsError::NotAnObject(_))
        ));
        assert!(AudioPreference::load(store).is_enabled());
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let store = FileStore::new(temp_path("missing.json"));
        assert_eq!(store.get(AUDIO_ENABLED_KEY).unwrap(), None);
    }
}
