//! Key-value persistence port
//!
//! Storage is injected into the game session as a trait object, never
//! reached as ambient state. Values are JSON strings under independent
//! keys. Absence, corruption, and storage failure all fall back to
//! defaults; persistence failure is never fatal to gameplay.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Durable string storage keyed by name
pub trait Storage {
    /// Read the raw value for a key, `None` on absence or failure
    fn read(&self, key: &str) -> Option<String>;
    /// Write the raw value for a key
    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()>;
}

/// Load and parse a value, returning `default` on absence, parse failure,
/// or storage failure. Never errors to the caller.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str, default: T) -> T {
    match storage.read(key) {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("corrupt value under '{}', using default: {}", key, err);
                default
            }
        },
        None => {
            log::info!("no value under '{}', using default", key);
            default
        }
    }
}

/// Serialize and write a value, best effort. Failures are logged and the
/// in-memory state is unaffected.
pub fn save<T: Serialize>(storage: &mut dyn Storage, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            log::warn!("failed to serialize '{}': {}", key, err);
            return;
        }
    };
    if let Err(err) = storage.write(key, &raw) {
        log::warn!("failed to persist '{}': {}", key, err);
    }
}

/// In-memory storage for tests and the demo driver
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed storage: one JSON file per key under a directory
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Some(raw),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("failed to read '{}': {}", key, err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)
    }
}
