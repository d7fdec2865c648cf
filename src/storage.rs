//! Persistence of tournaments and player profiles.
//!
//! The core never touches storage; the application loads records at startup
//! and saves whole collections after each change.

use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// File name of the tournament collection.
pub const TOURNAMENTS_FILE: &str = "tournaments.json";
/// File name of the player profile collection.
pub const PROFILES_FILE: &str = "profiles.json";

/// Errors from loading or saving a collection.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StoreError::Json(e) => write!(f, "Malformed saved data: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Json(e)
    }
}

/// Load and save a whole collection of records.
pub trait Repository<T> {
    fn load(&self) -> Result<Vec<T>, StoreError>;
    fn save(&self, records: &[T]) -> Result<(), StoreError>;
}

/// Collection stored as one pretty-printed JSON array.
///
/// Saves are numbered by [`JsonFileStore::next_generation`] and written one at a
/// time; a save older than the last one written is skipped.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    next_generation: AtomicU64,
    /// Generation of the snapshot currently on disk.
    written: Mutex<u64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            next_generation: AtomicU64::new(0),
            written: Mutex::new(0),
            _marker: PhantomData,
        }
    }

    /// Store for `file_name` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>, file_name: &str) -> Self {
        Self::new(dir.as_ref().join(file_name))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number for the next snapshot. Take it while the data is still locked so
    /// generations follow the order of changes.
    pub fn next_generation(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl<T: Serialize> JsonFileStore<T> {
    /// Write `records` unless a newer generation is already on disk.
    /// Returns whether the file was written.
    pub fn save_generation(&self, generation: u64, records: &[T]) -> Result<bool, StoreError> {
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);
        if generation <= *written {
            log::debug!(
                "Skipping stale save {} of {:?} (generation {} on disk)",
                generation,
                self.path,
                *written
            );
            return Ok(false);
        }
        self.write_file(records)?;
        *written = generation;
        Ok(true)
    }

    /// Written to a temporary file first, then renamed over the old one.
    fn write_file(&self, records: &[T]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        log::debug!("Saved {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> for JsonFileStore<T> {
    /// A missing file is an empty collection.
    fn load(&self) -> Result<Vec<T>, StoreError> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No saved data at {:?}", self.path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let records: Vec<T> = serde_json::from_str(&data)?;
        log::info!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        self.save_generation(self.next_generation(), records)?;
        Ok(())
    }
}

/// In-memory collection (tests, ephemeral runs).
#[derive(Debug)]
pub struct MemoryStore<T> {
    records: Mutex<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone> Repository<T> for MemoryStore<T> {
    fn load(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.records.lock().map(|r| r.clone()).unwrap_or_default())
    }

    fn save(&self, records: &[T]) -> Result<(), StoreError> {
        if let Ok(mut guard) = self.records.lock() {
            *guard = records.to_vec();
        }
        Ok(())
    }
}
