//! Save-file persistence.
//!
//! RULE: Only store.rs touches the filesystem for saves.
//! A store moves opaque blobs; it never interprets them. Failures are
//! reported as status text or as an empty save, never as errors.

use crate::error::GameResult;
use std::path::PathBuf;

/// The blob returned when there is nothing usable to load.
pub const EMPTY_SAVE: &str = "{}";

pub const SAVE_OK: &str = "Game saved successfully";

pub trait SaveStore {
    /// Overwrite the save with `serialized`. Returns a human-readable status.
    fn save(&mut self, serialized: &str) -> String;

    /// The last saved blob, or [`EMPTY_SAVE`] if none exists or it cannot be read.
    fn load(&self) -> String;
}

/// A single JSON file at a fixed path.
#[derive(Debug, Clone)]
pub struct FileSaveStore {
    path: PathBuf,
}

impl FileSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn write(&self, serialized: &str) -> GameResult<()> {
        std::fs::write(&self.path, serialized)?;
        Ok(())
    }

    fn read(&self) -> GameResult<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&self.path)?))
    }
}

impl SaveStore for FileSaveStore {
    fn save(&mut self, serialized: &str) -> String {
        match self.write(serialized) {
            Ok(()) => {
                log::debug!("Wrote {} bytes to {}", serialized.len(), self.path.display());
                SAVE_OK.to_string()
            }
            Err(e) => {
                log::warn!("Saving to {} failed: {e}", self.path.display());
                format!("Error saving game: {e}")
            }
        }
    }

    fn load(&self) -> String {
        match self.read() {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                log::debug!("No save at {}", self.path.display());
                EMPTY_SAVE.to_string()
            }
            Err(e) => {
                log::warn!("Reading {} failed: {e}", self.path.display());
                EMPTY_SAVE.to_string()
            }
        }
    }
}

/// Keeps the save in memory. Used in tests and by hosts that must not
/// touch the player's save file.
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    blob:        Option<String>,
    fail_writes: bool,
    /// Successful saves so far.
    pub writes:  usize,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self { blob: Some(blob.into()), ..Self::default() }
    }

    /// A store whose every save fails, as a full disk would.
    pub fn failing() -> Self {
        Self { fail_writes: true, ..Self::default() }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl SaveStore for MemorySaveStore {
    fn save(&mut self, serialized: &str) -> String {
        if self.fail_writes {
            log::warn!("In-memory save rejected");
            return "Error saving game: storage unavailable".to_string();
        }
        self.blob = Some(serialized.to_string());
        self.writes += 1;
        SAVE_OK.to_string()
    }

    fn load(&self) -> String {
        self.blob.clone().unwrap_or_else(|| EMPTY_SAVE.to_string())
    }
}
