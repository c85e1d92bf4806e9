//! High score persistence
//!
//! The high score is a single integer stored under a fixed key. The file
//! store keeps a flat JSON object so unrelated keys written by other tools
//! survive a save.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Key the high score is stored under
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

/// Scalar key-value storage for the high score
pub trait HighScoreStore {
    /// Read the stored high score; `Ok(None)` when nothing has been stored yet
    fn load(&self) -> Result<Option<u32>>;

    /// Overwrite the stored high score
    fn save(&mut self, high_score: u32) -> Result<()>;
}

/// High score kept in memory for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<u32>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: u32) -> Self {
        Self { value: Some(value) }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&self) -> Result<Option<u32>> {
        Ok(self.value)
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        self.value = Some(high_score);
        Ok(())
    }
}

/// High score stored in a JSON object on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        let json = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read scores from {:?}", self.path))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse scores in {:?}", self.path))
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&self) -> Result<Option<u32>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let map = self.read_map()?;
        match map.get(HIGH_SCORE_KEY) {
            None => Ok(None),
            Some(value) => {
                let score = value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .with_context(|| format!("Invalid high score value: {}", value))?;
                Ok(Some(score))
            }
        }
    }

    fn save(&mut self, high_score: u32) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {:?}", parent))?;
            }
        }

        // A corrupt file is replaced rather than blocking the save
        let mut map = if self.path.exists() {
            self.read_map().unwrap_or_default()
        } else {
            Map::new()
        };
        map.insert(HIGH_SCORE_KEY.to_string(), Value::from(high_score));

        let json = serde_json::to_string_pretty(&map).context("Failed to serialize scores")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write scores to {:?}", self.path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);
        store.save(7).unwrap();
        assert_eq!(store.load().unwrap(), Some(7));
    }

    #[test]
    fn test_missing_file_means_no_score() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("scores.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("scores.json");

        let mut store = JsonFileStore::new(&path);
        store.save(12).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.load().unwrap(), Some(12));
    }

    #[test]
    fn test_save_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, r#"{"volume": 3}"#).unwrap();

        let mut store = JsonFileStore::new(&path);
        store.save(4).unwrap();

        let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["volume"], 3);
        assert_eq!(json[HIGH_SCORE_KEY], 4);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(store.load().is_err());
    }

    #[test]
    fn test_corrupt_file_is_replaced_on_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.json");
        std::fs::write(&path, "not json").unwrap();

        let mut store = JsonFileStore::new(&path);
        store.save(9).unwrap();
        assert_eq!(store.load().unwrap(), Some(9));
    }
}
