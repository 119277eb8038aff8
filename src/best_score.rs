//! Best-score persistence
//!
//! One best score per variant key. Native builds keep them in a JSON file,
//! the web build in LocalStorage, tests and headless runs in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Key-value store for per-variant best scores
pub trait BestScoreStore {
    /// Stored best for `key`, `None` if nothing was saved yet
    fn best_score(&self, key: &str) -> Result<Option<u64>, PersistenceError>;

    fn set_best_score(&mut self, key: &str, score: u64) -> Result<(), PersistenceError>;
}

/// Best scores by variant key
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BestScores {
    pub scores: BTreeMap<String, u64>,
}

impl BestScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        self.scores.get(key).copied()
    }
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    scores: BestScores,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BestScoreStore for MemoryStore {
    fn best_score(&self, key: &str) -> Result<Option<u64>, PersistenceError> {
        Ok(self.scores.get(key))
    }

    fn set_best_score(&mut self, key: &str, score: u64) -> Result<(), PersistenceError> {
        self.scores.scores.insert(key.to_string(), score);
        Ok(())
    }
}

/// JSON file holding a [`BestScores`] record
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

    fn load(&self) -> Result<BestScores, PersistenceError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BestScores::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&json).map_err(|e| PersistenceError::Corrupt(e.to_string()))
    }

    /// Write through a temp file so a crash never leaves half a record
    fn save(&self, scores: &BestScores) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(scores)
            .map_err(|e| PersistenceError::Corrupt(e.to_string()))?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl BestScoreStore for JsonFileStore {
    fn best_score(&self, key: &str) -> Result<Option<u64>, PersistenceError> {
        Ok(self.load()?.get(key))
    }

    fn set_best_score(&mut self, key: &str, score: u64) -> Result<(), PersistenceError> {
        let mut scores = self.load()?;
        scores.scores.insert(key.to_string(), score);
        self.save(&scores)?;
        log::info!("Best score saved ({key} = {score})");
        Ok(())
    }
}

/// Browser LocalStorage, one item per key
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, PersistenceError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistenceError::Unavailable("no LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageStore {
    fn best_score(&self, key: &str) -> Result<Option<u64>, PersistenceError> {
        let storage = Self::storage()?;
        let item = storage
            .get_item(key)
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?;
        item.map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| PersistenceError::Corrupt(format!("{key}: {e}")))
        })
        .transpose()
    }

    fn set_best_score(&mut self, key: &str, score: u64) -> Result<(), PersistenceError> {
        Self::storage()?
            .set_item(key, &score.to_string())
            .map_err(|e| PersistenceError::Unavailable(format!("{e:?}")))?;
        log::info!("Best score saved ({key} = {score})");
        Ok(())
    }
}
