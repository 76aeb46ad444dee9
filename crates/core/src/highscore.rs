//! High score persistence
//!
//! A store is optional; without one the session keeps no high score at all.
//! Storage trouble never interrupts play: unreadable scores load as 0 and
//! failed writes are logged and dropped.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use log::{debug, warn};

/// Where the best score lives between runs
pub trait HighScoreStore: fmt::Debug {
    /// Stored best score, 0 if there is none or it cannot be read
    fn load(&self) -> u32;

    /// Replace the stored best score
    fn save(&mut self, score: u32);
}

/// Plain text file holding the score as decimal digits on its first line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> u32 {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no high score file at {}", self.path.display());
                return 0;
            }
            Err(e) => {
                warn!("reading high score {}: {}", self.path.display(), e);
                return 0;
            }
        };

        let first = text.lines().next().unwrap_or("").trim();
        match first.parse::<u32>() {
            Ok(score) => score,
            Err(e) => {
                warn!(
                    "ignoring malformed high score {:?} in {}: {}",
                    first,
                    self.path.display(),
                    e
                );
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        if let Err(e) = fs::write(&self.path, score.to_string()) {
            warn!("saving high score to {}: {}", self.path.display(), e);
        }
    }
}

/// In-memory store. Clones share the same value, so a test can keep a handle
/// after giving the store to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    best: Arc<AtomicU32>,
    saves: Arc<AtomicU32>,
}

impl MemoryHighScoreStore {
    pub fn new(initial: u32) -> Self {
        Self {
            best: Arc::new(AtomicU32::new(initial)),
            saves: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn best(&self) -> u32 {
        self.best.load(Ordering::Relaxed)
    }

    /// Number of times `save` was called
    pub fn save_count(&self) -> u32 {
        self.saves.load(Ordering::Relaxed)
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> u32 {
        self.best()
    }

    fn save(&mut self, score: u32) {
        self.best.store(score, Ordering::Relaxed);
        self.saves.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "block-party-{}-{}",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_loads_zero() {
        let store = FileHighScoreStore::new(temp_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("roundtrip");
        let mut store = FileHighScoreStore::new(&path);
        store.save(1234);
        assert_eq!(fs::read_to_string(&path).unwrap(), "1234");
        assert_eq!(store.load(), 1234);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_loads_zero() {
        let path = temp_path("malformed");
        fs::write(&path, "not a number\n42").unwrap();
        assert_eq!(FileHighScoreStore::new(&path).load(), 0);
        fs::write(&path, " 77 \nrest").unwrap();
        assert_eq!(FileHighScoreStore::new(&path).load(), 77);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_memory_store_shares_state() {
        let handle = MemoryHighScoreStore::new(10);
        let mut store = handle.clone();
        store.save(30);
        assert_eq!(handle.best(), 30);
        assert_eq!(handle.save_count(), 1);
    }
}
