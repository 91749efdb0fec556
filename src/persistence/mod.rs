//! Cross-run progress persistence
//!
//! Features:
//! - Versioned JSON snapshot, missing fields take defaults
//! - Atomic file writes (tmp → save)
//! - Unreadable or corrupt saves load as a fresh start

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::difficulty::{MAX_TIER, MIN_TIER};
use crate::sim::upgrades::UpgradeLevels;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything that survives between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSnapshot {
    pub version: u32,
    /// Cross-run currency
    pub cash: u32,
    /// Highest tier the player may select
    pub unlocked_difficulty: u8,
    pub best_wave: u32,
    pub permanent: UpgradeLevels,
    pub special_ability_unlocked: bool,
}

impl Default for ProgressSnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            cash: 0,
            unlocked_difficulty: MIN_TIER,
            best_wave: 0,
            permanent: UpgradeLevels::default(),
            special_ability_unlocked: false,
        }
    }
}

impl ProgressSnapshot {
    /// Clamp fields a hand-edited or older file may have out of range
    pub fn sanitized(mut self) -> Self {
        let tier = self.unlocked_difficulty.clamp(MIN_TIER, MAX_TIER);
        if tier != self.unlocked_difficulty {
            log::warn!(
                "Saved unlocked difficulty {} out of range, using {}",
                self.unlocked_difficulty,
                tier
            );
            self.unlocked_difficulty = tier;
        }
        self.version = SNAPSHOT_VERSION;
        self
    }

    pub fn add_cash(&mut self, amount: u32) {
        self.cash = self.cash.saturating_add(amount);
    }

    /// Keep the highest wave seen. Returns true on a new record.
    pub fn record_wave(&mut self, wave: u32) -> bool {
        if wave > self.best_wave {
            self.best_wave = wave;
            true
        } else {
            false
        }
    }

    /// Raise the unlocked tier, never lowering it
    pub fn unlock_tier(&mut self, tier: u8) {
        let tier = tier.clamp(MIN_TIER, MAX_TIER);
        if tier > self.unlocked_difficulty {
            log::info!("Unlocked difficulty tier {}", tier);
            self.unlocked_difficulty = tier;
        }
    }
}

/// Where snapshots live between runs
pub trait ProgressStore {
    /// `None` means no usable save exists
    fn load(&mut self) -> Option<ProgressSnapshot>;
    /// Best-effort; failures are logged, never returned
    fn save(&mut self, snapshot: &ProgressSnapshot);
}

/// In-memory store, for tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub snapshot: Option<ProgressSnapshot>,
    pub saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: ProgressSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            saves: 0,
        }
    }
}

impl ProgressStore for MemoryStore {
    fn load(&mut self) -> Option<ProgressSnapshot> {
        self.snapshot.clone()
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
    }
}

/// JSON file on disk
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

    fn tmp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&mut self) -> Option<ProgressSnapshot> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No save at {}, starting fresh", self.path.display());
                return None;
            }
            Err(e) => {
                log::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<ProgressSnapshot>(&json) {
            Ok(snapshot) => {
                log::info!(
                    "Loaded progress from {} ({} cash, tier {} unlocked)",
                    self.path.display(),
                    snapshot.cash,
                    snapshot.unlocked_difficulty
                );
                Some(snapshot.sanitized())
            }
            Err(e) => {
                log::warn!("Corrupt save {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, snapshot: &ProgressSnapshot) {
        let json = match serde_json::to_string_pretty(snapshot) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize progress: {}", e);
                return;
            }
        };

        let tmp = self.tmp_path();
        if let Err(e) = fs::write(&tmp, json) {
            log::warn!("Failed to write {}: {}", tmp.display(), e);
            return;
        }
        if let Err(e) = fs::rename(&tmp, &self.path) {
            log::warn!("Failed to replace {}: {}", self.path.display(), e);
            return;
        }
        log::info!("Progress saved to {}", self.path.display());
    }
}
