//! Per-run game state
//!
//! Everything one run owns lives here. Two states built from the same seed,
//! profile and upgrade levels and fed the same inputs stay identical.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::difficulty::DifficultyProfile;
use super::effects::{Effects, GameEvent};
use super::player::Player;
use super::upgrades::UpgradeLedger;
use super::wave::WaveManager;

/// Running totals for the end-of-run summary
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunStats {
    pub kills: u32,
    pub coins_earned: u32,
    pub damage_taken: f32,
    pub waves_cleared: u32,
}

/// State of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub profile: DifficultyProfile,
    pub player: Player,
    pub waves: WaveManager,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
    pub effects: Effects,
    pub stats: RunStats,
    pub time_ticks: u64,
}

impl GameState {
    /// Fresh run at wave 0 with the player's stats taken from `ledger`
    pub fn new(seed: u64, profile: DifficultyProfile, ledger: &UpgradeLedger) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            profile,
            player: Player::new(ledger),
            waves: WaveManager::new(profile),
            events: Vec::new(),
            effects: Effects::new(),
            stats: RunStats::default(),
            time_ticks: 0,
        }
    }

    pub fn wave(&self) -> u32 {
        self.waves.wave
    }

    /// Hand pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop the oldest undrained events beyond `max`
    pub fn trim_events(&mut self, max: usize) {
        let excess = self.events.len().saturating_sub(max);
        if excess > 0 {
            log::debug!("Dropping {} undrained events", excess);
            self.events.drain(..excess);
        }
    }

    /// Re-derive the player's stats after a shop purchase
    pub fn refresh_player(&mut self, ledger: &UpgradeLedger) {
        self.player.reset(ledger);
    }
}
