//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Dead entities are marked during a tick and removed at its end
//! - No audio, rendering or storage dependencies

pub mod collision;
pub mod difficulty;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod player;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod wave;

pub use collision::{CollisionReport, DuelOutcome, duel};
pub use difficulty::{Difficulty, DifficultyProfile};
pub use effects::{DamageText, Effects, GameEvent, ScreenShake};
pub use enemy::{Enemy, EnemyKind};
pub use entity::Body;
pub use player::{Player, PlayerStats};
pub use projectile::{Owner, Projectile};
pub use state::{GameState, RunStats};
pub use tick::{TickInput, TickOutcome, tick};
pub use upgrades::{CostCurve, UpgradeKind, UpgradeLedger, UpgradeLevels};
pub use wave::{WaveManager, WavePhase};
