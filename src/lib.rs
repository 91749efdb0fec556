//! Wave Arena - a wave-based arena shooter simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, collisions, upgrades)
//! - `engine`: Run lifecycle orchestration (fixed-step loop, shop, rewards)
//! - `audio`: Named sound cues and the audio collaborator seam
//! - `persistence`: Cross-run progress snapshot and stores
//! - `settings`: Player preferences

pub mod audio;
pub mod engine;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use engine::{Engine, EnginePhase};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Undrained events kept between frames; older ones are dropped
    pub const MAX_PENDING_EVENTS: usize = 1024;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Player box and movement limits (top-left corner)
    pub const PLAYER_SIZE: f32 = 30.0;
    pub const PLAYER_MAX_X: f32 = 770.0;
    pub const PLAYER_MAX_Y: f32 = 570.0;
    pub const PLAYER_START_X: f32 = 385.0;
    pub const PLAYER_START_Y: f32 = 450.0;

    /// Player base stats and per-level growth
    pub const PLAYER_BASE_HEALTH: f32 = 100.0;
    pub const PLAYER_HEALTH_PER_LEVEL: f32 = 20.0;
    pub const PLAYER_BASE_SPEED: f32 = 200.0;
    pub const PLAYER_SPEED_PER_LEVEL: f32 = 20.0;
    pub const BASE_FIRE_INTERVAL: f32 = 0.5;
    pub const FIRE_RATE_PER_LEVEL: f32 = 0.3;
    pub const BULLET_BASE_DAMAGE: f32 = 10.0;
    pub const BULLET_DAMAGE_PER_LEVEL: f32 = 5.0;
    pub const BULLET_BASE_SPEED: f32 = 400.0;
    pub const BULLET_SPEED_PER_LEVEL: f32 = 50.0;
    /// Fan spread between adjacent bullets (degrees)
    pub const SPREAD_STEP_DEGREES: f32 = 15.0;

    /// Critical hits
    pub const BASE_CRIT_CHANCE: f32 = 0.05;
    pub const CRIT_CHANCE_PER_LEVEL: f32 = 0.005;
    pub const BASE_CRIT_MULTIPLIER: f32 = 1.5;
    pub const CRIT_MULTIPLIER_PER_LEVEL: f32 = 0.01;
    /// Enemy flash after taking a critical hit (seconds)
    pub const CRIT_FLASH_DURATION: f32 = 0.12;

    /// Dash
    pub const DASH_DURATION: f32 = 0.15;
    pub const DASH_COOLDOWN: f32 = 1.0;
    pub const DASH_SPEED_MULTIPLIER: f32 = 3.5;

    /// Projectiles
    pub const PLAYER_BULLET_SIZE: f32 = 8.0;
    pub const ENEMY_BULLET_SIZE: f32 = 6.0;
    /// Margin outside the field before a projectile is discarded
    pub const PROJECTILE_MARGIN: f32 = 20.0;

    /// Enemies are discarded past these lines
    pub const ENEMY_DESPAWN_Y: f32 = 650.0;
    pub const ENEMY_DESPAWN_MIN_X: f32 = -100.0;
    pub const ENEMY_DESPAWN_MAX_X: f32 = 900.0;

    /// Wave pacing
    pub const BASE_ENEMY_COUNT: u32 = 5;
    pub const ENEMIES_PER_WAVE: u32 = 2;
    pub const ENEMIES_PER_DIFFICULTY: u32 = 3;
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    pub const BOSS_SPAWN_DELAY: f32 = 0.5;
    pub const BASE_SPAWN_INTERVAL: f32 = 1.5;
    pub const SPAWN_INTERVAL_PER_DIFFICULTY: f32 = 0.2;
    pub const SPAWN_MAX_X: f32 = 750.0;
    pub const SPAWN_Y: f32 = -30.0;
    pub const MAGE_SPAWN_CHANCE: f64 = 0.3;
    /// First wave on which Mages may appear, on every difficulty
    pub const MAGE_UNLOCK_WAVE: u32 = 7;
    /// Clearing this wave wins the run (except in Endless)
    pub const WIN_WAVE: u32 = 15;

    /// Rewards
    pub const WAVE_COIN_REWARD: u32 = 10;
    pub const WAVE_CASH_REWARD: f64 = 10.0;
    pub const WIN_CASH_PER_TIER: f64 = 50.0;

    /// Feedback
    pub const CRIT_SHAKE_DURATION: f32 = 0.20;
    pub const CRIT_SHAKE_MAGNITUDE: f32 = 8.0;
    pub const DAMAGE_TEXT_LIFETIME: f32 = 1.0;
    pub const DAMAGE_TEXT_RISE_SPEED: f32 = 40.0;
    /// Damage numbers spawn this far above the target's center
    pub const DAMAGE_TEXT_OFFSET_Y: f32 = 10.0;
}

/// Unit vector at `degrees`, measured clockwise from +x in screen space (y down)
#[inline]
pub fn direction_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Normalized direction from `from` toward `to`, straight down when they coincide
#[inline]
pub fn aim_direction(from: Vec2, to: Vec2) -> Vec2 {
    let dir = (to - from).normalize_or_zero();
    if dir == Vec2::ZERO { Vec2::Y } else { dir }
}

/// Sanitize an externally supplied duration: non-finite or negative becomes 0
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_degrees() {
        let up = direction_from_degrees(-90.0);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_aim_direction_coincident_points_falls_back_down() {
        let p = Vec2::new(10.0, 10.0);
        assert_eq!(aim_direction(p, p), Vec2::Y);
        let d = aim_direction(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(-1.0), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
        assert_eq!(sanitize_dt(0.25), 0.25);
    }
}
