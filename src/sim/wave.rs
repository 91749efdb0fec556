//! Wave spawn scheduler
//!
//! Each wave has a spawn quota. While `Spawning`, enemies are released one
//! per spawn interval until the quota is met; the wave turns `Cleared`
//! once the quota is met and no enemy is left alive. Every fifth wave is a
//! boss wave with a single boss and a short spawn delay.

use glam::Vec2;
use rand::Rng;

use super::difficulty::DifficultyProfile;
use super::enemy::Enemy;
use super::projectile::Projectile;
use crate::consts::*;

/// Wave state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavePhase {
    #[default]
    Spawning,
    Cleared,
}

/// Spawn quota for `wave` at `spawn_level`
pub fn spawn_quota(wave: u32, spawn_level: u32) -> u32 {
    if is_boss_wave(wave) {
        1
    } else {
        BASE_ENEMY_COUNT
            .saturating_add(ENEMIES_PER_WAVE.saturating_mul(wave))
            .saturating_add(ENEMIES_PER_DIFFICULTY.saturating_mul(spawn_level))
    }
}

/// Seconds between spawns for `wave` at `spawn_level`
pub fn spawn_interval(wave: u32, spawn_level: u32) -> f32 {
    if is_boss_wave(wave) {
        BOSS_SPAWN_DELAY
    } else {
        BASE_SPAWN_INTERVAL / (1.0 + SPAWN_INTERVAL_PER_DIFFICULTY * spawn_level as f32)
    }
}

#[inline]
pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Owns the enemies and their projectiles
#[derive(Debug, Clone)]
pub struct WaveManager {
    pub wave: u32,
    pub phase: WavePhase,
    pub quota: u32,
    pub spawned: u32,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub enemies: Vec<Enemy>,
    pub enemy_projectiles: Vec<Projectile>,
    profile: DifficultyProfile,
}

impl WaveManager {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self {
            wave: 0,
            phase: WavePhase::Spawning,
            quota: 0,
            spawned: 0,
            spawn_timer: 0.0,
            spawn_interval: BASE_SPAWN_INTERVAL,
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            profile,
        }
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    /// Back to wave 0 with empty collections
    pub fn reset(&mut self) {
        *self = Self::new(self.profile);
    }

    pub fn is_boss_wave(&self) -> bool {
        is_boss_wave(self.wave)
    }

    /// Advance the counter and arm the spawner
    pub fn start_next_wave(&mut self) {
        self.wave = self.wave.saturating_add(1);
        self.phase = WavePhase::Spawning;
        self.quota = spawn_quota(self.wave, self.profile.spawn_level);
        self.spawn_interval = spawn_interval(self.wave, self.profile.spawn_level);
        self.spawned = 0;
        self.spawn_timer = 0.0;
        self.enemies.clear();
        self.enemy_projectiles.clear();

        log::info!(
            "Wave {} started: {} enemies{}",
            self.wave,
            self.quota,
            if self.is_boss_wave() { " (boss)" } else { "" }
        );
    }

    pub fn is_wave_complete(&self) -> bool {
        self.phase == WavePhase::Cleared
    }

    /// Spawn on schedule, move enemies, let them shoot, age enemy projectiles
    pub fn update(&mut self, dt: f32, player_center: Vec2, rng: &mut impl Rng) {
        if self.phase == WavePhase::Spawning && self.spawned < self.quota {
            self.spawn_timer += dt;
            if self.spawn_timer >= self.spawn_interval {
                self.spawn_enemy(rng);
                self.spawn_timer = 0.0;
            }
        }

        for enemy in &mut self.enemies {
            if !enemy.is_alive() {
                continue;
            }
            enemy.update_movement(dt);
            enemy.update(dt);
            enemy.try_shoot(player_center, &mut self.enemy_projectiles);
        }

        for p in &mut self.enemy_projectiles {
            if p.is_alive() {
                p.update(dt);
            }
        }
    }

    /// Create the next enemy for this wave
    pub fn spawn_enemy(&mut self, rng: &mut impl Rng) {
        let pos = Vec2::new(rng.random_range(0.0..SPAWN_MAX_X), SPAWN_Y);
        let mut enemy = if self.is_boss_wave() {
            Enemy::boss(pos, self.wave)
        } else if self.wave >= MAGE_UNLOCK_WAVE && rng.random_bool(MAGE_SPAWN_CHANCE) {
            Enemy::mage(pos, self.wave)
        } else {
            Enemy::basic(pos, self.wave)
        };
        enemy.apply_difficulty(&self.profile);

        log::debug!(
            "Spawned {} at x={:.0} (hp {:.0}, {} of {})",
            enemy.kind.name(),
            enemy.body.pos.x,
            enemy.health,
            self.spawned + 1,
            self.quota
        );

        self.enemies.push(enemy);
        self.spawned += 1;
    }

    /// Drop dead entries, then re-evaluate the cleared condition
    pub fn compact(&mut self) {
        self.enemies.retain(|e| e.is_alive());
        self.enemy_projectiles.retain(|p| p.is_alive());

        if self.phase == WavePhase::Spawning
            && self.wave > 0
            && self.spawned >= self.quota
            && self.enemies.is_empty()
        {
            self.phase = WavePhase::Cleared;
            log::info!("Wave {} cleared", self.wave);
        }
    }
}
