//! Enemy variants
//!
//! One `Enemy` struct carries the shared combat stats; the `EnemyKind` tag
//! carries each variant's own timers and selects its movement and attack
//! policy:
//! - Basic: falls at a constant speed, never attacks
//! - Mage: falls slowly, fires an aimed shot on an interval while inside a band
//! - Boss: sways side to side, parks near the top, fires three-shot volleys

use glam::Vec2;

use super::difficulty::DifficultyProfile;
use super::entity::Body;
use super::projectile::{Owner, Projectile};
use crate::consts::*;
use crate::{aim_direction, direction_from_degrees};

const BASIC_SIZE: f32 = 25.0;
const BASIC_SPEED: f32 = 80.0;

const MAGE_SIZE: f32 = 30.0;
const MAGE_SPEED: f32 = 50.0;
const MAGE_FIRE_INTERVAL: f32 = 2.0;
/// Mages only fire while their top edge is inside this vertical band
const MAGE_FIRE_BAND: (f32, f32) = (50.0, 500.0);
const MAGE_BULLET_SPEED: f32 = 200.0;

const BOSS_SIZE: f32 = 60.0;
const BOSS_SPEED: f32 = 30.0;
const BOSS_SWAY_SPEED: f32 = 100.0;
const BOSS_SWAY_PERIOD: f32 = 2.0;
const BOSS_MAX_X: f32 = 740.0;
/// The boss stops descending once past this depth
const BOSS_PARK_Y: f32 = 100.0;
const BOSS_FIRE_INTERVAL: f32 = 1.5;
const BOSS_FIRE_MIN_Y: f32 = 50.0;
const BOSS_BULLET_SPEED: f32 = 150.0;
const BOSS_VOLLEY_OFFSETS_DEGREES: [f32; 3] = [-20.0, 0.0, 20.0];

/// Variant tag plus per-variant state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyKind {
    Basic,
    Mage { fire_timer: f32 },
    Boss { fire_timer: f32, sway_timer: f32 },
}

impl EnemyKind {
    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Basic => "Basic",
            EnemyKind::Mage { .. } => "Mage",
            EnemyKind::Boss { .. } => "Boss",
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Boss { .. })
    }
}

/// An adversary
#[derive(Debug, Clone)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub health: f32,
    pub max_health: f32,
    /// Damage per shot and on contact
    pub damage: f32,
    pub coin_value: u32,
    /// Seconds of white flash left after a critical hit (cosmetic only)
    pub crit_flash: f32,
}

impl Enemy {
    fn with_stats(
        kind: EnemyKind,
        pos: Vec2,
        size: f32,
        vel: Vec2,
        health: f32,
        damage: f32,
        coin_value: u32,
    ) -> Self {
        let mut body = Body::new(pos, Vec2::splat(size));
        body.vel = vel;
        Self {
            body,
            kind,
            health,
            max_health: health,
            damage,
            coin_value,
            crit_flash: 0.0,
        }
    }

    /// Basic enemy with stats for `wave`, before difficulty scaling
    pub fn basic(pos: Vec2, wave: u32) -> Self {
        let w = wave as f32;
        Self::with_stats(
            EnemyKind::Basic,
            pos,
            BASIC_SIZE,
            Vec2::new(0.0, BASIC_SPEED),
            20.0 + w * 10.0,
            5.0 + w * 2.0,
            10,
        )
    }

    pub fn mage(pos: Vec2, wave: u32) -> Self {
        let w = wave as f32;
        Self::with_stats(
            EnemyKind::Mage { fire_timer: 0.0 },
            pos,
            MAGE_SIZE,
            Vec2::new(0.0, MAGE_SPEED),
            30.0 + w * 15.0,
            8.0 + w * 3.0,
            25,
        )
    }

    pub fn boss(pos: Vec2, wave: u32) -> Self {
        let w = wave as f32;
        Self::with_stats(
            EnemyKind::Boss {
                fire_timer: 0.0,
                sway_timer: 0.0,
            },
            pos,
            BOSS_SIZE,
            Vec2::new(BOSS_SWAY_SPEED, BOSS_SPEED),
            200.0 + w * 50.0,
            15.0 + w * 5.0,
            100,
        )
    }

    /// Scale health, damage and coin drop for the active difficulty
    pub fn apply_difficulty(&mut self, profile: &DifficultyProfile) {
        let hp = profile.hp_multiplier.max(0.0);
        self.max_health *= hp;
        self.health = self.max_health;
        self.damage *= hp;
        self.coin_value = profile.scale_coins(self.coin_value);
    }

    pub fn is_alive(&self) -> bool {
        self.body.alive
    }

    pub fn kill(&mut self) {
        self.body.kill();
    }

    pub fn is_flashing(&self) -> bool {
        self.crit_flash > 0.0
    }

    /// Apply a hit. Returns true when this hit is the killing blow.
    pub fn take_damage(&mut self, amount: f32, critical: bool) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if critical {
            self.crit_flash = CRIT_FLASH_DURATION;
        }
        if self.health <= 0.0 {
            self.kill();
            return true;
        }
        false
    }

    /// Variant movement policy: advance timers and steer velocity
    pub fn update_movement(&mut self, dt: f32) {
        match &mut self.kind {
            EnemyKind::Basic => {}
            EnemyKind::Mage { fire_timer } => {
                *fire_timer += dt;
            }
            EnemyKind::Boss {
                fire_timer,
                sway_timer,
            } => {
                *fire_timer += dt;
                *sway_timer += dt;

                if *sway_timer > BOSS_SWAY_PERIOD {
                    self.body.vel.x = -self.body.vel.x;
                    *sway_timer = 0.0;
                }

                // Bounce off the field edges, always heading back inside
                if self.body.pos.x < 0.0 {
                    self.body.vel.x = self.body.vel.x.abs();
                } else if self.body.pos.x > BOSS_MAX_X {
                    self.body.vel.x = -self.body.vel.x.abs();
                }

                if self.body.pos.y > BOSS_PARK_Y {
                    self.body.vel.y = 0.0;
                }
            }
        }
    }

    /// Integrate, tick the crit flash and despawn past the bounds
    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);

        if self.crit_flash > 0.0 {
            self.crit_flash -= dt;
            if self.crit_flash <= 0.0 {
                self.crit_flash = 0.0;
            }
        }

        if self.body.past_enemy_bounds() {
            self.kill();
        }
    }

    /// Variant attack policy. Pushes any projectiles fired this tick into
    /// `out` and returns how many were fired.
    pub fn try_shoot(&mut self, target: Vec2, out: &mut Vec<Projectile>) -> usize {
        if !self.is_alive() {
            return 0;
        }
        let origin = self.body.center();
        let y = self.body.pos.y;
        let damage = self.damage;

        match &mut self.kind {
            EnemyKind::Basic => 0,
            EnemyKind::Mage { fire_timer } => {
                let in_band = y > MAGE_FIRE_BAND.0 && y < MAGE_FIRE_BAND.1;
                if *fire_timer < MAGE_FIRE_INTERVAL || !in_band {
                    return 0;
                }
                *fire_timer = 0.0;
                let vel = aim_direction(origin, target) * MAGE_BULLET_SPEED;
                out.push(Projectile::new(origin, vel, damage, Owner::Enemy, false));
                1
            }
            EnemyKind::Boss { fire_timer, .. } => {
                if *fire_timer < BOSS_FIRE_INTERVAL || y <= BOSS_FIRE_MIN_Y {
                    return 0;
                }
                *fire_timer = 0.0;
                let aim = aim_direction(origin, target);
                let aim_degrees = aim.y.atan2(aim.x).to_degrees();
                for offset in BOSS_VOLLEY_OFFSETS_DEGREES {
                    let vel = direction_from_degrees(aim_degrees + offset) * BOSS_BULLET_SPEED;
                    out.push(Projectile::new(origin, vel, damage, Owner::Enemy, false));
                }
                BOSS_VOLLEY_OFFSETS_DEGREES.len()
            }
        }
    }
}
