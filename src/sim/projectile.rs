//! Projectiles fired by the player and by enemies

use glam::Vec2;

use super::entity::Body;
use crate::consts::*;

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// A projectile. Its `health` is both its remaining durability in bullet
/// duels and the damage it deals on impact.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub body: Body,
    pub health: f32,
    pub owner: Owner,
    pub critical: bool,
}

impl Projectile {
    /// Spawn a projectile centered on `origin`
    pub fn new(origin: Vec2, vel: Vec2, damage: f32, owner: Owner, critical: bool) -> Self {
        let size = match owner {
            Owner::Player => PLAYER_BULLET_SIZE,
            Owner::Enemy => ENEMY_BULLET_SIZE,
        };
        let mut body = Body::centered(origin, Vec2::splat(size));
        body.vel = vel;
        Self {
            body,
            health: damage.max(0.0),
            owner,
            critical,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.body.alive
    }

    pub fn kill(&mut self) {
        self.body.kill();
    }

    /// Damage dealt on impact
    #[inline]
    pub fn damage(&self) -> f32 {
        self.health
    }

    /// Lose durability; a projectile worn down to nothing is destroyed
    pub fn wear(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.kill();
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.body.integrate(dt);
        if self.body.past_projectile_bounds() {
            self.kill();
        }
    }
}
