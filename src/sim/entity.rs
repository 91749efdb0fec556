//! Moving axis-aligned bodies
//!
//! Every entity in the arena (player, enemies, projectiles) carries a `Body`:
//! a top-left position, a velocity and a box size. Dead bodies stay in their
//! collection until the end-of-tick compaction pass removes them.

use glam::Vec2;

use crate::consts::*;

/// Position, velocity and extent of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Width and height
    pub size: Vec2,
    pub alive: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            alive: true,
        }
    }

    /// Body of the given size whose center sits at `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center - size / 2.0, size)
    }

    /// Integrate position by velocity
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// AABB overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// Both alive and overlapping
    #[inline]
    pub fn hits(&self, other: &Body) -> bool {
        self.alive && other.alive && self.overlaps(other)
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Enemies leave play below the field or far off either side
    pub fn past_enemy_bounds(&self) -> bool {
        self.pos.y > ENEMY_DESPAWN_Y
            || self.pos.x < ENEMY_DESPAWN_MIN_X
            || self.pos.x > ENEMY_DESPAWN_MAX_X
    }

    /// Projectiles leave play once outside the field plus a margin
    pub fn past_projectile_bounds(&self) -> bool {
        self.pos.x < -PROJECTILE_MARGIN
            || self.pos.x > FIELD_WIDTH + PROJECTILE_MARGIN
            || self.pos.y < -PROJECTILE_MARGIN
            || self.pos.y > FIELD_HEIGHT + PROJECTILE_MARGIN
    }
}
