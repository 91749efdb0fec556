//! Feedback events and short-lived cosmetic effects
//!
//! Collision resolution pushes `GameEvent`s; the orchestrator forwards
//! sound cues to audio and hands the rest to the renderer. `Effects` keeps
//! the countdown state (floating damage numbers, screen shake) so a
//! renderer can read it directly.

use glam::Vec2;

use crate::audio::SoundCue;
use crate::consts::*;

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Floating damage number above a target
    DamageNumber {
        pos: Vec2,
        value: u32,
        critical: bool,
    },
    ScreenShake { duration: f32, magnitude: f32 },
    Sound(SoundCue),
    /// An enemy was killed by the player and paid out
    EnemyKilled { pos: Vec2, coins: u32 },
}

/// A rising damage number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageText {
    pub pos: Vec2,
    pub value: u32,
    pub critical: bool,
    /// Seconds left
    pub timer: f32,
}

impl DamageText {
    /// Opacity in [0, 1], fading out over the lifetime
    pub fn alpha(&self) -> f32 {
        (self.timer / DAMAGE_TEXT_LIFETIME).clamp(0.0, 1.0)
    }
}

/// Screen shake countdown
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScreenShake {
    pub timer: f32,
    pub duration: f32,
    pub magnitude: f32,
}

impl ScreenShake {
    /// Start a shake, keeping whichever of old and new is stronger
    pub fn trigger(&mut self, duration: f32, magnitude: f32) {
        if self.timer <= 0.0 || magnitude >= self.current_magnitude() {
            self.timer = duration.max(0.0);
            self.duration = duration.max(0.0);
            self.magnitude = magnitude.max(0.0);
        }
    }

    pub fn is_active(&self) -> bool {
        self.timer > 0.0
    }

    /// Magnitude decaying linearly to zero
    pub fn current_magnitude(&self) -> f32 {
        if self.timer <= 0.0 || self.duration <= 0.0 {
            return 0.0;
        }
        self.magnitude * (self.timer / self.duration)
    }

    pub fn update(&mut self, dt: f32) {
        if self.timer > 0.0 {
            self.timer = (self.timer - dt).max(0.0);
        }
    }
}

/// Cosmetic state derived from the event stream
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub damage_texts: Vec<DamageText>,
    pub shake: ScreenShake,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start whatever countdown an event implies
    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::DamageNumber {
                pos,
                value,
                critical,
            } => self.damage_texts.push(DamageText {
                pos,
                value,
                critical,
                timer: DAMAGE_TEXT_LIFETIME,
            }),
            GameEvent::ScreenShake {
                duration,
                magnitude,
            } => self.shake.trigger(duration, magnitude),
            GameEvent::Sound(_) | GameEvent::EnemyKilled { .. } => {}
        }
    }

    /// Age texts and shake; expired texts are dropped
    pub fn update(&mut self, dt: f32) {
        for text in &mut self.damage_texts {
            text.timer -= dt;
            text.pos.y -= DAMAGE_TEXT_RISE_SPEED * dt;
        }
        self.damage_texts.retain(|t| t.timer > 0.0);
        self.shake.update(dt);
    }

    pub fn clear(&mut self) {
        self.damage_texts.clear();
        self.shake = ScreenShake::default();
    }
}

/// Damage number event for a hit on a target centered at `center`
pub fn damage_number(center: Vec2, amount: f32, critical: bool) -> GameEvent {
    GameEvent::DamageNumber {
        pos: center - Vec2::new(0.0, DAMAGE_TEXT_OFFSET_Y),
        value: amount.max(0.0).round() as u32,
        critical,
    }
}
