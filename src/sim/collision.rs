//! Collision resolution
//!
//! Run once per tick, after every entity has moved, in a fixed order:
//! 1. player bullet vs enemy bullet (duel)
//! 2. player bullet vs enemy
//! 3. enemy bullet vs player
//! 4. enemy body vs player
//!
//! Resolution only marks entities dead; `WaveManager::compact` and the
//! player's projectile compaction remove them afterwards.

use glam::Vec2;

use super::effects::{GameEvent, damage_number};
use super::player::Player;
use super::projectile::Projectile;
use super::wave::WaveManager;
use crate::audio::SoundCue;
use crate::consts::*;

/// Result of a bullet duel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelOutcome {
    /// First projectile survives
    FirstWins,
    /// Second projectile survives
    SecondWins,
    /// Equal health, both destroyed
    BothDestroyed,
}

/// Two projectiles trade health: the weaker one is destroyed and the
/// stronger one loses exactly the weaker one's health.
pub fn duel(a: &mut Projectile, b: &mut Projectile) -> DuelOutcome {
    if a.health > b.health {
        a.wear(b.health);
        b.kill();
        DuelOutcome::FirstWins
    } else if b.health > a.health {
        b.wear(a.health);
        a.kill();
        DuelOutcome::SecondWins
    } else {
        a.kill();
        b.kill();
        DuelOutcome::BothDestroyed
    }
}

/// What happened during one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionReport {
    pub duels: u32,
    pub enemy_hits: u32,
    pub kills: u32,
    pub coins_earned: u32,
    pub player_hits: u32,
    pub damage_taken: f32,
}

/// Resolve all overlaps for this tick, pushing feedback into `events`
pub fn resolve(
    player: &mut Player,
    waves: &mut WaveManager,
    events: &mut Vec<GameEvent>,
) -> CollisionReport {
    let mut report = CollisionReport::default();

    resolve_bullet_duels(
        &mut player.projectiles,
        &mut waves.enemy_projectiles,
        &mut report,
    );
    resolve_player_bullets(player, waves, events, &mut report);
    resolve_enemy_bullets(player, waves, events, &mut report);
    resolve_enemy_contact(player, waves, events, &mut report);

    report
}

fn resolve_bullet_duels(
    player_bullets: &mut [Projectile],
    enemy_bullets: &mut [Projectile],
    report: &mut CollisionReport,
) {
    let mut resolved = vec![false; enemy_bullets.len()];

    for pb in player_bullets.iter_mut() {
        if !pb.is_alive() {
            continue;
        }
        for (i, eb) in enemy_bullets.iter_mut().enumerate() {
            if resolved[i] || !pb.body.hits(&eb.body) {
                continue;
            }
            duel(pb, eb);
            resolved[i] = true;
            report.duels += 1;
            break;
        }
    }
}

fn resolve_player_bullets(
    player: &mut Player,
    waves: &mut WaveManager,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    for pb in player.projectiles.iter_mut() {
        if !pb.is_alive() {
            continue;
        }
        // First overlapping enemy in list order takes the hit
        let Some(enemy) = waves.enemies.iter_mut().find(|e| pb.body.hits(&e.body)) else {
            continue;
        };

        let amount = pb.damage();
        let center: Vec2 = enemy.body.center();
        let killed = enemy.take_damage(amount, pb.critical);
        pb.kill();
        report.enemy_hits += 1;

        events.push(damage_number(center, amount, pb.critical));
        if pb.critical {
            events.push(GameEvent::ScreenShake {
                duration: CRIT_SHAKE_DURATION,
                magnitude: CRIT_SHAKE_MAGNITUDE,
            });
            events.push(GameEvent::Sound(SoundCue::HitCritical));
        } else {
            events.push(GameEvent::Sound(SoundCue::Hit));
        }

        if killed {
            let coins = enemy.coin_value;
            player.coins = player.coins.saturating_add(coins);
            report.kills += 1;
            report.coins_earned = report.coins_earned.saturating_add(coins);
            events.push(GameEvent::EnemyKilled { pos: center, coins });
        }
    }
}

fn resolve_enemy_bullets(
    player: &mut Player,
    waves: &mut WaveManager,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    for eb in waves.enemy_projectiles.iter_mut() {
        if !eb.body.hits(&player.body) {
            continue;
        }
        let amount = eb.damage();
        if player.take_damage(amount) {
            report.player_hits += 1;
            report.damage_taken += amount;
        }
        // The cue fires on every overlap, dash or not
        events.push(GameEvent::Sound(SoundCue::PlayerDamaged));
        eb.kill();
    }
}

fn resolve_enemy_contact(
    player: &mut Player,
    waves: &mut WaveManager,
    events: &mut Vec<GameEvent>,
    report: &mut CollisionReport,
) {
    for enemy in waves.enemies.iter_mut() {
        if !enemy.body.hits(&player.body) {
            continue;
        }
        if player.take_damage(enemy.damage) {
            report.player_hits += 1;
            report.damage_taken += enemy.damage;
        }
        events.push(GameEvent::Sound(SoundCue::PlayerDamaged));
        enemy.kill();
    }
}
