//! Fixed timestep simulation tick
//!
//! Core game loop that advances one run deterministically:
//! player, then waves, then collisions, then compaction.

use super::collision;
use super::state::GameState;
use crate::sanitize_dt;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Dash button held; the player edge-detects it
    pub dash: bool,
}

/// What the orchestrator has to react to after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    WaveCleared,
    PlayerDied,
}

/// Advance the run by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> TickOutcome {
    if state.player.is_dead() {
        return TickOutcome::PlayerDied;
    }
    let dt = sanitize_dt(dt);
    state.time_ticks += 1;

    state.player.update(dt, input, &mut state.rng);
    let target = state.player.center();
    state.waves.update(dt, target, &mut state.rng);

    let first_new = state.events.len();
    let report = collision::resolve(&mut state.player, &mut state.waves, &mut state.events);
    state.stats.kills += report.kills;
    state.stats.coins_earned = state.stats.coins_earned.saturating_add(report.coins_earned);
    state.stats.damage_taken += report.damage_taken;

    // Compaction runs after resolution, never during it
    state.player.projectiles.retain(|p| p.is_alive());
    state.waves.compact();

    for event in &state.events[first_new..] {
        state.effects.apply(event);
    }
    state.effects.update(dt);

    // Death wins over a wave clear on the same tick
    if state.player.is_dead() {
        TickOutcome::PlayerDied
    } else if state.waves.is_wave_complete() {
        TickOutcome::WaveCleared
    } else {
        TickOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::enemy::Enemy;
    use crate::sim::upgrades::UpgradeLedger;
    use glam::Vec2;

    fn new_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Difficulty::Tier(1).profile(), &UpgradeLedger::new());
        state.waves.start_next_wave();
        state
    }

    #[test]
    fn test_tick_spawns_and_fires() {
        let mut state = new_state(12345);
        let input = TickInput::default();
        for _ in 0..90 {
            assert_eq!(tick(&mut state, &input, SIM_DT), TickOutcome::Continue);
        }
        assert_eq!(state.time_ticks, 90);
        assert_eq!(state.waves.spawned, 1);
        assert!(!state.player.projectiles.is_empty());
    }

    #[test]
    fn test_invalid_dt_is_ignored() {
        let mut state = new_state(1);
        let before = state.player.body.pos;
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        tick(&mut state, &input, f32::NAN);
        tick(&mut state, &input, -1.0);
        assert_eq!(state.player.body.pos, before);
        assert_eq!(state.player.fire_timer, 0.0);
    }

    #[test]
    fn test_dead_entities_are_compacted() {
        let mut state = new_state(1);
        state.waves.enemies.push(Enemy::basic(Vec2::new(10.0, 10.0), 1));
        state.waves.enemies[0].kill();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.waves.enemies.is_empty());
    }

    #[test]
    fn test_wave_clears_after_quota() {
        let mut state = new_state(1);
        state.waves.spawned = state.waves.quota;
        assert_eq!(
            tick(&mut state, &TickInput::default(), SIM_DT),
            TickOutcome::WaveCleared
        );
    }

    #[test]
    fn test_death_beats_wave_clear() {
        let mut state = new_state(1);
        state.waves.spawned = state.waves.quota;
        state.player.health = 1.0;
        let mut enemy = Enemy::basic(state.player.body.pos, 1);
        enemy.body.vel = Vec2::ZERO;
        state.waves.enemies.push(enemy);

        assert_eq!(
            tick(&mut state, &TickInput::default(), SIM_DT),
            TickOutcome::PlayerDied
        );
        assert!(state.player.is_dead());
        assert_eq!(state.player.health, 0.0);
        // Further ticks do nothing
        let ticks = state.time_ticks;
        assert_eq!(
            tick(&mut state, &TickInput::default(), SIM_DT),
            TickOutcome::PlayerDied
        );
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_hit_events_reach_effects() {
        let mut state = new_state(1);
        let mut enemy = Enemy::basic(Vec2::new(385.0, 380.0), 1);
        enemy.body.vel = Vec2::ZERO;
        state.waves.enemies.push(enemy);
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert!(!state.events.is_empty());
        assert!(!state.effects.damage_texts.is_empty());
        let drained = state.drain_events();
        assert!(!drained.is_empty());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut state1 = new_state(99999);
        let mut state2 = new_state(99999);

        let inputs = [
            TickInput {
                left: true,
                ..Default::default()
            },
            TickInput {
                dash: true,
                up: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                right: true,
                down: true,
                ..Default::default()
            },
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut state1, input, SIM_DT);
                tick(&mut state2, input, SIM_DT);
            }
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.player.body.pos, state2.player.body.pos);
        assert_eq!(state1.player.coins, state2.player.coins);
        assert_eq!(state1.waves.enemies.len(), state2.waves.enemies.len());
        assert_eq!(state1.player.health, state2.player.health);
    }
}
