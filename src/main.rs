//! Wave Arena headless entry point
//!
//! Plays one run with a simple autopilot at a fixed 60 Hz of simulated time
//! and logs a summary. Progress persists to a JSON file in the working
//! directory, so repeated runs accumulate cash and permanent upgrades.
//!
//! Usage: `wave-arena [difficulty] [seed]`

use std::time::{SystemTime, UNIX_EPOCH};

use wave_arena::audio::LogSink;
use wave_arena::consts::*;
use wave_arena::persistence::JsonFileStore;
use wave_arena::sim::{GameState, TickInput, UpgradeKind, UpgradeLedger};
use wave_arena::{Engine, EnginePhase, Settings};

const PROGRESS_FILE: &str = "wave-arena-progress.json";
const SETTINGS_FILE: &str = "wave-arena-settings.json";
/// One hour of simulated play
const TICK_LIMIT: u64 = 60 * 60 * 60;
/// Threats closer than this trigger a dash
const DASH_TRIGGER_DISTANCE: f32 = 70.0;
/// Horizontal slack before the autopilot steers
const AIM_DEADBAND: f32 = 6.0;
/// Vertical lane the autopilot holds
const LANE_Y: (f32, f32) = (420.0, 500.0);

/// Steers under the nearest enemy and dashes away from close threats
#[derive(Debug, Default)]
struct Autopilot {
    dash_was_down: bool,
}

impl Autopilot {
    fn input(&mut self, state: &GameState) -> TickInput {
        let mut input = TickInput::default();
        let me = state.player.center();

        let nearest = state
            .waves
            .enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| e.body.center())
            .min_by(|a, b| a.distance_squared(me).total_cmp(&b.distance_squared(me)));

        if let Some(target) = nearest {
            if target.x < me.x - AIM_DEADBAND {
                input.left = true;
            } else if target.x > me.x + AIM_DEADBAND {
                input.right = true;
            }
        }
        if state.player.body.pos.y < LANE_Y.0 {
            input.down = true;
        } else if state.player.body.pos.y > LANE_Y.1 {
            input.up = true;
        }

        let threat = state
            .waves
            .enemy_projectiles
            .iter()
            .map(|p| p.body.center())
            .chain(state.waves.enemies.iter().map(|e| e.body.center()))
            .find(|c| c.distance(me) < DASH_TRIGGER_DISTANCE);

        // Release the button every other tick so the dash edge can fire
        if let Some(threat) = threat.filter(|_| !self.dash_was_down) {
            let away = me - threat;
            input.left = away.x < 0.0;
            input.right = away.x >= 0.0;
            input.up = false;
            input.down = false;
            input.dash = true;
        }
        self.dash_was_down = input.dash;
        input
    }
}

/// Cheapest upgrade `wallet` can cover, by the given price list
fn cheapest_affordable(
    ledger: &UpgradeLedger,
    wallet: u32,
    price: impl Fn(&UpgradeLedger, UpgradeKind) -> u32,
) -> Option<UpgradeKind> {
    UpgradeKind::ALL
        .into_iter()
        .map(|kind| (price(ledger, kind), kind))
        .filter(|(cost, _)| *cost <= wallet)
        .min_by_key(|(cost, _)| *cost)
        .map(|(_, kind)| kind)
}

fn parse_args() -> (i32, u64) {
    let mut args = std::env::args().skip(1);

    let difficulty = match args.next() {
        Some(raw) => raw.parse::<i32>().unwrap_or_else(|_| {
            log::warn!("Bad difficulty '{}', using 1", raw);
            1
        }),
        None => 1,
    };

    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
            log::warn!("Bad seed '{}', using 0", raw);
            0
        }),
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_nanos() as u64),
    };

    (difficulty, seed)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let (difficulty, seed) = parse_args();
    let settings = Settings::load(SETTINGS_FILE);
    let store = JsonFileStore::new(PROGRESS_FILE);
    log::info!("Progress file: {}", store.path().display());
    let mut engine = Engine::new(store, LogSink, settings);

    while let Some(kind) = cheapest_affordable(
        engine.ledger(),
        engine.progress().cash,
        UpgradeLedger::permanent_cost,
    ) {
        if !engine.buy_permanent(kind) {
            break;
        }
        log::info!("Bought permanent {}", kind.as_str());
    }

    engine.start_run(difficulty, seed);
    let mut pilot = Autopilot::default();
    let mut ticks: u64 = 0;

    while ticks < TICK_LIMIT {
        match engine.phase() {
            EnginePhase::Playing => {
                let Some(state) = engine.state() else { break };
                let input = pilot.input(state);
                engine.advance(SIM_DT, &input);
                ticks += 1;
                engine.drain_events();
            }
            EnginePhase::Shop => {
                loop {
                    let Some(state) = engine.state() else { break };
                    let coins = state.player.coins;
                    let Some(kind) =
                        cheapest_affordable(engine.ledger(), coins, UpgradeLedger::temporary_cost)
                    else {
                        break;
                    };
                    if !engine.buy_temporary(kind) {
                        break;
                    }
                    log::debug!("Shop: bought {}", kind.as_str());
                }
                engine.continue_to_next_wave();
            }
            EnginePhase::Paused => engine.toggle_pause(),
            EnginePhase::Menu | EnginePhase::Won | EnginePhase::GameOver => break,
        }
    }

    if ticks >= TICK_LIMIT {
        log::warn!("Tick limit reached, ending run");
    }

    if let Some(state) = engine.state() {
        let at = state.player.center();
        log::info!(
            "{:?} on {} (seed {}): wave {}, {} kills, {} coins earned, {:.0} damage taken, {:.1}s simulated, ended at ({:.0}, {:.0})",
            engine.phase(),
            state.profile.name,
            state.seed,
            state.wave(),
            state.stats.kills,
            state.stats.coins_earned,
            state.stats.damage_taken,
            state.time_ticks as f32 * SIM_DT,
            at.x,
            at.y,
        );
    }

    let outcome = engine.phase();
    engine.return_to_menu();
    let progress = engine.progress();
    log::info!(
        "Result {:?}. Progress: {} cash, tier {} unlocked, best wave {}",
        outcome,
        progress.cash,
        progress.unlocked_difficulty,
        progress.best_wave
    );
}
