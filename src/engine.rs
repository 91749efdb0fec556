//! Run orchestration
//!
//! `Engine` owns one run at a time plus the cross-run progress around it:
//! - fixed-step accumulator driving `sim::tick`
//! - wave-clear rewards, win and game-over transitions
//! - the between-wave shop and the out-of-run permanent upgrades
//! - audio cues and progress saves at checkpoints

use crate::audio::{AudioManager, AudioSink, SoundCue};
use crate::consts::*;
use crate::persistence::{ProgressSnapshot, ProgressStore};
use crate::settings::Settings;
use crate::sim::difficulty::{Difficulty, MAX_TIER};
use crate::sim::effects::GameEvent;
use crate::sim::state::GameState;
use crate::sim::tick::{TickInput, TickOutcome, tick};
use crate::sim::upgrades::{UpgradeKind, UpgradeLedger};

/// Where the orchestrator is in the run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// No run in progress
    Menu,
    Playing,
    Paused,
    /// Between waves
    Shop,
    Won,
    GameOver,
}

impl EnginePhase {
    /// A run exists and has not ended
    pub fn in_run(&self) -> bool {
        matches!(
            self,
            EnginePhase::Playing | EnginePhase::Paused | EnginePhase::Shop
        )
    }
}

pub struct Engine<S: ProgressStore, A: AudioSink> {
    store: S,
    audio: AudioManager<A>,
    settings: Settings,
    progress: ProgressSnapshot,
    ledger: UpgradeLedger,
    state: Option<GameState>,
    phase: EnginePhase,
    accumulator: f32,
}

impl<S: ProgressStore, A: AudioSink> Engine<S, A> {
    /// Load progress from `store`; a missing snapshot is a fresh start
    pub fn new(mut store: S, audio: A, settings: Settings) -> Self {
        let progress = store.load().unwrap_or_default();
        let ledger =
            UpgradeLedger::with_permanent(progress.permanent, progress.special_ability_unlocked);
        let mut audio = AudioManager::new(audio);
        audio.apply_settings(&settings);

        Self {
            store,
            audio,
            settings,
            progress,
            ledger,
            state: None,
            phase: EnginePhase::Menu,
            accumulator: 0.0,
        }
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn state_mut(&mut self) -> Option<&mut GameState> {
        self.state.as_mut()
    }

    pub fn progress(&self) -> &ProgressSnapshot {
        &self.progress
    }

    pub fn ledger(&self) -> &UpgradeLedger {
        &self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings.sanitized();
        self.audio.apply_settings(&self.settings);
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Begin a new run at the given difficulty selector
    pub fn start_run(&mut self, selector: i32, seed: u64) {
        let profile = Difficulty::from_selector(selector).profile();
        self.ledger.reset_temp_upgrades();

        let mut state = GameState::new(seed, profile, &self.ledger);
        state.waves.start_next_wave();
        self.state = Some(state);
        self.phase = EnginePhase::Playing;
        self.accumulator = 0.0;

        log::info!("Run started: {} (seed {})", profile.name, seed);
    }

    /// Feed elapsed frame time; runs whole ticks while Playing.
    /// Returns the number of ticks run.
    ///
    /// Events pile up until [`Engine::drain_events`] is called. Once more
    /// than `MAX_PENDING_EVENTS` are waiting, each call drops the oldest.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            log::warn!("Ignoring invalid frame time {}", frame_dt);
            return 0;
        }
        if self.phase != EnginePhase::Playing {
            return 0;
        }
        if let Some(state) = self.state.as_mut() {
            state.trim_events(MAX_PENDING_EVENTS);
        }

        self.accumulator += frame_dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;

            match self.step(input) {
                TickOutcome::Continue => {}
                TickOutcome::WaveCleared => {
                    self.on_wave_cleared();
                    break;
                }
                TickOutcome::PlayerDied => {
                    self.on_player_died();
                    break;
                }
            }
        }

        // Drop whatever the substep cap or a phase change left over
        if substeps == MAX_SUBSTEPS || self.phase != EnginePhase::Playing {
            self.accumulator = 0.0;
        }
        substeps
    }

    fn step(&mut self, input: &TickInput) -> TickOutcome {
        let Some(state) = self.state.as_mut() else {
            return TickOutcome::Continue;
        };
        let first_new = state.events.len();
        let outcome = tick(state, input, SIM_DT);
        for event in &state.events[first_new..] {
            if let GameEvent::Sound(cue) = event {
                self.audio.play(*cue);
            }
        }
        outcome
    }

    /// Play a cue and put it on the event stream
    fn emit(&mut self, cue: SoundCue) {
        self.audio.play(cue);
        if let Some(state) = self.state.as_mut() {
            state.events.push(GameEvent::Sound(cue));
        }
    }

    fn on_wave_cleared(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let wave = state.wave();
        let profile = state.profile;

        let coins = WAVE_COIN_REWARD.saturating_mul(wave);
        state.player.add_coins(coins);
        state.stats.waves_cleared += 1;
        let cash = profile.scale_cash(WAVE_CASH_REWARD);
        self.progress.add_cash(cash);
        self.progress.record_wave(wave);

        log::info!(
            "Wave {} cleared: +{} coins, +{} cash",
            wave,
            coins,
            cash
        );

        if profile.wins_at(wave) {
            let tier = profile.difficulty.selector().clamp(1, MAX_TIER as i32) as u8;
            let bonus = profile.scale_cash(WIN_CASH_PER_TIER * tier as f64);
            self.progress.add_cash(bonus);
            self.progress.unlock_tier(tier.saturating_add(1));
            self.phase = EnginePhase::Won;
            log::info!("Run won on {} with {} bonus cash", profile.name, bonus);
            self.emit(SoundCue::GameWin);
        } else {
            self.phase = EnginePhase::Shop;
            self.emit(SoundCue::WaveComplete);
        }
        self.checkpoint();
    }

    fn on_player_died(&mut self) {
        let wave = self.state.as_ref().map_or(0, |s| s.wave());
        self.progress.record_wave(wave);
        self.phase = EnginePhase::GameOver;
        log::info!("Game over on wave {}", wave);
        self.emit(SoundCue::GameOver);
        self.checkpoint();
    }

    /// Copy ledger state into the snapshot and save it
    fn checkpoint(&mut self) {
        self.progress.permanent = self.ledger.permanent_levels();
        self.progress.special_ability_unlocked = self.ledger.has_special_ability();
        self.store.save(&self.progress);
    }

    /// Shop: spend coins on a temporary level. The player's stats are
    /// re-derived and health refilled; coins carry over.
    pub fn buy_temporary(&mut self, kind: UpgradeKind) -> bool {
        if self.phase != EnginePhase::Shop {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        if !self
            .ledger
            .purchase_temporary(kind, &mut state.player.coins)
        {
            return false;
        }
        state.refresh_player(&self.ledger);
        self.emit(SoundCue::Upgrade);
        true
    }

    /// Leave the shop and start the next wave
    pub fn continue_to_next_wave(&mut self) -> bool {
        if self.phase != EnginePhase::Shop {
            return false;
        }
        let Some(state) = self.state.as_mut() else {
            return false;
        };
        state.waves.start_next_wave();
        self.phase = EnginePhase::Playing;
        self.accumulator = 0.0;
        true
    }

    /// Outside a run: spend cash on a permanent level
    pub fn buy_permanent(&mut self, kind: UpgradeKind) -> bool {
        if self.phase.in_run() {
            return false;
        }
        if !self
            .ledger
            .purchase_permanent(kind, &mut self.progress.cash)
        {
            return false;
        }
        self.checkpoint();
        true
    }

    pub fn unlock_special_ability(&mut self) {
        self.ledger.unlock_special_ability();
        self.checkpoint();
    }

    /// Wipe all cross-run progress
    pub fn reset_progress(&mut self) {
        if self.phase.in_run() {
            log::warn!("Ignoring progress reset during a run");
            return;
        }
        self.progress = ProgressSnapshot::default();
        self.ledger.reset_all();
        log::info!("Progress reset");
        self.checkpoint();
    }

    /// Playing ⇄ Paused
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            EnginePhase::Playing => EnginePhase::Paused,
            EnginePhase::Paused => EnginePhase::Playing,
            other => other,
        };
        self.accumulator = 0.0;
    }

    /// Abandon or close the current run
    pub fn return_to_menu(&mut self) {
        if let Some(state) = self.state.take() {
            self.progress.record_wave(state.wave());
        }
        self.phase = EnginePhase::Menu;
        self.accumulator = 0.0;
        self.checkpoint();
    }

    /// Events since the last drain, minus the ones settings turn off
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        let Some(state) = self.state.as_mut() else {
            return Vec::new();
        };
        let shake = self.settings.effective_screen_shake();
        let numbers = self.settings.damage_numbers;
        state
            .drain_events()
            .into_iter()
            .filter(|e| match e {
                GameEvent::ScreenShake { .. } => shake,
                GameEvent::DamageNumber { .. } => numbers,
                _ => true,
            })
            .collect()
    }

    /// Current shake strength for the renderer
    pub fn screen_shake_magnitude(&self) -> f32 {
        if !self.settings.effective_screen_shake() {
            return 0.0;
        }
        self.state
            .as_ref()
            .map_or(0.0, |s| s.effects.shake.current_magnitude())
    }
}
