//! The player avatar: movement, dash, auto-fire and health

use glam::Vec2;
use rand::Rng;

use super::entity::Body;
use super::projectile::{Owner, Projectile};
use super::tick::TickInput;
use super::upgrades::{UpgradeKind, UpgradeLedger};
use crate::consts::*;
use crate::direction_from_degrees;

/// Combat numbers derived from the effective upgrade levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    pub max_health: f32,
    pub speed: f32,
    /// Seconds between volleys
    pub fire_interval: f32,
    pub damage: f32,
    pub bullet_speed: f32,
    pub bullet_count: u32,
    /// Probability in [0, 1] that a single shot is critical
    pub crit_chance: f32,
    pub crit_multiplier: f32,
}

impl PlayerStats {
    pub fn from_ledger(ledger: &UpgradeLedger) -> Self {
        let lvl = |kind| ledger.level(kind) as f32;
        Self {
            max_health: PLAYER_BASE_HEALTH + lvl(UpgradeKind::Health) * PLAYER_HEALTH_PER_LEVEL,
            speed: PLAYER_BASE_SPEED + lvl(UpgradeKind::Speed) * PLAYER_SPEED_PER_LEVEL,
            fire_interval: BASE_FIRE_INTERVAL
                / (1.0 + lvl(UpgradeKind::FireRate) * FIRE_RATE_PER_LEVEL),
            damage: BULLET_BASE_DAMAGE + lvl(UpgradeKind::Damage) * BULLET_DAMAGE_PER_LEVEL,
            bullet_speed: BULLET_BASE_SPEED
                + lvl(UpgradeKind::BulletSpeed) * BULLET_SPEED_PER_LEVEL,
            bullet_count: ledger.level(UpgradeKind::BulletCount).saturating_add(1),
            crit_chance: (BASE_CRIT_CHANCE
                + lvl(UpgradeKind::CritChance) * CRIT_CHANCE_PER_LEVEL)
                .clamp(0.0, 1.0),
            crit_multiplier: BASE_CRIT_MULTIPLIER
                + lvl(UpgradeKind::CritDamage) * CRIT_MULTIPLIER_PER_LEVEL,
        }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::from_ledger(&UpgradeLedger::default())
    }
}

/// Dash burst state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dash {
    /// Seconds until a new dash may start
    pub cooldown: f32,
    /// Seconds left in the current dash
    pub timer: f32,
    pub active: bool,
    pub invulnerable: bool,
    /// Locked at trigger time
    pub direction: Vec2,
}

/// The player avatar
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub stats: PlayerStats,
    pub health: f32,
    /// In-run currency; only a new run clears it
    pub coins: u32,
    pub fire_timer: f32,
    pub dash: Dash,
    pub dead: bool,
    /// Player-owned projectiles
    pub projectiles: Vec<Projectile>,
    /// Dash button state last tick, for edge detection
    dash_held: bool,
}

impl Player {
    pub fn new(ledger: &UpgradeLedger) -> Self {
        let stats = PlayerStats::from_ledger(ledger);
        Self {
            body: Body::new(
                Vec2::new(PLAYER_START_X, PLAYER_START_Y),
                Vec2::splat(PLAYER_SIZE),
            ),
            stats,
            health: stats.max_health,
            coins: 0,
            fire_timer: 0.0,
            dash: Dash::default(),
            dead: false,
            projectiles: Vec::new(),
            dash_held: false,
        }
    }

    /// Re-derive stats and refill health. Coins are kept.
    pub fn reset(&mut self, ledger: &UpgradeLedger) {
        self.stats = PlayerStats::from_ledger(ledger);
        self.health = self.stats.max_health;
        self.fire_timer = 0.0;
        self.dash = Dash::default();
        self.dash_held = false;
        self.dead = false;
        self.body.alive = true;
        self.projectiles.clear();
    }

    /// Fresh run: coins cleared and avatar back at the start position
    pub fn full_reset(&mut self, ledger: &UpgradeLedger) {
        self.coins = 0;
        self.body.pos = Vec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.body.vel = Vec2::ZERO;
        self.reset(ledger);
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_invulnerable(&self) -> bool {
        self.dash.invulnerable
    }

    pub fn center(&self) -> Vec2 {
        self.body.center()
    }

    /// Apply damage. Returns true if health changed; invulnerable or
    /// already-dead players ignore it.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if self.dead || self.dash.invulnerable {
            return false;
        }
        self.health = (self.health - amount.max(0.0)).max(0.0);
        if self.health <= 0.0 {
            self.dead = true;
            self.body.alive = false;
        }
        true
    }

    pub fn add_coins(&mut self, amount: u32) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Unit movement vector from the held directions
    pub fn movement_direction(input: &TickInput) -> Vec2 {
        let mut dir = Vec2::ZERO;
        if input.up {
            dir.y -= 1.0;
        }
        if input.down {
            dir.y += 1.0;
        }
        if input.left {
            dir.x -= 1.0;
        }
        if input.right {
            dir.x += 1.0;
        }
        if dir.x != 0.0 && dir.y != 0.0 {
            dir *= std::f32::consts::FRAC_1_SQRT_2;
        }
        dir
    }

    fn clamp_to_field(&mut self) {
        self.body.pos.x = self.body.pos.x.clamp(0.0, PLAYER_MAX_X);
        self.body.pos.y = self.body.pos.y.clamp(0.0, PLAYER_MAX_Y);
    }

    /// Movement, dash and auto-fire for one tick, then age projectiles
    pub fn update(&mut self, dt: f32, input: &TickInput, rng: &mut impl Rng) {
        if self.dead {
            return;
        }

        self.update_dash_trigger(input);

        let dir = Self::movement_direction(input);
        if self.dash.active {
            self.body.pos += self.dash.direction * self.stats.speed * DASH_SPEED_MULTIPLIER * dt;
            self.clamp_to_field();
            self.dash.timer -= dt;
            if self.dash.timer <= 0.0 {
                self.dash.timer = 0.0;
                self.dash.active = false;
                self.dash.invulnerable = false;
            }
        } else {
            self.body.pos += dir * self.stats.speed * dt;
            self.clamp_to_field();
        }

        self.fire_timer += dt;
        if self.fire_timer >= self.stats.fire_interval {
            self.shoot(rng);
            self.fire_timer = 0.0;
        }

        for p in &mut self.projectiles {
            if p.is_alive() {
                p.update(dt);
            }
        }

        self.dash.cooldown = (self.dash.cooldown - dt).max(0.0);
    }

    fn update_dash_trigger(&mut self, input: &TickInput) {
        let pressed = input.dash && !self.dash_held;
        self.dash_held = input.dash;

        if pressed && !self.dash.active && self.dash.cooldown <= 0.0 {
            let dir = Self::movement_direction(input);
            self.dash = Dash {
                cooldown: DASH_COOLDOWN,
                timer: DASH_DURATION,
                active: true,
                invulnerable: true,
                direction: if dir == Vec2::ZERO { Vec2::NEG_Y } else { dir },
            };
        }
    }

    /// Fire one volley, fanned around straight up
    pub fn shoot(&mut self, rng: &mut impl Rng) {
        let count = self.stats.bullet_count.max(1);
        let origin = self.center();
        let spread = SPREAD_STEP_DEGREES * (count - 1) as f32;
        let step = if count > 1 {
            spread / (count - 1) as f32
        } else {
            0.0
        };

        for i in 0..count {
            let angle = -90.0 - spread / 2.0 + step * i as f32;
            let critical = rng.random_bool(self.stats.crit_chance.clamp(0.0, 1.0) as f64);
            let damage = if critical {
                self.stats.damage * self.stats.crit_multiplier
            } else {
                self.stats.damage
            };
            let vel = direction_from_degrees(angle) * self.stats.bullet_speed;
            self.projectiles
                .push(Projectile::new(origin, vel, damage, Owner::Player, critical));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn ledger_with(kind: UpgradeKind, levels: u32) -> UpgradeLedger {
        let mut ledger = UpgradeLedger::new();
        let mut coins = u32::MAX;
        for _ in 0..levels {
            assert!(ledger.purchase_temporary(kind, &mut coins));
        }
        ledger
    }

    fn held(up: bool, down: bool, left: bool, right: bool) -> TickInput {
        TickInput {
            up,
            down,
            left,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_fire_interval_by_level() {
        let base = PlayerStats::from_ledger(&UpgradeLedger::new());
        assert!((base.fire_interval - 0.5).abs() < 1e-6);
        let upgraded = PlayerStats::from_ledger(&ledger_with(UpgradeKind::FireRate, 2));
        assert!((upgraded.fire_interval - 0.3125).abs() < 1e-5);
    }

    #[test]
    fn test_derived_stats() {
        let stats = PlayerStats::from_ledger(&ledger_with(UpgradeKind::Health, 3));
        assert!((stats.max_health - 160.0).abs() < 1e-6);
        let stats = PlayerStats::from_ledger(&ledger_with(UpgradeKind::BulletCount, 2));
        assert_eq!(stats.bullet_count, 3);
        let stats = PlayerStats::from_ledger(&ledger_with(UpgradeKind::CritChance, 2));
        assert!((stats.crit_chance - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_diagonal_movement_is_normalized() {
        let d = Player::movement_direction(&held(true, false, false, true));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!((d.y + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        // Opposing keys cancel
        assert_eq!(Player::movement_direction(&held(true, true, false, false)), Vec2::ZERO);
    }

    #[test]
    fn test_movement_clamped_to_field() {
        let ledger = UpgradeLedger::new();
        let mut player = Player::new(&ledger);
        let mut rng = Pcg32::seed_from_u64(1);
        let input = held(true, false, true, false);
        for _ in 0..600 {
            player.update(1.0 / 60.0, &input, &mut rng);
        }
        assert_eq!(player.body.pos, Vec2::ZERO);
        let input = held(false, true, false, true);
        for _ in 0..600 {
            player.update(1.0 / 60.0, &input, &mut rng);
        }
        assert_eq!(player.body.pos, Vec2::new(770.0, 570.0));
    }

    #[test]
    fn test_auto_fire_cadence() {
        let ledger = UpgradeLedger::new();
        let mut player = Player::new(&ledger);
        let mut rng = Pcg32::seed_from_u64(7);
        let idle = TickInput::default();
        player.update(0.25, &idle, &mut rng);
        assert!(player.projectiles.is_empty());
        player.update(0.25, &idle, &mut rng);
        assert_eq!(player.projectiles.len(), 1);
        assert_eq!(player.fire_timer, 0.0);
        let shot = &player.projectiles[0];
        assert!(shot.body.vel.y < 0.0);
        assert!(shot.body.vel.x.abs() < 1e-3);
    }

    #[test]
    fn test_fan_spread_is_symmetric() {
        let ledger = ledger_with(UpgradeKind::BulletCount, 2);
        let mut player = Player::new(&ledger);
        let mut rng = Pcg32::seed_from_u64(3);
        player.shoot(&mut rng);
        assert_eq!(player.projectiles.len(), 3);
        let vx: Vec<f32> = player.projectiles.iter().map(|p| p.body.vel.x).collect();
        assert!((vx[0] + vx[2]).abs() < 1e-3);
        assert!(vx[1].abs() < 1e-3);
        // Outer bullets sit 15 degrees off the forward axis
        let v = player.projectiles[2].body.vel;
        let off_axis = v.x.atan2(-v.y).to_degrees();
        assert!((off_axis - 15.0).abs() < 1e-3);
    }

    #[test]
    fn test_crit_always_with_full_chance() {
        let ledger = UpgradeLedger::new();
        let mut player = Player::new(&ledger);
        player.stats.crit_chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(11);
        player.shoot(&mut rng);
        let shot = &player.projectiles[0];
        assert!(shot.critical);
        assert!((shot.health - 15.0).abs() < 1e-5);

        player.stats.crit_chance = 0.0;
        player.shoot(&mut rng);
        let shot = &player.projectiles[1];
        assert!(!shot.critical);
        assert!((shot.health - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_death_happens_once() {
        let mut player = Player::new(&UpgradeLedger::new());
        assert!(player.take_damage(60.0));
        assert!(!player.is_dead());
        assert!(player.take_damage(60.0));
        assert!(player.is_dead());
        assert_eq!(player.health, 0.0);
        assert!(!player.take_damage(10.0));
        assert_eq!(player.health, 0.0);
    }

    #[test]
    fn test_dash_grants_invulnerability_then_expires() {
        let mut player = Player::new(&UpgradeLedger::new());
        let mut rng = Pcg32::seed_from_u64(5);
        let start = player.body.pos;
        let dash = TickInput {
            dash: true,
            ..Default::default()
        };
        player.update(0.05, &dash, &mut rng);
        assert!(player.dash.active);
        assert!(player.is_invulnerable());
        // No direction held: dash goes up
        assert!(player.body.pos.y < start.y);
        assert_eq!(player.body.pos.x, start.x);

        let before = player.health;
        assert!(!player.take_damage(50.0));
        assert_eq!(player.health, before);

        // Holding the button does not retrigger; run out the dash
        for _ in 0..4 {
            player.update(0.05, &dash, &mut rng);
        }
        assert!(!player.dash.active);
        assert!(!player.is_invulnerable());
        assert!(player.take_damage(50.0));
    }

    #[test]
    fn test_dash_cooldown_blocks_retrigger() {
        let mut player = Player::new(&UpgradeLedger::new());
        let mut rng = Pcg32::seed_from_u64(5);
        let press = TickInput {
            dash: true,
            ..Default::default()
        };
        let release = TickInput::default();
        player.update(0.05, &press, &mut rng);
        for _ in 0..4 {
            player.update(0.05, &release, &mut rng);
        }
        assert!(!player.dash.active);
        // Fresh press while cooling down
        player.update(0.05, &press, &mut rng);
        assert!(!player.dash.active);
        player.update(0.05, &release, &mut rng);
        for _ in 0..20 {
            player.update(0.05, &release, &mut rng);
        }
        player.update(0.05, &press, &mut rng);
        assert!(player.dash.active);
    }

    #[test]
    fn test_dash_suppresses_normal_movement() {
        let mut player = Player::new(&UpgradeLedger::new());
        let mut rng = Pcg32::seed_from_u64(5);
        let input = TickInput {
            right: true,
            dash: true,
            ..Default::default()
        };
        let start = player.body.pos;
        player.update(0.02, &input, &mut rng);
        let moved = player.body.pos.x - start.x;
        assert!((moved - 200.0 * DASH_SPEED_MULTIPLIER * 0.02).abs() < 1e-3);
    }

    #[test]
    fn test_full_reset_clears_coins() {
        let ledger = UpgradeLedger::new();
        let mut player = Player::new(&ledger);
        player.add_coins(120);
        player.reset(&ledger);
        assert_eq!(player.coins, 120);
        player.full_reset(&ledger);
        assert_eq!(player.coins, 0);
    }

    proptest! {
        #[test]
        fn prop_health_never_negative(hits in proptest::collection::vec(-50.0f32..500.0, 1..40)) {
            let mut player = Player::new(&UpgradeLedger::new());
            let mut deaths = 0;
            for h in hits {
                let was_dead = player.is_dead();
                player.take_damage(h);
                prop_assert!(player.health >= 0.0);
                if !was_dead && player.is_dead() {
                    deaths += 1;
                    prop_assert_eq!(player.health, 0.0);
                }
            }
            prop_assert!(deaths <= 1);
        }
    }
}
