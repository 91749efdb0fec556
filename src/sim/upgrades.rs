//! Upgrade ledger
//!
//! Tracks two counters per upgrade kind:
//! - a permanent level, bought with cross-run cash and persisted
//! - a temporary level, bought with in-run coins and wiped at every run start
//!
//! The effective level used by combat is always the sum of the two.

use serde::{Deserialize, Serialize};

/// Upgrade kinds, in shop order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    FireRate,
    Damage,
    Health,
    Speed,
    BulletCount,
    BulletSpeed,
    CritChance,
    CritDamage,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 8] = [
        UpgradeKind::FireRate,
        UpgradeKind::Damage,
        UpgradeKind::Health,
        UpgradeKind::Speed,
        UpgradeKind::BulletCount,
        UpgradeKind::BulletSpeed,
        UpgradeKind::CritChance,
        UpgradeKind::CritDamage,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::FireRate => "Fire Rate",
            UpgradeKind::Damage => "Damage",
            UpgradeKind::Health => "Health",
            UpgradeKind::Speed => "Speed",
            UpgradeKind::BulletCount => "Bullet Count",
            UpgradeKind::BulletSpeed => "Bullet Speed",
            UpgradeKind::CritChance => "Crit Chance",
            UpgradeKind::CritDamage => "Crit Damage",
        }
    }

    /// Price curve for this kind
    pub fn cost_curve(&self) -> CostCurve {
        match self {
            UpgradeKind::FireRate => CostCurve::new(50, 1.10),
            UpgradeKind::Damage => CostCurve::new(60, 1.12),
            UpgradeKind::Health => CostCurve::new(40, 1.10),
            UpgradeKind::Speed => CostCurve::new(40, 1.08),
            UpgradeKind::BulletCount => CostCurve::new(150, 1.35),
            UpgradeKind::BulletSpeed => CostCurve::new(30, 1.05),
            UpgradeKind::CritChance => CostCurve::new(75, 1.15),
            UpgradeKind::CritDamage => CostCurve::new(75, 1.15),
        }
    }
}

/// Geometric price curve: `floor(base * multiplier^level)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostCurve {
    pub base: u32,
    pub multiplier: f64,
}

impl CostCurve {
    pub const fn new(base: u32, multiplier: f64) -> Self {
        Self { base, multiplier }
    }

    /// Price of buying the next level when `level` levels are already owned
    pub fn cost(&self, level: u32) -> u32 {
        let exponent = i32::try_from(level).unwrap_or(i32::MAX);
        let raw = self.base as f64 * self.multiplier.max(0.0).powi(exponent);
        // `as` saturates: infinities clamp to u32::MAX, NaN to 0
        raw.floor() as u32
    }
}

/// Per-kind counters, persisted as a plain struct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeLevels {
    pub fire_rate: u32,
    pub damage: u32,
    pub health: u32,
    pub speed: u32,
    pub bullet_count: u32,
    pub bullet_speed: u32,
    pub crit_chance: u32,
    pub crit_damage: u32,
}

impl UpgradeLevels {
    pub fn get(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::FireRate => self.fire_rate,
            UpgradeKind::Damage => self.damage,
            UpgradeKind::Health => self.health,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::BulletCount => self.bullet_count,
            UpgradeKind::BulletSpeed => self.bullet_speed,
            UpgradeKind::CritChance => self.crit_chance,
            UpgradeKind::CritDamage => self.crit_damage,
        }
    }

    fn slot(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::FireRate => &mut self.fire_rate,
            UpgradeKind::Damage => &mut self.damage,
            UpgradeKind::Health => &mut self.health,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::BulletCount => &mut self.bullet_count,
            UpgradeKind::BulletSpeed => &mut self.bullet_speed,
            UpgradeKind::CritChance => &mut self.crit_chance,
            UpgradeKind::CritDamage => &mut self.crit_damage,
        }
    }

    fn increment(&mut self, kind: UpgradeKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(1);
    }
}

/// Permanent + temporary upgrade levels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpgradeLedger {
    permanent: UpgradeLevels,
    temporary: [u32; UpgradeKind::ALL.len()],
    special_ability_unlocked: bool,
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger seeded from persisted permanent levels
    pub fn with_permanent(permanent: UpgradeLevels, special_ability_unlocked: bool) -> Self {
        Self {
            permanent,
            temporary: [0; UpgradeKind::ALL.len()],
            special_ability_unlocked,
        }
    }

    /// Effective level: permanent + temporary
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        self.permanent_level(kind)
            .saturating_add(self.temporary_level(kind))
    }

    pub fn permanent_level(&self, kind: UpgradeKind) -> u32 {
        self.permanent.get(kind)
    }

    pub fn temporary_level(&self, kind: UpgradeKind) -> u32 {
        self.temporary[kind.index()]
    }

    pub fn permanent_levels(&self) -> UpgradeLevels {
        self.permanent
    }

    /// Cost of the next permanent level
    pub fn permanent_cost(&self, kind: UpgradeKind) -> u32 {
        kind.cost_curve().cost(self.permanent_level(kind))
    }

    /// Cost of the next temporary level
    pub fn temporary_cost(&self, kind: UpgradeKind) -> u32 {
        kind.cost_curve().cost(self.temporary_level(kind))
    }

    /// Buy one permanent level out of `cash`. Returns false, touching nothing,
    /// if the wallet cannot cover the price.
    pub fn purchase_permanent(&mut self, kind: UpgradeKind, cash: &mut u32) -> bool {
        let cost = self.permanent_cost(kind);
        if *cash < cost {
            return false;
        }
        *cash -= cost;
        self.permanent.increment(kind);
        log::debug!(
            "Permanent {} -> level {} for {} cash",
            kind.as_str(),
            self.permanent_level(kind),
            cost
        );
        true
    }

    /// Buy one temporary level out of `coins`
    pub fn purchase_temporary(&mut self, kind: UpgradeKind, coins: &mut u32) -> bool {
        let cost = self.temporary_cost(kind);
        if *coins < cost {
            return false;
        }
        *coins -= cost;
        let slot = &mut self.temporary[kind.index()];
        *slot = slot.saturating_add(1);
        log::debug!(
            "Temporary {} -> level {} for {} coins",
            kind.as_str(),
            self.temporary_level(kind),
            cost
        );
        true
    }

    /// Must run at the start of every run
    pub fn reset_temp_upgrades(&mut self) {
        self.temporary = [0; UpgradeKind::ALL.len()];
    }

    /// Wipe everything, including permanent progress
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    pub fn unlock_special_ability(&mut self) {
        self.special_ability_unlocked = true;
    }

    pub fn has_special_ability(&self) -> bool {
        self.special_ability_unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_level_zero_costs_base() {
        for kind in UpgradeKind::ALL {
            assert_eq!(kind.cost_curve().cost(0), kind.cost_curve().base);
        }
    }

    #[test]
    fn test_fire_rate_cost_at_level_three() {
        assert_eq!(UpgradeKind::FireRate.cost_curve().cost(3), 66);
    }

    #[test]
    fn test_curves_differ_per_kind() {
        let count = UpgradeKind::BulletCount.cost_curve();
        let speed = UpgradeKind::BulletSpeed.cost_curve();
        assert!(count.base > speed.base);
        assert!(count.multiplier > speed.multiplier);
    }

    #[test]
    fn test_uniform_curve_reproducible() {
        let uniform = CostCurve::new(50, 1.1);
        assert_eq!(uniform.cost(0), 50);
        assert_eq!(uniform.cost(1), 55);
        assert_eq!(uniform.cost(2), 60);
    }

    #[test]
    fn test_huge_level_saturates() {
        assert_eq!(UpgradeKind::BulletCount.cost_curve().cost(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_effective_level_sums_both_paths() {
        let mut ledger = UpgradeLedger::new();
        let mut cash = 1_000;
        let mut coins = 1_000;
        assert!(ledger.purchase_permanent(UpgradeKind::Damage, &mut cash));
        assert!(ledger.purchase_temporary(UpgradeKind::Damage, &mut coins));
        assert!(ledger.purchase_temporary(UpgradeKind::Damage, &mut coins));
        assert_eq!(ledger.permanent_level(UpgradeKind::Damage), 1);
        assert_eq!(ledger.temporary_level(UpgradeKind::Damage), 2);
        assert_eq!(ledger.level(UpgradeKind::Damage), 3);
        assert_eq!(cash, 1_000 - 60);
        // Temporary path prices by temporary level: 60 then floor(60 * 1.12)
        assert_eq!(coins, 1_000 - 60 - 67);
    }

    #[test]
    fn test_failed_purchase_changes_nothing() {
        let mut ledger = UpgradeLedger::new();
        let mut cash = 49;
        assert!(!ledger.purchase_permanent(UpgradeKind::FireRate, &mut cash));
        assert_eq!(cash, 49);
        assert_eq!(ledger.level(UpgradeKind::FireRate), 0);
    }

    #[test]
    fn test_reset_temp_keeps_permanent() {
        let mut ledger = UpgradeLedger::with_permanent(
            UpgradeLevels {
                speed: 4,
                ..Default::default()
            },
            true,
        );
        let mut coins = 500;
        assert!(ledger.purchase_temporary(UpgradeKind::Speed, &mut coins));
        assert_eq!(ledger.level(UpgradeKind::Speed), 5);
        ledger.reset_temp_upgrades();
        assert_eq!(ledger.level(UpgradeKind::Speed), 4);
        assert!(ledger.has_special_ability());
    }

    proptest! {
        #[test]
        fn prop_cost_never_decreases(level in 0u32..200) {
            for kind in UpgradeKind::ALL {
                let curve = kind.cost_curve();
                prop_assert!(curve.cost(level + 1) >= curve.cost(level));
            }
        }

        #[test]
        fn prop_purchase_never_overdraws(wallet in 0u32..10_000, buys in 1usize..20) {
            let mut ledger = UpgradeLedger::new();
            let mut cash = wallet;
            for _ in 0..buys {
                let before = cash;
                let bought = ledger.purchase_permanent(UpgradeKind::BulletCount, &mut cash);
                prop_assert!(cash <= before);
                if !bought {
                    prop_assert_eq!(cash, before);
                }
            }
        }
    }
}
