//! Difficulty selection and scaling profiles

use serde::{Deserialize, Serialize};

/// Lowest and highest regular tier
pub const MIN_TIER: u8 = 1;
pub const MAX_TIER: u8 = 6;
/// Selector value that picks Endless mode
pub const ENDLESS_SELECTOR: i32 = 999;

/// A selected difficulty: a regular tier or the Endless sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Tier(u8),
    Endless,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Tier(MIN_TIER)
    }
}

impl Difficulty {
    /// Resolve a raw selector. 999 means Endless; anything else clamps into
    /// the regular tier range.
    pub fn from_selector(selector: i32) -> Self {
        if selector == ENDLESS_SELECTOR {
            return Difficulty::Endless;
        }
        let clamped = selector.clamp(MIN_TIER as i32, MAX_TIER as i32);
        if clamped != selector {
            log::warn!("Difficulty selector {} out of range, using {}", selector, clamped);
        }
        Difficulty::Tier(clamped as u8)
    }

    /// Raw selector value (inverse of `from_selector`)
    pub fn selector(&self) -> i32 {
        match self {
            Difficulty::Tier(t) => *t as i32,
            Difficulty::Endless => ENDLESS_SELECTOR,
        }
    }

    pub fn is_endless(&self) -> bool {
        matches!(self, Difficulty::Endless)
    }

    /// Scaling numbers for this difficulty
    pub fn profile(&self) -> DifficultyProfile {
        match *self {
            Difficulty::Endless => DifficultyProfile {
                difficulty: *self,
                name: "Endless",
                spawn_level: MAX_TIER as u32,
                hp_multiplier: 5.0,
                coin_multiplier: 1.2,
                cash_multiplier: 3.0,
            },
            Difficulty::Tier(t) => {
                let tier = t.clamp(MIN_TIER, MAX_TIER);
                let (name, hp, coins, cash) = match tier {
                    1 => ("Easy", 1.0, 1.5, 0.8),
                    2 => ("Normal", 1.3, 1.2, 1.0),
                    3 => ("Hard", 1.7, 1.0, 1.3),
                    4 => ("Expert", 2.2, 0.8, 1.7),
                    5 => ("Master", 3.0, 0.6, 2.5),
                    _ => ("Nightmare", 4.0, 0.5, 4.0),
                };
                DifficultyProfile {
                    difficulty: Difficulty::Tier(tier),
                    name,
                    spawn_level: tier as u32,
                    hp_multiplier: hp,
                    coin_multiplier: coins,
                    cash_multiplier: cash,
                }
            }
        }
    }
}

/// Multipliers and thresholds consumed when waves start and enemies spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    pub name: &'static str,
    /// The difficulty term of the quota and spawn-interval formulas
    pub spawn_level: u32,
    /// Applied to enemy health and damage
    pub hp_multiplier: f32,
    /// Applied to enemy coin drops
    pub coin_multiplier: f64,
    /// Applied to cross-run cash rewards
    pub cash_multiplier: f64,
}

impl DifficultyProfile {
    /// Whether clearing `wave` ends the run in victory
    pub fn wins_at(&self, wave: u32) -> bool {
        !self.difficulty.is_endless() && wave >= crate::consts::WIN_WAVE
    }

    /// Scale a cash amount, rounding down
    pub fn scale_cash(&self, amount: f64) -> u32 {
        (amount * self.cash_multiplier).max(0.0).floor() as u32
    }

    /// Scale an enemy coin drop, rounding down
    pub fn scale_coins(&self, coins: u32) -> u32 {
        (coins as f64 * self.coin_multiplier).max(0.0).floor() as u32
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Difficulty::default().profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_clamps() {
        assert_eq!(Difficulty::from_selector(0), Difficulty::Tier(1));
        assert_eq!(Difficulty::from_selector(-40), Difficulty::Tier(1));
        assert_eq!(Difficulty::from_selector(7), Difficulty::Tier(6));
        assert_eq!(Difficulty::from_selector(998), Difficulty::Tier(6));
        assert_eq!(Difficulty::from_selector(3), Difficulty::Tier(3));
        assert_eq!(Difficulty::from_selector(999), Difficulty::Endless);
    }

    #[test]
    fn test_selector_roundtrip() {
        for s in [1, 2, 3, 4, 5, 6, 999] {
            assert_eq!(Difficulty::from_selector(s).selector(), s);
        }
    }

    #[test]
    fn test_tier_profiles() {
        let normal = Difficulty::Tier(2).profile();
        assert_eq!(normal.name, "Normal");
        assert!((normal.hp_multiplier - 1.3).abs() < 1e-6);
        assert_eq!(normal.spawn_level, 2);

        let nightmare = Difficulty::Tier(6).profile();
        assert!((nightmare.cash_multiplier - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_tier_value_clamps_in_profile() {
        assert_eq!(Difficulty::Tier(42).profile().name, "Nightmare");
        assert_eq!(Difficulty::Tier(0).profile().name, "Easy");
    }

    #[test]
    fn test_endless_never_wins() {
        let endless = Difficulty::Endless.profile();
        assert!(!endless.wins_at(15));
        assert!(!endless.wins_at(1_000));
        let easy = Difficulty::Tier(1).profile();
        assert!(!easy.wins_at(14));
        assert!(easy.wins_at(15));
        assert!(easy.wins_at(16));
    }

    #[test]
    fn test_scale_cash() {
        assert_eq!(Difficulty::Tier(1).profile().scale_cash(10.0), 8);
        assert_eq!(Difficulty::Tier(3).profile().scale_cash(10.0), 13);
        assert_eq!(Difficulty::Endless.profile().scale_cash(10.0), 30);
    }

    #[test]
    fn test_scale_coins() {
        assert_eq!(Difficulty::Tier(1).profile().scale_coins(25), 37);
        assert_eq!(Difficulty::Tier(2).profile().scale_coins(10), 12);
        assert_eq!(Difficulty::Tier(6).profile().scale_coins(25), 12);
    }
}
