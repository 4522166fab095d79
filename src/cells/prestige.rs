use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate};
use crate::model::{Contribution, Reward, STRENGTH_DIST_FACTOR, reward_scale};
use crate::util::{RoundType, format_value};

pub const TIER_COUNT: usize = 10;

pub const TIERS: [(&str, &str); TIER_COUNT] = [
    ("I", "Nanoprestige"),
    ("II", "Microprestige"),
    ("III", "Miniprestige"),
    ("IV", "Small Prestige"),
    ("V", "Partial Prestige"),
    ("VI", "Full Prestige"),
    ("VII", "Multiprestige"),
    ("VIII", "Hyperprestige"),
    ("IX", "Ultraprestige"),
    ("X", "Final Prestige"),
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrestigeState {
    /// Coins earned since the last activation.
    pub coins: Accumulator,
    pub prestiges: [u32; TIER_COUNT],
}

/// Ten stacked prestige layers. Coins flow at tick power times the product
/// of every tier's multiplier.
#[derive(Clone, Debug)]
pub struct Prestige {
    pub dist: u32,
    pub state: PrestigeState,
    power: Aggregate,
    pub percent: f64,
    pub coins: f64,
}

impl Prestige {
    pub fn new(dist: u32) -> Self {
        Self {
            dist,
            state: PrestigeState { coins: Accumulator::idle(), prestiges: [0; TIER_COUNT] },
            power: Aggregate::default(),
            percent: 100.0,
            coins: 0.0,
        }
    }

    pub fn base_strength(&self) -> f64 {
        (100.0 * STRENGTH_DIST_FACTOR.powi(self.dist as i32) + 0.5).floor()
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn gain(&self) -> f64 {
        self.state.prestiges.iter().fold(1.0, |acc, &p| acc * (1.0 + p as f64))
    }

    pub fn coins_at(&self, now: f64) -> f64 {
        self.state.coins.progress(now, self.power.t() * self.gain())
    }

    /// Coins for tier 0, otherwise a count of the tier below.
    pub fn requirement(&self, tier: usize) -> f64 {
        if tier == 0 {
            (1.5f64.powi(self.state.prestiges[0] as i32) * 10.0).floor()
        } else {
            ((tier + 1) as f64).powi(self.state.prestiges[tier] as i32 + 1)
        }
    }

    pub fn can_activate(&self, tier: usize, now: f64) -> bool {
        match tier {
            0 => self.coins_at(now) >= self.requirement(0),
            t if t < TIER_COUNT => self.state.prestiges[t - 1] as f64 >= self.requirement(t),
            _ => false,
        }
    }

    /// Resets coins and every lower tier, then bumps `tier`.
    pub fn activate(&mut self, tier: usize, now: f64) -> bool {
        if !self.can_activate(tier, now) {
            return false;
        }
        self.state.coins.restart(now);
        for lower in &mut self.state.prestiges[..tier] {
            *lower = 0;
        }
        self.state.prestiges[tier] += 1;
        self.coins = 0.0;
        true
    }

    pub fn describe(&self) -> String {
        format!(
            "Coins {} / {} (x{} gain)",
            format_value(self.coins, RoundType::Floor, "", ""),
            self.base_strength(),
            format_value(self.gain(), RoundType::Floor, "", "")
        )
    }
}

impl CellBehavior for Prestige {
    type State = PrestigeState;

    fn state(&self) -> &PrestigeState {
        &self.state
    }

    fn restore(&mut self, state: PrestigeState) {
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        let gain = self.gain();

        if !self.state.coins.is_running() && self.power.t() > 0.0 {
            self.state.coins.begin(now);
        }
        if self.power.t_changed() {
            self.state.coins.rebase(now, self.power.last_t() * gain);
        }

        self.coins = self.coins_at(now);
        self.percent = 100.0 * (1.0 - self.coins / self.base_strength());
        (self.percent <= 0.0).then(|| Reward::tpoints(reward_scale(self.dist)))
    }

    fn percent(&self) -> f64 {
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(power: f64) -> Contribution {
        Contribution { tick_power: power, ..Default::default() }
    }

    #[test]
    fn requirements() {
        let mut p = Prestige::new(4);
        assert_eq!(p.requirement(0), 10.0);
        assert_eq!(p.requirement(1), 2.0);
        assert_eq!(p.requirement(3), 4.0);
        p.state.prestiges[0] = 2;
        assert_eq!(p.requirement(0), 22.0);
        p.state.prestiges[1] = 1;
        assert_eq!(p.requirement(1), 4.0);
    }

    #[test]
    fn activation_resets_lower_tiers_and_multiplies_gain() {
        let mut p = Prestige::new(4);
        p.update(0.0, &[spot(1.0)]);
        assert!(!p.activate(0, 5.0));
        p.update(10.0, &[spot(1.0)]);
        assert!(p.activate(0, 10.0));
        assert_eq!(p.state.prestiges[0], 1);
        assert_eq!(p.gain(), 2.0);
        assert_eq!(p.coins_at(10.0), 0.0);
        assert_eq!(p.coins_at(12.0), 4.0);

        p.state.prestiges[0] = 2;
        assert!(p.activate(1, 12.0));
        assert_eq!(p.state.prestiges, [0, 1, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn falls_at_base_strength() {
        let mut p = Prestige::new(0);
        assert_eq!(p.base_strength(), 100.0);
        p.update(0.0, &[spot(1.0)]);
        let rate = 0.95f64.powi(-4);
        assert_eq!(p.update(99.0 / rate, &[spot(1.0)]), None);
        assert!(p.update(100.0 / rate + 0.01, &[spot(1.0)]).is_some());
    }
}
