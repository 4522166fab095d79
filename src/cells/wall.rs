use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate};
use crate::model::{Contribution, Reward, base_strength, reward_scale};
use crate::persistence::inf;
use crate::util::{RoundType, format_value};

/// Each click while disassembling knocks off this fraction of a second of work.
pub const CLICK_SCALE: f64 = 0.10;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallState {
    /// Disassembly done so far, in strength units.
    pub damage: Accumulator,
    #[serde(with = "inf")]
    pub strength: f64,
    pub clicks: u32,
}

/// Disassembled by neighboring BOSS power. Never blocks its neighbors.
#[derive(Clone, Debug)]
pub struct Wall {
    pub dist: u32,
    pub state: WallState,
    power: Aggregate,
    pub percent: f64,
    /// Seconds until the wall falls at the current rate.
    pub time_remaining: f64,
}

impl Wall {
    pub fn new(dist: u32) -> Self {
        let strength = base_strength(dist);
        Self {
            dist,
            state: WallState { damage: Accumulator::idle(), strength, clicks: 0 },
            power: Aggregate::default(),
            percent: 100.0,
            time_remaining: f64::INFINITY,
        }
    }

    pub fn base_strength(&self) -> f64 {
        base_strength(self.dist)
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    /// Strength left at `now` given the disassembly rate `d`.
    pub fn remaining(&self, now: f64, d: f64) -> f64 {
        let clicks = self.state.clicks as f64 * d * CLICK_SCALE;
        self.state.strength - self.state.damage.progress(now, d) - clicks
    }

    /// Only counts while something is disassembling the wall.
    pub fn click(&mut self) -> bool {
        if self.power.d() > 0.0 {
            self.state.clicks += 1;
            true
        } else {
            false
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "Disassembling {} more seconds. D: {} E: {}",
            format_value(self.time_remaining, RoundType::Ceil, "", ""),
            format_value(self.power.d(), RoundType::Floor, "", ""),
            self.power.e()
        )
    }
}

impl CellBehavior for Wall {
    type State = WallState;

    fn state(&self) -> &WallState {
        &self.state
    }

    fn restore(&mut self, state: WallState) {
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        let d = self.power.d();

        if self.power.d_changed() && self.state.damage.is_running() {
            let last_d = self.power.last_d();
            self.state.damage.rebase(now, last_d);
            // clicks were worth the old rate
            self.state.damage.previous_progress += self.state.clicks as f64 * last_d * CLICK_SCALE;
            self.state.clicks = 0;
        } else if d > 0.0 && !self.state.damage.is_running() {
            self.state.damage.begin(now);
        }

        let remaining = self.remaining(now, d);
        self.time_remaining = remaining / d;
        self.percent = if self.state.damage.is_running() {
            100.0 * remaining / self.base_strength()
        } else {
            100.0
        };

        (remaining <= 0.0).then(|| Reward::dpoints(reward_scale(self.dist)))
    }

    fn percent(&self) -> f64 {
        self.percent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boss(power: f64) -> Contribution {
        Contribution { dis_power: power, ..Default::default() }
    }

    #[test]
    fn no_power_never_completes() {
        let mut wall = Wall::new(4);
        assert_eq!(wall.update(0.0, &[]), None);
        assert_eq!(wall.update(1e9, &[]), None);
        assert!(wall.time_remaining.is_infinite());
        assert_eq!(wall.percent, 100.0);
    }

    #[test]
    fn falls_when_strength_runs_out() {
        let mut wall = Wall::new(4);
        let strength = wall.base_strength();
        assert_eq!(wall.update(0.0, &[boss(1.0)]), None);
        assert_eq!(wall.update(strength - 1.0, &[boss(1.0)]), None);
        let reward = wall.update(strength, &[boss(1.0)]);
        assert_eq!(reward, Some(Reward::dpoints(1.3f64.powi(4))));
    }

    #[test]
    fn rate_change_keeps_earlier_damage() {
        let mut wall = Wall::new(4);
        wall.update(0.0, &[boss(1.0)]);
        wall.update(10.0, &[boss(3.0)]);
        let left = wall.remaining(20.0, 3.0);
        assert!((left - (wall.base_strength() - 10.0 - 30.0)).abs() < 1e-9);
    }

    #[test]
    fn clicks_need_power_and_fold_on_rate_change() {
        let mut wall = Wall::new(4);
        wall.update(0.0, &[]);
        assert!(!wall.click());
        wall.update(1.0, &[boss(2.0)]);
        assert!(wall.click());
        assert!(wall.click());
        wall.update(2.0, &[boss(4.0)]);
        assert_eq!(wall.state.clicks, 0);
        let expected = wall.base_strength() - 2.0 - 2.0 * 2.0 * CLICK_SCALE;
        assert!((wall.remaining(2.0, 4.0) - expected).abs() < 1e-9);
    }
}
