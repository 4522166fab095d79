use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate};
use crate::model::{Contribution, Reward, base_strength, reward_scale};
use crate::persistence::inf;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheeseState {
    /// Fermentation done so far. Only starts once the cow has been milked.
    pub ferment: Accumulator,
    pub milk: u32,
    #[serde(with = "inf")]
    pub strength: f64,
}

/// Ferments under neighboring tick power after the first milking.
#[derive(Clone, Debug)]
pub struct Cheese {
    pub dist: u32,
    pub state: CheeseState,
    power: Aggregate,
    pub percent: f64,
    pub time_remaining: f64,
}

impl Cheese {
    pub fn new(dist: u32) -> Self {
        Self {
            dist,
            state: CheeseState { ferment: Accumulator::idle(), milk: 0, strength: base_strength(dist) },
            power: Aggregate::default(),
            percent: 100.0,
            time_remaining: f64::INFINITY,
        }
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn remaining(&self, now: f64, t: f64) -> f64 {
        self.state.strength - self.state.ferment.progress(now, t)
    }

    pub fn milk(&mut self, now: f64) {
        if !self.state.ferment.is_running() {
            self.state.ferment.begin(now);
        }
        self.state.milk += 1;
    }

    pub fn describe(&self) -> String {
        format!("{} gallons of milk, fermenting {} more seconds", self.state.milk, self.time_remaining.ceil())
    }
}

impl CellBehavior for Cheese {
    type State = CheeseState;

    fn state(&self) -> &CheeseState {
        &self.state
    }

    fn restore(&mut self, state: CheeseState) {
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        let t = self.power.t();
        if self.power.t_changed() {
            self.state.ferment.rebase(now, self.power.last_t());
        }

        let remaining = self.remaining(now, t);
        self.time_remaining = if self.state.ferment.is_running() { remaining / t } else { f64::INFINITY };
        self.percent = if self.state.ferment.is_running() {
            100.0 * remaining / base_strength(self.dist)
        } else {
            100.0
        };

        (self.state.ferment.is_running() && remaining <= 0.0)
            .then(|| Reward::tpoints(reward_scale(self.dist)))
    }

    fn percent(&self) -> f64 {
        self.percent
    }
}
