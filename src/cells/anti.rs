//! Antimatter dimensions. Eight tiers where each produces the tier below and
//! the first produces antimatter. Production is evaluated in closed form so
//! any elapsed time can be jumped over in one step.

use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::Aggregate;
use crate::model::{ACTIVE_FACTOR, Contribution, Reward, reward_scale};
use crate::persistence::inf;
use crate::util::{RoundType, format_value};

pub const DIMENSIONS: usize = 8;
pub const DIM_BASE_PRICE: [f64; DIMENSIONS] = [10.0, 100.0, 1e4, 1e6, 1e9, 1e13, 1e18, 1e24];
const BASE_PER_10: [f64; 9] = [1.0, 1e3, 1e4, 1e5, 1e6, 1e8, 1e10, 1e12, 1e15];
const STARTING_ANTI: f64 = 10.0;

/// Antimatter after `t` scaled seconds from dimension amounts `dims` with
/// per-tier multipliers `mults`. Tier k contributes through the degree k+1
/// term of the fitted production polynomial.
pub fn compound(dims: &[f64], mults: &[f64], t: f64) -> f64 {
    let mut cumulative = 1.0;
    let mut d = [0.0; DIMENSIONS];
    for (i, slot) in d.iter_mut().enumerate() {
        cumulative *= mults.get(i).copied().unwrap_or(0.0);
        *slot = dims.get(i).copied().unwrap_or(0.0) * cumulative;
    }
    let val = (t.powi(8) * d[7]
        + t.powi(7) * (8.0 * d[6] - 28.0 * d[7])
        + t.powi(6) * (56.0 * d[5] - 168.0 * d[6] + 322.0 * d[7])
        + t.powi(5) * (336.0 * d[4] - 840.0 * d[5] + 1400.0 * d[6] - 1960.0 * d[7])
        + t.powi(4) * (1680.0 * d[3] - 3360.0 * d[4] + 4760.0 * d[5] - 5880.0 * d[6] + 6769.0 * d[7])
        + t.powi(3)
            * (6720.0 * d[2] - 10080.0 * d[3] + 11760.0 * d[4] - 12600.0 * d[5] + 12992.0 * d[6]
                - 13132.0 * d[7])
        + t.powi(2)
            * (20160.0 * d[1] - 20160.0 * d[2] + 18480.0 * d[3] - 16800.0 * d[4] + 15344.0 * d[5]
                - 14112.0 * d[6]
                + 13068.0 * d[7])
        + t * (40320.0 * d[0] - 20160.0 * d[1] + 13440.0 * d[2] - 10080.0 * d[3] + 8064.0 * d[4]
            - 6720.0 * d[5]
            + 5760.0 * d[6]
            - 5040.0 * d[7]))
        / 40320.0;
    if val.is_nan() { f64::INFINITY } else { val.max(0.0) }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuySize {
    #[default]
    One,
    UntilTen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AntiCommand {
    BuyDimension(usize),
    BuyTickspeed,
    ToggleBuySize,
    BuyMax,
    Boost,
    Galaxy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AntiState {
    /// Start of the current production interval. Infinite until the first purchase.
    #[serde(with = "inf")]
    pub start: f64,
    #[serde(with = "inf")]
    pub saved_anti: f64,
    #[serde(with = "inf::seq")]
    pub saved_dims: Vec<f64>,
    pub bought_dims: Vec<u32>,
    #[serde(with = "inf::seq")]
    pub dim_mults: Vec<f64>,
    pub tick_level: u32,
    pub boosts: u32,
    pub galaxies: u32,
    pub max_dim_unlocked: usize,
}

/// Requirement for the next dimension boost: `count` of dimension `dim`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoostReq {
    pub count: f64,
    pub dim: usize,
}

#[derive(Clone, Debug)]
pub struct Anti {
    pub dist: u32,
    pub state: AntiState,
    power: Aggregate,
    pub percent: f64,
    pub anti: f64,
    pub dims: [f64; DIMENSIONS],
    /// Antimatter per second at the current amounts.
    pub rate: f64,
    pub buy_size: BuySize,
}

impl Anti {
    pub fn new(dist: u32) -> Self {
        let mut anti = Self {
            dist,
            state: AntiState {
                start: f64::INFINITY,
                saved_anti: STARTING_ANTI,
                saved_dims: vec![0.0; DIMENSIONS],
                bought_dims: vec![0; DIMENSIONS],
                dim_mults: Vec::new(),
                tick_level: 0,
                boosts: 0,
                galaxies: 0,
                max_dim_unlocked: 3,
            },
            power: Aggregate::default(),
            percent: 100.0,
            anti: STARTING_ANTI,
            dims: [0.0; DIMENSIONS],
            rate: 0.0,
            buy_size: BuySize::One,
        };
        anti.reset_dimensions(f64::INFINITY);
        anti
    }

    pub fn base_strength(&self) -> f64 {
        ACTIVE_FACTOR * (400.0 / 0.5) * 210000f64.powi(self.dist as i32 - 5)
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn is_running(&self) -> bool {
        self.state.start < f64::INFINITY
    }

    pub fn tickspeed_base(&self) -> f64 {
        1.125 + 0.02 * self.state.galaxies as f64
    }

    pub fn tickspeed(&self) -> f64 {
        self.tickspeed_base().powi(self.state.tick_level as i32)
    }

    pub fn tickspeed_cost(&self) -> f64 {
        10f64.powi(self.state.tick_level as i32 + 3)
    }

    fn base_per_10(n: u32) -> f64 {
        let max = BASE_PER_10.len() - 1;
        match BASE_PER_10.get(n as usize) {
            Some(&v) => v,
            None => BASE_PER_10[max] * 1e3f64.powi((n as usize - max) as i32),
        }
    }

    pub fn dim_cost(&self, i: usize) -> f64 {
        DIM_BASE_PRICE[i] * Self::base_per_10(self.state.bought_dims[i] / 10)
    }

    pub fn until_10_size(&self, i: usize) -> u32 {
        10 - self.state.bought_dims[i] % 10
    }

    pub fn boost_mult(&self, i: usize) -> f64 {
        2f64.powi((self.state.boosts as i32 - i as i32).max(0))
    }

    pub fn boost_req(&self) -> BoostReq {
        if self.state.boosts < 4 {
            BoostReq { count: 20.0, dim: self.state.boosts as usize + 3 }
        } else {
            BoostReq { count: 15.0 * self.state.boosts as f64 - 40.0, dim: 7 }
        }
    }

    pub fn galaxy_req(&self) -> f64 {
        80.0 + 60.0 * self.state.galaxies as f64
    }

    fn scaled_elapsed(&self, now: f64, t: f64) -> f64 {
        if self.is_running() { (now - self.state.start).max(0.0) * self.tickspeed() * t } else { 0.0 }
    }

    /// Antimatter and dimension amounts at `now` with tick power `t`.
    fn evaluate(&self, now: f64, t: f64) -> (f64, [f64; DIMENSIONS]) {
        let s = &self.state;
        let mut dims = [0.0; DIMENSIONS];
        dims.copy_from_slice(&s.saved_dims[..DIMENSIONS]);
        if !self.is_running() {
            return (s.saved_anti, dims);
        }
        let tau = self.scaled_elapsed(now, t);
        let anti = compound(&s.saved_dims, &s.dim_mults, tau) + s.saved_anti;
        for (i, dim) in dims.iter_mut().enumerate() {
            *dim += compound(&s.saved_dims[i + 1..], &s.dim_mults[i + 1..], tau);
        }
        (anti, dims)
    }

    /// Bank production so far at tick power `t` and start a new interval at `now`.
    fn snapshot(&mut self, now: f64, t: f64) {
        let (anti, dims) = self.evaluate(now, t);
        self.state.saved_anti = anti;
        self.state.saved_dims.copy_from_slice(&dims);
        self.state.start = now;
        self.anti = anti;
        self.dims = dims;
    }

    fn reset_dimensions(&mut self, now: f64) {
        let s = &mut self.state;
        s.saved_anti = STARTING_ANTI;
        s.saved_dims = vec![0.0; DIMENSIONS];
        s.bought_dims = vec![0; DIMENSIONS];
        s.tick_level = 0;
        s.dim_mults = vec![0.1; DIMENSIONS + 1];
        s.dim_mults[0] = 1.0;
        for i in 0..DIMENSIONS.min(s.boosts as usize) {
            let mult = 2f64.powi((s.boosts as i32 - i as i32).max(0));
            s.dim_mults[i] *= mult;
        }
        if s.start < f64::INFINITY {
            s.start = now;
        }
        self.anti = STARTING_ANTI;
        self.dims = [0.0; DIMENSIONS];
    }

    fn buy_dimension(&mut self, i: usize, max_mode: bool, now: f64) -> bool {
        if i > self.state.max_dim_unlocked {
            return false;
        }
        let unit = self.dim_cost(i);
        let anti = self.evaluate(now, self.power.t()).0;
        let size = match (self.buy_size, max_mode) {
            (BuySize::One, false) => 1,
            (_, true) => self.until_10_size(i),
            (BuySize::UntilTen, false) => self.until_10_size(i).min((anti / unit).floor() as u32),
        };
        let cost = size as f64 * unit;
        if size == 0 || anti < cost {
            return false;
        }
        self.snapshot(now, self.power.t());
        self.state.saved_anti -= cost;
        self.anti = self.state.saved_anti;
        self.state.bought_dims[i] += size;
        self.state.saved_dims[i] += size as f64;
        let doubling = 2f64.powi((self.state.bought_dims[i] / 10) as i32);
        let base = if i == 0 { 1.0 } else { 0.1 };
        self.state.dim_mults[i] = self.boost_mult(i) * base * doubling;
        true
    }

    pub fn buy_tickspeed(&mut self, now: f64) -> bool {
        let cost = self.tickspeed_cost();
        if self.evaluate(now, self.power.t()).0 < cost {
            return false;
        }
        self.snapshot(now, self.power.t());
        self.state.saved_anti -= cost;
        self.anti = self.state.saved_anti;
        self.state.tick_level += 1;
        true
    }

    /// Tickspeed as far as affordable, then every unlocked dimension from the
    /// top down in blocks of ten.
    pub fn buy_max(&mut self, now: f64) -> bool {
        if self.evaluate(now, self.power.t()).0.is_infinite() {
            return false;
        }
        let mut bought = false;
        while self.buy_tickspeed(now) {
            bought = true;
        }
        for i in (0..=self.state.max_dim_unlocked.min(DIMENSIONS - 1)).rev() {
            while self.buy_dimension(i, true, now) {
                bought = true;
            }
        }
        bought
    }

    pub fn boost(&mut self, now: f64) -> bool {
        let req = self.boost_req();
        if self.evaluate(now, self.power.t()).1[req.dim] < req.count {
            return false;
        }
        self.state.boosts += 1;
        self.reset_dimensions(now);
        self.state.max_dim_unlocked = (self.state.max_dim_unlocked + 1).min(DIMENSIONS - 1);
        true
    }

    pub fn galaxy(&mut self, now: f64) -> bool {
        if self.evaluate(now, self.power.t()).1[DIMENSIONS - 1] < self.galaxy_req() {
            return false;
        }
        self.state.galaxies += 1;
        self.state.boosts = 0;
        self.state.max_dim_unlocked = 3;
        self.reset_dimensions(now);
        true
    }

    pub fn command(&mut self, command: AntiCommand, now: f64) -> bool {
        match command {
            AntiCommand::BuyDimension(i) if i < DIMENSIONS => self.buy_dimension(i, false, now),
            AntiCommand::BuyDimension(_) => false,
            AntiCommand::BuyTickspeed => self.buy_tickspeed(now),
            AntiCommand::ToggleBuySize => {
                self.buy_size = match self.buy_size {
                    BuySize::One => BuySize::UntilTen,
                    BuySize::UntilTen => BuySize::One,
                };
                true
            }
            AntiCommand::BuyMax => self.buy_max(now),
            AntiCommand::Boost => self.boost(now),
            AntiCommand::Galaxy => self.galaxy(now),
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "Antimatter {} / {} ({}/s)\nTickspeed {} (x{:.3}/upgrade), boosts {}, galaxies {}",
            format_value(self.anti, RoundType::Floor, "", ""),
            format_value(self.base_strength(), RoundType::Ceil, "", ""),
            format_value(self.rate, RoundType::Floor, "", ""),
            format_value(self.tickspeed(), RoundType::Floor, "", ""),
            self.tickspeed_base(),
            self.state.boosts,
            self.state.galaxies
        )
    }
}

impl CellBehavior for Anti {
    type State = AntiState;

    fn state(&self) -> &AntiState {
        &self.state
    }

    fn restore(&mut self, mut state: AntiState) {
        state.saved_dims.resize(DIMENSIONS, 0.0);
        state.bought_dims.resize(DIMENSIONS, 0);
        state.dim_mults.resize(DIMENSIONS + 1, 0.1);
        state.max_dim_unlocked = state.max_dim_unlocked.min(DIMENSIONS - 1);
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        if self.power.t_changed() && self.is_running() {
            self.snapshot(now, self.power.last_t());
        }
        let t = self.power.t();
        let (anti, dims) = self.evaluate(now, t);
        self.anti = anti;
        self.dims = dims;
        self.rate = if self.is_running() {
            compound(&dims, &self.state.dim_mults, self.tickspeed() * t)
        } else {
            0.0
        };

        self.percent = 100.0 * (1.0 - self.anti / self.base_strength());
        (self.percent <= 0.0).then(|| Reward::tpoints(reward_scale(self.dist)))
    }

    fn percent(&self) -> f64 {
        self.percent
    }
}
