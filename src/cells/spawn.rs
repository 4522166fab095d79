//! Spawning pool. Neighboring producers are sacrificed for a growth rate;
//! the pool grows at that rate and is harvested straight into points.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Power};
use crate::model::{Contribution, Reward};
use crate::persistence::inf;
use crate::util::{RoundType, format_value};

/// Multiples of the sacrificed power gained per second: one per sacred round of 260 minutes.
pub const SAC_RATE: f64 = 1.0 / (260.0 * 60.0);
/// Harvesting halves the sacrifice rates.
const HARVEST_DECAY: f64 = 0.5;

pub const MONTH_NAMES: [&str; 20] = [
    "Imix", "Ik'", "AK'b'al", "K'an", "Chikchan", "Kimi", "Manik'", "Lamat", "Muluk", "Ok", "Chuwen", "Eb'", "B'en",
    "Ix", "Men", "K'ib'", "Kab'an", "Etz'nab'", "Kawak", "Ajaw",
];
const MONTH_PERIOD: f64 = 20.0 * 60.0;
const DAY_PERIOD: f64 = 13.0 * 60.0;

/// Day number (1 to 13) and month name of the pool's calendar at `now`.
pub fn calendar(now: f64) -> (u32, &'static str) {
    let month = ((now / MONTH_PERIOD).rem_euclid(1.0) * 20.0).floor() as usize;
    let day = ((now / DAY_PERIOD).rem_euclid(1.0) * 13.0).floor() as u32;
    (day.min(12) + 1, MONTH_NAMES[month.min(19)])
}

/// Rotation of the month and day wheels in radians.
pub fn calendar_angles(now: f64) -> (f64, f64) {
    (-(TAU * now / MONTH_PERIOD) % TAU, -(TAU * now / DAY_PERIOD) % TAU)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnState {
    /// Tick power in the pool.
    pub t_pool: Accumulator,
    /// Disassembly power in the pool.
    pub d_pool: Accumulator,
    #[serde(with = "inf")]
    pub t_sac: f64,
    #[serde(with = "inf")]
    pub d_sac: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnCommand {
    Harvest,
}

#[derive(Clone, Debug)]
pub struct Spawn {
    pub state: SpawnState,
    pub pool: Power,
    /// What sacrificing the current neighbors would add.
    pub offer: Power,
    harvested: Option<(f64, f64)>,
}

impl Default for Spawn {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawn {
    pub fn new() -> Self {
        Self {
            state: SpawnState { t_pool: Accumulator::idle(), d_pool: Accumulator::idle(), t_sac: 0.0, d_sac: 0.0 },
            pool: Power::default(),
            offer: Power::default(),
            harvested: None,
        }
    }

    pub fn pool_at(&self, now: f64) -> (f64, f64) {
        (
            self.state.t_pool.progress(now, self.state.t_sac * SAC_RATE),
            self.state.d_pool.progress(now, self.state.d_sac * SAC_RATE),
        )
    }

    /// Fold growth so far into the pool at the current rates.
    pub fn bank(&mut self, now: f64) {
        let (t, d) = self.pool_at(now);
        self.state.t_pool = Accumulator { start: now, previous_progress: t };
        self.state.d_pool = Accumulator { start: now, previous_progress: d };
    }

    pub fn add_sacrifice(&mut self, tick_power: f64, dis_power: f64, now: f64) {
        self.bank(now);
        self.state.t_sac += tick_power;
        self.state.d_sac += dis_power;
    }

    /// Empty the pool into a pending harvest reward and halve the rates.
    pub fn harvest(&mut self, now: f64) -> bool {
        let (t, d) = self.pool_at(now);
        self.state.t_pool.restart(now);
        self.state.d_pool.restart(now);
        self.state.t_sac *= HARVEST_DECAY;
        self.state.d_sac *= HARVEST_DECAY;
        self.pool = Power::default();
        if t > 0.0 || d > 0.0 {
            self.harvested = Some((t, d));
            true
        } else {
            false
        }
    }

    pub fn command(&mut self, command: SpawnCommand, now: f64) -> bool {
        match command {
            SpawnCommand::Harvest => self.harvest(now),
        }
    }

    pub fn describe(&self, now: f64) -> String {
        let (day, month) = calendar(now);
        format!(
            "Current power: {{T: {}, D: {}}}\nCurrent rate: {{T: {}, D: {}}} / Sacred Round\nToday is: {} {}",
            format_value(self.pool.t, RoundType::Floor, "", ""),
            format_value(self.pool.d, RoundType::Floor, "", ""),
            format_value(self.state.t_sac, RoundType::Floor, "", ""),
            format_value(self.state.d_sac, RoundType::Floor, "", ""),
            day,
            month
        )
    }
}

impl CellBehavior for Spawn {
    type State = SpawnState;

    fn state(&self) -> &SpawnState {
        &self.state
    }

    fn restore(&mut self, state: SpawnState) {
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.offer = Power::sum(neighbors);
        if !self.state.t_pool.is_running() {
            self.state.t_pool.begin(now);
            self.state.d_pool.begin(now);
        }
        let (t, d) = self.pool_at(now);
        self.pool = Power { t, d, e: 0.0 };
        self.harvested.take().map(|(t, d)| Reward::harvest(t, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RewardSource;

    #[test]
    fn pool_grows_with_sacrifice() {
        let mut spawn = Spawn::new();
        spawn.update(0.0, &[]);
        spawn.add_sacrifice(260.0 * 60.0, 0.0, 0.0);
        spawn.update(10.0, &[]);
        assert!((spawn.pool.t - 10.0).abs() < 1e-9);
        assert_eq!(spawn.pool.d, 0.0);
    }

    #[test]
    fn later_sacrifice_keeps_earlier_growth() {
        let mut spawn = Spawn::new();
        spawn.update(0.0, &[]);
        spawn.add_sacrifice(SAC_RATE.recip(), 0.0, 0.0);
        spawn.add_sacrifice(SAC_RATE.recip(), 0.0, 5.0);
        assert!((spawn.pool_at(10.0).0 - 15.0).abs() < 1e-9);
    }

    #[test]
    fn harvest_pays_out_once_and_keeps_the_pool() {
        let mut spawn = Spawn::new();
        spawn.update(0.0, &[]);
        spawn.add_sacrifice(0.0, SAC_RATE.recip(), 0.0);
        assert!(spawn.harvest(4.0));
        let reward = spawn.update(4.0, &[]);
        assert_eq!(reward.map(|r| r.source), Some(RewardSource::Harvest));
        assert!((reward.map(|r| r.dpoints).unwrap_or(0.0) - 4.0).abs() < 1e-9);
        assert_eq!(spawn.update(5.0, &[]), None);
        assert_eq!(spawn.state.d_sac, 0.5 * SAC_RATE.recip());
    }

    #[test]
    fn empty_pool_harvest_is_rejected() {
        let mut spawn = Spawn::new();
        spawn.update(0.0, &[]);
        assert!(!spawn.harvest(1.0));
        assert_eq!(spawn.update(1.0, &[]), None);
    }

    #[test]
    fn calendar_cycles() {
        assert_eq!(calendar(0.0), (1, "Imix"));
        assert_eq!(calendar(90.0), (2, "Ik'"));
        assert_eq!(calendar(MONTH_PERIOD - 1.0), (7, "Ajaw"));
    }
}
