//! Shared obstacle behavior: neighbor power aggregation with last-tick
//! snapshots, and the start/previous-progress accumulator that integrates
//! a player controlled rate over time.

use serde::{Deserialize, Serialize};

use crate::model::{Contribution, POWER_DIST_FACTOR};
use crate::persistence::inf;

/// Aggregated power on the three neighbor channels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Power {
    pub t: f64,
    pub d: f64,
    pub e: f64,
}

impl Power {
    /// Plain sum of what the neighbors hand out, without distance scaling.
    pub fn sum(neighbors: &[Contribution]) -> Self {
        neighbors.iter().fold(Power::default(), |acc, n| Power {
            t: acc.t + n.tick_power,
            d: acc.d + n.dis_power,
            e: acc.e + n.enemy_power,
        })
    }
}

/// Per-tick power reading of an obstacle plus the reading of the tick before.
#[derive(Clone, Debug, Default)]
pub struct Aggregate {
    pub current: Power,
    pub last: Power,
    seen: bool,
}

impl Aggregate {
    /// Sum the neighbors, scale tick and disassembly power by distance and
    /// zero disassembly while a live obstacle is adjacent.
    pub fn update(&mut self, dist: u32, neighbors: &[Contribution]) {
        let mut power = Power::sum(neighbors);
        let scale = POWER_DIST_FACTOR.powi(dist as i32 - 4);
        power.t *= scale;
        power.d *= scale;
        if power.e > 0.0 {
            power.d = 0.0;
        }
        // first reading must not look like a rate change
        self.last = if self.seen { self.current } else { power };
        self.current = power;
        self.seen = true;
    }

    pub fn t(&self) -> f64 {
        self.current.t
    }

    pub fn d(&self) -> f64 {
        self.current.d
    }

    pub fn e(&self) -> f64 {
        self.current.e
    }

    pub fn last_t(&self) -> f64 {
        self.last.t
    }

    pub fn last_d(&self) -> f64 {
        self.last.d
    }

    pub fn t_changed(&self) -> bool {
        self.current.t != self.last.t
    }

    pub fn d_changed(&self) -> bool {
        self.current.d != self.last.d
    }
}

/// Progress accrued so far plus a start time from which more accrues at the
/// current rate. An infinite `start` means the timer is not running.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accumulator {
    #[serde(with = "inf")]
    pub start: f64,
    #[serde(with = "inf")]
    pub previous_progress: f64,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self::idle()
    }
}

impl Accumulator {
    pub fn idle() -> Self {
        Self { start: f64::INFINITY, previous_progress: 0.0 }
    }

    pub fn is_running(&self) -> bool {
        self.start < f64::INFINITY
    }

    /// Start accruing from `now`, keeping what was banked.
    pub fn begin(&mut self, now: f64) {
        self.start = now;
    }

    /// Start over from zero at `now`.
    pub fn restart(&mut self, now: f64) {
        self.start = now;
        self.previous_progress = 0.0;
    }

    pub fn stop(&mut self) {
        *self = Self::idle();
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        if self.is_running() { (now - self.start).max(0.0) } else { 0.0 }
    }

    /// Banked progress plus what accrued since `start` at `rate`.
    pub fn progress(&self, now: f64, rate: f64) -> f64 {
        if self.is_running() && rate != 0.0 {
            self.previous_progress + self.elapsed(now) * rate
        } else {
            self.previous_progress
        }
    }

    /// Bank everything accrued at `old_rate` and restart the clock at `now`.
    /// Call before the rate changes so the elapsed interval keeps its rate.
    pub fn rebase(&mut self, now: f64, old_rate: f64) {
        if self.is_running() {
            self.previous_progress = self.progress(now, old_rate);
            self.start = now;
        }
    }
}

/// Seconds a button has to be held before it starts repeating every tick.
pub const CLICK_HOLD_DURATION: f64 = 0.5;

/// A pressed button. Released early it counts as one click, held past
/// `CLICK_HOLD_DURATION` it fires on every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Press<T: Copy> {
    pub target: T,
    pub since: f64,
}

impl<T: Copy> Press<T> {
    pub fn new(target: T, since: f64) -> Self {
        Self { target, since }
    }

    pub fn is_repeating(&self, now: f64) -> bool {
        now >= self.since + CLICK_HOLD_DURATION
    }

    pub fn is_click(&self, now: f64) -> bool {
        !self.is_repeating(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot(power: f64) -> Contribution {
        Contribution { tick_power: power, ..Default::default() }
    }

    fn boss(power: f64) -> Contribution {
        Contribution { dis_power: power, ..Default::default() }
    }

    fn enemy() -> Contribution {
        Contribution { enemy_power: 1.0, ..Default::default() }
    }

    #[test]
    fn first_reading_is_not_a_change() {
        let mut agg = Aggregate::default();
        agg.update(4, &[spot(2.0), boss(3.0)]);
        assert_eq!(agg.t(), 2.0);
        assert_eq!(agg.d(), 3.0);
        assert!(!agg.t_changed());
        assert!(!agg.d_changed());
        agg.update(4, &[spot(2.0)]);
        assert!(agg.d_changed());
        assert_eq!(agg.last_d(), 3.0);
    }

    #[test]
    fn distance_scales_tick_and_dis_power_only() {
        let mut agg = Aggregate::default();
        agg.update(6, &[spot(1.0), boss(1.0)]);
        let f = 0.95f64.powi(2);
        assert!((agg.t() - f).abs() < 1e-12);
        assert!((agg.d() - f).abs() < 1e-12);
    }

    #[test]
    fn adjacent_enemy_blocks_disassembly() {
        let mut agg = Aggregate::default();
        agg.update(4, &[spot(1.0), boss(5.0), enemy()]);
        assert_eq!(agg.d(), 0.0);
        assert_eq!(agg.t(), 1.0);
        assert_eq!(agg.e(), 1.0);
    }

    #[test]
    fn idle_accumulator_holds_banked_progress() {
        let mut acc = Accumulator::idle();
        acc.previous_progress = 5.0;
        assert_eq!(acc.progress(100.0, 3.0), 5.0);
        acc.rebase(100.0, 3.0);
        assert_eq!(acc.previous_progress, 5.0);
        assert!(!acc.is_running());
    }

    #[test]
    fn rebase_keeps_each_interval_at_its_own_rate() {
        let mut acc = Accumulator::idle();
        acc.restart(10.0);
        acc.rebase(14.0, 2.0);
        assert_eq!(acc.progress(20.0, 5.0), 4.0 * 2.0 + 6.0 * 5.0);
    }
}
