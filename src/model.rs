//! Core data types shared by every cell kind, the grid and the tick loop.
//! Cell specific state lives next to its logic under `cells`.

use serde::{Deserialize, Serialize};

use crate::persistence::inf;

/// Each step away from the origin makes an obstacle this much stronger.
pub const STRENGTH_DIST_FACTOR: f64 = 1.5;
/// Each step away from the origin makes a completion reward this much larger.
pub const REWARD_DIST_FACTOR: f64 = 1.3;
/// Incoming neighbor power is scaled by `POWER_DIST_FACTOR^(dist - 4)`.
pub const POWER_DIST_FACTOR: f64 = 0.95;
pub const ACTIVE_FACTOR: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn cell_count(&self) -> usize {
        (self.width * self.height) as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: u32,
    pub y: u32,
}

impl Position {
    /// Manhattan distance from the origin, which drives strength and reward scaling.
    pub fn dist(&self) -> u32 {
        self.x + self.y
    }
}

/// What a cell hands to each of its neighbors every tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contribution {
    /// Tick power from a SPOT.
    pub tick_power: f64,
    /// Disassembly power from a BOSS.
    pub dis_power: f64,
    /// Blocking weight of a live obstacle.
    pub enemy_power: f64,
}

/// Why a cell returned a reward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RewardSource {
    /// An obstacle was defeated. The cell is cleared.
    Completed,
    /// A producer was folded into another one. The cell is cleared without points.
    Merged,
    /// A spawn pool was cashed in. The cell stays.
    Harvest,
}

/// Points returned by `update` on the tick a cell finishes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub tpoints: f64,
    pub dpoints: f64,
    pub source: RewardSource,
}

impl Reward {
    pub fn tpoints(tpoints: f64) -> Self {
        Self { tpoints, dpoints: 0.0, source: RewardSource::Completed }
    }

    pub fn dpoints(dpoints: f64) -> Self {
        Self { tpoints: 0.0, dpoints, source: RewardSource::Completed }
    }

    pub fn merged() -> Self {
        Self { tpoints: 0.0, dpoints: 0.0, source: RewardSource::Merged }
    }

    pub fn harvest(tpoints: f64, dpoints: f64) -> Self {
        Self { tpoints, dpoints, source: RewardSource::Harvest }
    }

    /// Rewards with NaN, infinite or negative points are refused by the tick loop.
    pub fn is_well_formed(&self) -> bool {
        self.tpoints.is_finite() && self.dpoints.is_finite() && self.tpoints >= 0.0 && self.dpoints >= 0.0
    }

    /// Removes the cell that produced it.
    pub fn clears_cell(&self) -> bool {
        !matches!(self.source, RewardSource::Harvest)
    }
}

/// Global point totals. Passed into commands that spend them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Points {
    #[serde(with = "inf")]
    pub tpoints: f64,
    #[serde(with = "inf")]
    pub dpoints: f64,
}

impl Points {
    pub fn add(&mut self, reward: &Reward) {
        self.tpoints += reward.tpoints;
        self.dpoints += reward.dpoints;
    }
}

/// One line of the player-visible history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unix time in milliseconds.
    pub date: f64,
    pub msg: String,
}

/// Base strength shared by the simple obstacles: `10 * 1.5^dist`.
pub fn base_strength(dist: u32) -> f64 {
    10.0 * STRENGTH_DIST_FACTOR.powi(dist as i32)
}

pub fn reward_scale(dist: u32) -> f64 {
    REWARD_DIST_FACTOR.powi(dist as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harvest_keeps_cell() {
        assert!(!Reward::harvest(1.0, 1.0).clears_cell());
        assert!(Reward::merged().clears_cell());
        assert!(Reward::tpoints(2.0).clears_cell());
    }

    #[test]
    fn malformed_rewards_are_detected() {
        assert!(!Reward::tpoints(f64::NAN).is_well_formed());
        assert!(!Reward::dpoints(f64::INFINITY).is_well_formed());
        assert!(!Reward::tpoints(-1.0).is_well_formed());
        assert!(Reward::dpoints(3.0).is_well_formed());
    }

    #[test]
    fn dist_scaling() {
        assert_eq!(Position { x: 3, y: 4 }.dist(), 7);
        assert_eq!(base_strength(0), 10.0);
        assert!((base_strength(2) - 22.5).abs() < 1e-9);
        assert!((reward_scale(1) - 1.3).abs() < 1e-12);
    }
}
