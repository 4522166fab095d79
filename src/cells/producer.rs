use serde::{Deserialize, Serialize};

use super::CellBehavior;
use crate::model::{Contribution, Reward};
use crate::persistence::inf;
use crate::util::{RoundType, format_value};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerState {
    #[serde(with = "inf")]
    pub tick_power: f64,
    #[serde(with = "inf")]
    pub dis_power: f64,
}

/// SPOT (tick power) or BOSS (disassembly power). Hands the same power to
/// every neighbor each tick until merged away.
#[derive(Clone, Debug)]
pub struct Producer {
    pub state: ProducerState,
    /// Set by a merge or sacrifice. The next update asks for removal.
    pub merged: bool,
}

impl Producer {
    pub fn spot(power: f64) -> Self {
        Self { state: ProducerState { tick_power: power, dis_power: 0.0 }, merged: false }
    }

    pub fn boss(power: f64) -> Self {
        Self { state: ProducerState { tick_power: 0.0, dis_power: power }, merged: false }
    }

    /// The larger of the two channels, which is the one this producer feeds.
    pub fn power(&self) -> f64 {
        self.state.tick_power.max(self.state.dis_power)
    }

    /// Background hue for the renderer: one full turn every twelve orders of magnitude.
    pub fn hsl(&self) -> (f64, f64, f64) {
        let oom = self.power().max(f64::MIN_POSITIVE).log10();
        let h = (oom * 30.0).rem_euclid(360.0);
        let s = 30.0 + oom.rem_euclid(1.0) * 70.0;
        (h, s, 50.0)
    }

    pub fn describe(&self, label: &str) -> String {
        format!("{} details - power: {}", label, format_value(self.power(), RoundType::Floor, "", ""))
    }
}

impl CellBehavior for Producer {
    type State = ProducerState;

    fn state(&self) -> &ProducerState {
        &self.state
    }

    fn restore(&mut self, state: ProducerState) {
        self.state = state;
        self.merged = false;
    }

    fn update(&mut self, _now: f64, _neighbors: &[Contribution]) -> Option<Reward> {
        self.merged.then(Reward::merged)
    }

    fn contribution(&self) -> Contribution {
        Contribution {
            tick_power: self.state.tick_power,
            dis_power: self.state.dis_power,
            enemy_power: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RewardSource;

    #[test]
    fn producers_only_leave_when_merged() {
        let mut spot = Producer::spot(3.0);
        assert_eq!(spot.update(1.0, &[]), None);
        spot.merged = true;
        let reward = spot.update(2.0, &[]).map(|r| r.source);
        assert_eq!(reward, Some(RewardSource::Merged));
    }

    #[test]
    fn contribution_follows_channel() {
        assert_eq!(Producer::spot(2.0).contribution().tick_power, 2.0);
        assert_eq!(Producer::boss(4.0).contribution().dis_power, 4.0);
        assert_eq!(Producer::boss(4.0).contribution().tick_power, 0.0);
    }

    #[test]
    fn hue_wraps_with_magnitude() {
        let (h, s, _) = Producer::spot(1.0).hsl();
        assert_eq!(h, 0.0);
        assert_eq!(s, 30.0);
        let (h, _, _) = Producer::spot(100.0).hsl();
        assert!((h - 60.0).abs() < 1e-9);
    }
}
