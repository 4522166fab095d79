use super::{CellBehavior, Stateless};
use crate::model::{Contribution, Points, Reward};
use crate::util::{RoundType, format_value};

/// Power, T cost and D cost of a new unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildCost {
    pub power: f64,
    pub tpoints: f64,
    pub dpoints: f64,
}

/// A SPOT gets `min(T, 2D)` power for that many T and a quarter as many D.
pub fn spot_cost(points: &Points) -> Option<BuildCost> {
    if points.tpoints <= 0.0 || points.dpoints <= 0.0 {
        return None;
    }
    let power = points.tpoints.min(points.dpoints * 2.0);
    Some(BuildCost { power, tpoints: power, dpoints: power / 4.0 })
}

/// A BOSS takes every D point and no T.
pub fn boss_cost(points: &Points) -> Option<BuildCost> {
    if points.dpoints <= 0.0 {
        return None;
    }
    Some(BuildCost { power: points.dpoints, tpoints: 0.0, dpoints: points.dpoints })
}

/// Turns points into new SPOTs and BOSSes in an empty neighbor.
#[derive(Clone, Debug, Default)]
pub struct Build {
    pub state: Stateless,
}

impl Build {
    pub fn describe(&self, points: &Points) -> String {
        let spot = spot_cost(points).map_or(0.0, |c| c.power);
        format!(
            "Build SPOT {} x power (uses T, 1/4 of it in D)\nBuild BOSS {} x power (uses all D)",
            format_value(spot, RoundType::Floor, "", ""),
            format_value(points.dpoints, RoundType::Floor, "", "")
        )
    }
}

impl CellBehavior for Build {
    type State = Stateless;

    fn state(&self) -> &Stateless {
        &self.state
    }

    fn restore(&mut self, state: Stateless) {
        self.state = state;
    }

    fn update(&mut self, _now: f64, _neighbors: &[Contribution]) -> Option<Reward> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spot_is_capped_by_double_d() {
        let cost = spot_cost(&Points { tpoints: 100.0, dpoints: 10.0 });
        assert_eq!(cost, Some(BuildCost { power: 20.0, tpoints: 20.0, dpoints: 5.0 }));
        let cost = spot_cost(&Points { tpoints: 8.0, dpoints: 10.0 });
        assert_eq!(cost.map(|c| c.power), Some(8.0));
    }

    #[test]
    fn nothing_to_build_without_points() {
        assert_eq!(spot_cost(&Points { tpoints: 5.0, dpoints: 0.0 }), None);
        assert_eq!(boss_cost(&Points { tpoints: 5.0, dpoints: 0.0 }), None);
        assert_eq!(boss_cost(&Points { tpoints: 0.0, dpoints: 3.0 }).map(|c| c.dpoints), Some(3.0));
    }
}
