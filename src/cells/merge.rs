use super::{CellBehavior, Stateless};
use crate::model::{Contribution, Reward};
use crate::util::{RoundType, format_value};

/// Share of the weakest input added on top of the plain sum.
pub const MERGE_SCALING: f64 = 0.4;

/// Power of the unit a merge of `powers` produces: the sum plus 40% of the
/// weakest. Needs at least two positive inputs.
pub fn merged_power(powers: &[f64]) -> Option<f64> {
    let live: Vec<f64> = powers.iter().copied().filter(|p| *p > 0.0).collect();
    if live.len() < 2 {
        return None;
    }
    let sum: f64 = live.iter().sum();
    let min = live.iter().copied().fold(f64::INFINITY, f64::min);
    Some(sum + MERGE_SCALING * min)
}

/// What the merge buttons would produce given the current neighbors.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MergePreview {
    pub t_power: f64,
    pub d_power: f64,
    pub e_power: f64,
    /// Zero when fewer than two SPOTs are adjacent.
    pub t_merge: f64,
    /// Zero when fewer than two BOSSes are adjacent.
    pub d_merge: f64,
}

impl MergePreview {
    pub fn from_neighbors(neighbors: &[Contribution]) -> Self {
        let ts: Vec<f64> = neighbors.iter().map(|n| n.tick_power).collect();
        let ds: Vec<f64> = neighbors.iter().map(|n| n.dis_power).collect();
        Self {
            t_power: ts.iter().sum(),
            d_power: ds.iter().sum(),
            e_power: neighbors.iter().map(|n| n.enemy_power).sum(),
            t_merge: merged_power(&ts).unwrap_or(0.0),
            d_merge: merged_power(&ds).unwrap_or(0.0),
        }
    }
}

/// Folds adjacent SPOTs or BOSSes into one stronger unit.
#[derive(Clone, Debug, Default)]
pub struct Merge {
    pub state: Stateless,
    pub preview: MergePreview,
}

impl Merge {
    pub fn describe(&self, dist: u32) -> String {
        let p = &self.preview;
        format!(
            "Object Details - Dist: {} T: {} D: {} E: {}\nSPOT merge: {} => {}\nBOSS merge: {} => {}",
            dist,
            format_value(p.t_power, RoundType::Floor, "", ""),
            format_value(p.d_power, RoundType::Floor, "", ""),
            p.e_power,
            format_value(p.t_power, RoundType::Floor, "", ""),
            format_value(p.t_merge, RoundType::Floor, "", ""),
            format_value(p.d_power, RoundType::Floor, "", ""),
            format_value(p.d_merge, RoundType::Floor, "", "")
        )
    }
}

impl CellBehavior for Merge {
    type State = Stateless;

    fn state(&self) -> &Stateless {
        &self.state
    }

    fn restore(&mut self, state: Stateless) {
        self.state = state;
    }

    fn update(&mut self, _now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.preview = MergePreview::from_neighbors(neighbors);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_plus_share_of_weakest() {
        assert_eq!(merged_power(&[3.0, 5.0]), Some(8.0 + 0.4 * 3.0));
        assert_eq!(merged_power(&[1.0, 1.0, 1.0]), Some(3.4));
        assert_eq!(merged_power(&[4.0]), None);
        assert_eq!(merged_power(&[4.0, 0.0, 0.0]), None);
    }

    #[test]
    fn preview_splits_channels() {
        let spot = |t| Contribution { tick_power: t, ..Default::default() };
        let boss = |d| Contribution { dis_power: d, ..Default::default() };
        let p = MergePreview::from_neighbors(&[spot(2.0), spot(2.0), boss(7.0)]);
        assert_eq!(p.t_power, 4.0);
        assert!((p.t_merge - 4.8).abs() < 1e-12);
        assert_eq!(p.d_merge, 0.0);
        assert_eq!(p.d_power, 7.0);
    }
}
