//! The triangle. Twenty rows of Pascal's triangle, each cell a timer lasting
//! its binomial coefficient in seconds. Everything starts complete apart from
//! the final bottom cell; the player wins by walking completion back up to
//! the apex faster than the acolytes can finish.

use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate};
use crate::model::{Contribution, Reward, reward_scale};
use crate::persistence::inf;
use crate::util::format_hms;

pub const ROW_COUNT: u32 = 20;
/// Reverse seconds gained per second at one tick power.
pub const REVERSE_SCALE: f64 = 6.220985e-8;
/// Seconds left on the final cell when the triangle is first opened.
const FINAL_CELL_LEFT: f64 = 600.0;
const WIN_REWARD: f64 = 1000.0;

/// Seconds cell `(row, col)` takes, which is `C(row, col)`. Zero outside the triangle.
pub fn cell_value(row: u32, col: u32) -> f64 {
    if col > row {
        return 0.0;
    }
    let k = col.min(row - col);
    (0..k).fold(1.0, |acc, i| acc * (row - i) as f64 / (i + 1) as f64).round()
}

pub fn total_time() -> f64 {
    (0..ROW_COUNT).map(|r| (0..=r).map(|c| cell_value(r, c)).sum::<f64>()).sum()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardCell {
    pub row: u32,
    pub col: u32,
    #[serde(with = "inf")]
    pub start: f64,
    #[serde(with = "inf")]
    pub duration: f64,
}

impl ForwardCell {
    pub fn remaining(&self, now: f64) -> f64 {
        (self.duration - (now - self.start)).max(0.0)
    }
}

/// A cell being un-completed. `undone` holds the reversed seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseCell {
    pub row: u32,
    pub col: u32,
    pub undone: Accumulator,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnailState {
    pub started: bool,
    /// Row-major triangle of completion flags.
    pub complete: Vec<Vec<bool>>,
    pub active_cells: Vec<ForwardCell>,
    pub reverse_active_cells: Vec<ReverseCell>,
    #[serde(with = "inf")]
    pub game_start: f64,
    #[serde(with = "inf")]
    pub end_time: f64,
}

/// What a triangle cell shows right now.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellProgress {
    Complete,
    Forward { percent: f64, remaining: f64 },
    Reverse { percent: f64, remaining: f64 },
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SnailCommand {
    /// The triangle panel was opened. Starts the final cell the first time.
    Open,
    Reverse { row: u32, col: u32 },
    Advance { row: u32, col: u32 },
}

#[derive(Clone, Debug)]
pub struct Snail {
    pub dist: u32,
    pub state: SnailState,
    power: Aggregate,
    pub percent: f64,
}

impl Snail {
    pub fn new(dist: u32) -> Self {
        Self {
            dist,
            state: SnailState {
                started: false,
                complete: (0..ROW_COUNT).map(|r| vec![true; r as usize + 1]).collect(),
                active_cells: Vec::new(),
                reverse_active_cells: Vec::new(),
                game_start: f64::INFINITY,
                end_time: f64::INFINITY,
            },
            power: Aggregate::default(),
            percent: 100.0,
        }
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn is_won(&self) -> bool {
        self.state.end_time < f64::INFINITY
    }

    pub fn is_complete(&self, row: u32, col: u32) -> bool {
        self.state.complete.get(row as usize).and_then(|r| r.get(col as usize)).copied().unwrap_or(false)
    }

    fn set_complete(&mut self, row: u32, col: u32, value: bool) {
        if let Some(flag) = self.state.complete.get_mut(row as usize).and_then(|r| r.get_mut(col as usize)) {
            *flag = value;
        }
    }

    fn forward_index(&self, row: u32, col: u32) -> Option<usize> {
        self.state.active_cells.iter().position(|c| c.row == row && c.col == col)
    }

    fn is_reversing(&self, row: u32, col: u32) -> bool {
        self.state.reverse_active_cells.iter().any(|c| c.row == row && c.col == col)
    }

    /// Parents outside the triangle count as done.
    fn is_done_or_outside(&self, row: i64, col: i64) -> bool {
        if row < 0 || col < 0 || col > row {
            return true;
        }
        self.is_complete(row as u32, col as u32)
    }

    fn is_reversing_or_complete(&self, row: u32, col: u32) -> bool {
        row < ROW_COUNT && (self.is_complete(row, col) || self.is_reversing(row, col))
    }

    /// A cell can be reversed while it runs forward, or when it is complete and
    /// neither child is complete or already reversing.
    pub fn is_reverse_active(&self, row: u32, col: u32) -> bool {
        if row >= ROW_COUNT || col > row {
            return false;
        }
        if self.forward_index(row, col).is_some() {
            return true;
        }
        self.is_complete(row, col)
            && !self.is_reversing_or_complete(row + 1, col)
            && !self.is_reversing_or_complete(row + 1, col + 1)
    }

    pub fn open(&mut self, now: f64) -> bool {
        if self.state.started {
            return false;
        }
        let (row, col) = (ROW_COUNT - 1, ROW_COUNT >> 1);
        let duration = cell_value(row, col);
        self.set_complete(row, col, false);
        self.state.active_cells.push(ForwardCell { row, col, start: now - duration + FINAL_CELL_LEFT, duration });
        self.state.started = true;
        self.state.game_start = now;
        true
    }

    pub fn reverse_click(&mut self, row: u32, col: u32, now: f64) -> bool {
        if !self.is_reverse_active(row, col) || self.is_reversing(row, col) {
            return false;
        }
        self.set_complete(row, col, false);
        let undone = match self.forward_index(row, col) {
            Some(i) => self.state.active_cells.remove(i).remaining(now),
            None => 0.0,
        };
        self.state.reverse_active_cells.push(ReverseCell {
            row,
            col,
            undone: Accumulator { start: now, previous_progress: undone },
        });
        true
    }

    /// Start a cell forward once both parents are done.
    pub fn advance_click(&mut self, row: u32, col: u32, now: f64) -> bool {
        if row >= ROW_COUNT || col > row {
            return false;
        }
        let (r, c) = (row as i64, col as i64);
        if !self.is_done_or_outside(r - 1, c) || !self.is_done_or_outside(r - 1, c - 1) {
            return false;
        }
        if self.forward_index(row, col).is_some() || self.is_complete(row, col) || self.is_reversing(row, col) {
            return false;
        }
        self.state.active_cells.push(ForwardCell { row, col, start: now, duration: cell_value(row, col) });
        true
    }

    pub fn command(&mut self, command: SnailCommand, now: f64) -> bool {
        match command {
            SnailCommand::Open => self.open(now),
            SnailCommand::Reverse { row, col } => self.reverse_click(row, col, now),
            SnailCommand::Advance { row, col } => self.advance_click(row, col, now),
        }
    }

    pub fn progress(&self, row: u32, col: u32, now: f64) -> CellProgress {
        let base = cell_value(row, col);
        if let Some(i) = self.forward_index(row, col) {
            let remaining = self.state.active_cells[i].remaining(now);
            return CellProgress::Forward { percent: (100.0 * (base - remaining) / base).min(100.0), remaining };
        }
        if let Some(cell) = self.state.reverse_active_cells.iter().find(|c| c.row == row && c.col == col) {
            let undone = cell.undone.progress(now, self.power.t() * REVERSE_SCALE).min(base);
            return CellProgress::Reverse { percent: (100.0 * (base - undone) / base).max(0.0), remaining: undone };
        }
        if self.is_complete(row, col) { CellProgress::Complete } else { CellProgress::Empty }
    }

    /// Seconds of the triangle currently done, partial cells included.
    pub fn completed_time(&self, now: f64) -> f64 {
        let mut done = 0.0;
        for row in 0..ROW_COUNT {
            for col in 0..=row {
                let base = cell_value(row, col);
                done += match self.progress(row, col, now) {
                    CellProgress::Complete => base,
                    CellProgress::Forward { remaining, .. } => base - remaining,
                    CellProgress::Reverse { remaining, .. } => base - remaining,
                    CellProgress::Empty => 0.0,
                };
            }
        }
        done
    }

    pub fn describe(&self, now: f64) -> String {
        let next = self
            .state
            .active_cells
            .iter()
            .map(|c| c.remaining(now))
            .fold(f64::INFINITY, f64::min);
        format!(
            "Triangle {:.2}% complete\n{} advancing (next in {}), {} reversing",
            self.percent,
            self.state.active_cells.len(),
            format_hms(next),
            self.state.reverse_active_cells.len()
        )
    }
}

impl CellBehavior for Snail {
    type State = SnailState;

    fn state(&self) -> &SnailState {
        &self.state
    }

    fn restore(&mut self, state: SnailState) {
        self.state = state;
        self.state.complete.resize_with(ROW_COUNT as usize, Vec::new);
        for (r, row) in self.state.complete.iter_mut().enumerate() {
            row.resize(r + 1, false);
        }
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);

        let finished: Vec<(u32, u32)> = self
            .state
            .active_cells
            .iter()
            .filter(|c| c.remaining(now) <= 0.0)
            .map(|c| (c.row, c.col))
            .collect();
        for (row, col) in finished {
            self.set_complete(row, col, true);
        }
        self.state.active_cells.retain(|c| c.remaining(now) > 0.0);

        if self.power.t_changed() {
            let old = self.power.last_t() * REVERSE_SCALE;
            for cell in &mut self.state.reverse_active_cells {
                cell.undone.rebase(now, old);
            }
        }
        let rate = self.power.t() * REVERSE_SCALE;
        self.state
            .reverse_active_cells
            .retain(|c| c.undone.progress(now, rate) < cell_value(c.row, c.col));

        if self.state.started
            && !self.is_won()
            && self.state.active_cells.is_empty()
            && self.state.reverse_active_cells.is_empty()
            && self.state.complete.iter().flatten().all(|&c| !c)
        {
            self.state.end_time = now;
        }

        self.percent = 100.0 * self.completed_time(now) / total_time();
        self.is_won().then(|| Reward::tpoints(WIN_REWARD * reward_scale(self.dist)))
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
    fn durations_are_binomial() {
        assert_eq!(cell_value(0, 0), 1.0);
        assert_eq!(cell_value(19, 0), 1.0);
        assert_eq!(cell_value(19, 19), 1.0);
        assert_eq!(cell_value(19, 10), 92378.0);
        assert_eq!(cell_value(4, 2), 6.0);
        assert_eq!(cell_value(3, 4), 0.0);
        assert_eq!(total_time(), (1u64 << 20) as f64 - 1.0);
    }

    #[test]
    fn only_bottom_row_starts_reversible() {
        let snail = Snail::new(20);
        assert!(snail.is_reverse_active(19, 0));
        assert!(snail.is_reverse_active(19, 19));
        assert!(!snail.is_reverse_active(18, 3));
        assert!(!snail.is_reverse_active(20, 0));
    }

    #[test]
    fn opening_starts_final_cell_once() {
        let mut snail = Snail::new(20);
        assert!(snail.open(1000.0));
        assert!(!snail.open(2000.0));
        assert!(!snail.is_complete(19, 10));
        match snail.progress(19, 10, 1000.0) {
            CellProgress::Forward { remaining, .. } => assert!((remaining - 600.0).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
        snail.update(1600.0, &[]);
        assert!(snail.is_complete(19, 10));
        assert!(snail.state.active_cells.is_empty());
    }

    #[test]
    fn reversing_a_running_cell_keeps_its_undone_part() {
        let mut snail = Snail::new(20);
        snail.open(0.0);
        assert!(snail.reverse_click(19, 10, 100.0));
        assert!(!snail.reverse_click(19, 10, 100.0));
        assert!(snail.state.active_cells.is_empty());
        let undone = snail.state.reverse_active_cells[0].undone.previous_progress;
        assert!((undone - 500.0).abs() < 1e-6);
    }

    #[test]
    fn reverse_progress_follows_tick_power() {
        let mut snail = Snail::new(4);
        snail.update(0.0, &[spot(1e8)]);
        assert!(snail.reverse_click(19, 1, 0.0));
        snail.update(1.0, &[spot(1e8)]);
        snail.update(1.0, &[spot(2e8)]);
        let banked = snail.state.reverse_active_cells[0].undone.previous_progress;
        assert!((banked - 1e8 * REVERSE_SCALE).abs() < 1e-9);
        snail.update(4.0, &[spot(2e8)]);
        assert!(snail.state.reverse_active_cells.is_empty());
        assert!(!snail.is_complete(19, 1));
    }

    #[test]
    fn parents_open_up_once_children_are_gone() {
        let mut snail = Snail::new(4);
        snail.reverse_click(19, 0, 0.0);
        assert!(!snail.is_reverse_active(18, 0));
        snail.state.reverse_active_cells.clear();
        snail.set_complete(19, 1, false);
        assert!(snail.is_reverse_active(18, 0));
    }

    #[test]
    fn advance_needs_both_parents() {
        let mut snail = Snail::new(4);
        snail.set_complete(5, 2, false);
        assert!(snail.advance_click(5, 2, 0.0));
        assert!(!snail.advance_click(5, 2, 0.0));
        snail.set_complete(6, 3, false);
        assert!(!snail.advance_click(6, 3, 0.0));
    }

    #[test]
    fn emptied_triangle_wins() {
        let mut snail = Snail::new(4);
        snail.state.started = true;
        for row in snail.state.complete.iter_mut() {
            row.fill(false);
        }
        snail.set_complete(0, 0, true);
        snail.update(0.0, &[spot(1e8)]);
        assert!(snail.reverse_click(0, 0, 0.0));
        assert_eq!(snail.update(0.1, &[spot(1e8)]), None);
        let reward = snail.update(1.0, &[spot(1e8)]);
        assert_eq!(reward.map(|r| r.tpoints), Some(1000.0 * reward_scale(4)));
        assert!(snail.is_won());
    }
}
