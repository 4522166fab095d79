//! Game state and the per-frame tick loop.
//!
//! `tick` samples neighbor contributions once, updates every selectable
//! cell with the same `now`, banks rewards and reflows reachability when a
//! cell was cleared. Player input arrives between ticks as `GameAction`s,
//! each of which is validated again here and silently ignored if stale.

use crate::cells::build::{BuildCost, boss_cost, spot_cost};
use crate::cells::merge::merged_power;
use crate::cells::producer::Producer;
use crate::cells::{CellCommand, CellKind, CellObject};
use crate::grid::Grid;
use crate::model::{LogEntry, Points, Reward, RewardSource};
use crate::util::{RoundType, clog, cwarn, format_value};
use crate::world::{self, LORE_COUNT};

/// Frame interval of the tick timer.
pub const TICK_MS: f64 = 1000.0 / 60.0;
/// Interval of the autosave timer.
pub const SAVE_INTERVAL_MS: u32 = 10_000;

/// Walls and enemies on the map, at start and now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counters {
    pub total_walls: usize,
    pub total_enemies: usize,
    pub walls: usize,
    pub enemies: usize,
}

impl Counters {
    fn count(grid: &Grid) -> (usize, usize) {
        grid.cells.iter().fold((0, 0), |(w, e), c| {
            let kind = c.content.kind();
            (w + usize::from(kind == CellKind::Wall), e + usize::from(kind.is_enemy()))
        })
    }

    pub fn walls_done(&self) -> usize {
        self.total_walls.saturating_sub(self.walls)
    }

    pub fn enemies_done(&self) -> usize {
        self.total_enemies.saturating_sub(self.enemies)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameAction {
    /// Drag a producer onto an empty reachable cell. Also used to move the
    /// selected producer.
    Move { from: usize, to: usize },
    MergeSpots { at: usize },
    MergeBosses { at: usize },
    BuildSpot { at: usize },
    BuildBoss { at: usize },
    Sacrifice { at: usize },
    Command { at: usize, command: CellCommand },
    /// Let go of every held button in a cell.
    Release { at: usize },
}

#[derive(Clone, Debug)]
pub struct Game {
    pub grid: Grid,
    pub points: Points,
    pub log: Vec<LogEntry>,
    pub lore_unlocks: Vec<bool>,
    /// Unix time of the first session in milliseconds.
    pub game_start: f64,
    pub counters: Counters,
}

impl Game {
    /// Freshly generated world without a log.
    pub fn new(game_start: f64) -> Self {
        let grid = world::generate();
        let (walls, enemies) = Counters::count(&grid);
        let mut lore_unlocks = vec![false; LORE_COUNT];
        lore_unlocks[0] = true;
        Self {
            grid,
            points: Points::default(),
            log: Vec::new(),
            lore_unlocks,
            game_start,
            counters: Counters { total_walls: walls, total_enemies: enemies, walls, enemies },
        }
    }

    /// A new game starting at `now` seconds.
    pub fn start(now: f64) -> Self {
        let mut game = Self::new(now * 1000.0);
        game.add_log(now, "Game Start".to_string());
        game
    }

    /// Recount obstacles and recompute reachability after content was
    /// replaced wholesale.
    pub fn refresh(&mut self) {
        if self.lore_unlocks.len() < LORE_COUNT {
            self.lore_unlocks.resize(LORE_COUNT, false);
        }
        let (walls, enemies) = Counters::count(&self.grid);
        self.counters.walls = walls;
        self.counters.enemies = enemies;
        self.grid.reflow();
    }

    pub fn add_log(&mut self, now: f64, msg: String) {
        clog(&msg);
        self.log.push(LogEntry { date: now * 1000.0, msg });
    }

    pub fn is_lore_unlocked(&self, lore: usize) -> bool {
        self.lore_unlocks.get(lore).copied().unwrap_or(false)
    }

    /// Advance every selectable cell to `now`. Returns whether the
    /// reachable area was recomputed.
    pub fn tick(&mut self, now: f64) -> bool {
        let snapshot = self.grid.contributions();
        let mut cleared = false;
        for index in 0..self.grid.cells.len() {
            if !self.grid.cells[index].selectable {
                continue;
            }
            let neighbors = self.grid.neighbor_contributions(index, &snapshot);
            let Some(reward) = self.grid.cells[index].content.update(now, &neighbors) else {
                continue;
            };
            if !reward.is_well_formed() {
                cwarn(&format!("Ignoring malformed reward from cell {}: {:?}", index, reward));
                continue;
            }
            self.bank(index, &reward, now);
            if reward.clears_cell() {
                self.grid.cells[index].content = CellObject::default();
                cleared = true;
            }
        }
        let (walls, enemies) = Counters::count(&self.grid);
        self.counters.walls = walls;
        self.counters.enemies = enemies;
        if cleared {
            self.grid.reflow();
        }
        cleared
    }

    fn bank(&mut self, index: usize, reward: &Reward, now: f64) {
        self.points.add(reward);
        let cell = &self.grid.cells[index];
        let (x, y) = (cell.pos.x, cell.pos.y);
        match reward.source {
            RewardSource::Completed => {
                let tag = cell.content.kind().tag();
                self.add_log(
                    now,
                    format!(
                        "Completed {} @ ({},{}). Reward: {{T: {}, D: {}}}",
                        tag,
                        x,
                        y,
                        format_value(reward.tpoints, RoundType::Floor, "", ""),
                        format_value(reward.dpoints, RoundType::Floor, "", "")
                    ),
                );
                if let Some(lore) = world::lore_for_cell(index) {
                    if lore > 0 && !self.is_lore_unlocked(lore) {
                        if let Some(slot) = self.lore_unlocks.get_mut(lore) {
                            *slot = true;
                        }
                        self.add_log(now, format!("Lore {} unlocked!", lore));
                    }
                }
            }
            RewardSource::Harvest => self.add_log(
                now,
                format!(
                    "Harvested {} T, {} D",
                    format_value(reward.tpoints, RoundType::Floor, "", ""),
                    format_value(reward.dpoints, RoundType::Floor, "", "")
                ),
            ),
            RewardSource::Merged => {}
        }
    }

    pub fn apply(&mut self, action: GameAction, now: f64) -> bool {
        match action {
            GameAction::Move { from, to } => self.move_content(from, to),
            GameAction::MergeSpots { at } => self.merge(at, CellKind::Spot, now),
            GameAction::MergeBosses { at } => self.merge(at, CellKind::Boss, now),
            GameAction::BuildSpot { at } => self.build(at, CellKind::Spot, now),
            GameAction::BuildBoss { at } => self.build(at, CellKind::Boss, now),
            GameAction::Sacrifice { at } => self.sacrifice(at, now),
            GameAction::Command { at, command } => self.command(at, command, now),
            GameAction::Release { at } => match self.grid.get_mut(at) {
                Some(cell) => {
                    cell.content.release_all();
                    true
                }
                None => false,
            },
        }
    }

    /// Whether `from` may be dropped on `to` right now.
    pub fn can_move(&self, from: usize, to: usize) -> bool {
        match (self.grid.get(from), self.grid.get(to)) {
            (Some(src), Some(dst)) => {
                from != to && src.reachable && src.content.is_draggable() && dst.reachable && dst.content.accepts_drop()
            }
            _ => false,
        }
    }

    pub fn move_content(&mut self, from: usize, to: usize) -> bool {
        if !self.can_move(from, to) {
            return false;
        }
        self.grid.swap(from, to);
        true
    }

    fn selectable_kind(&self, at: usize, kind: CellKind) -> bool {
        self.grid.get(at).is_some_and(|c| c.selectable && c.content.kind() == kind)
    }

    /// Live neighbors of `at` holding a producer of `kind`, in neighbor order.
    pub fn live_neighbors(&self, at: usize, kind: CellKind) -> Vec<usize> {
        self.grid
            .neighbors(at)
            .iter()
            .copied()
            .filter(|&n| self.grid.cells[n].content.is_live_producer(kind))
            .collect()
    }

    fn merge(&mut self, at: usize, kind: CellKind, now: f64) -> bool {
        if !self.selectable_kind(at, CellKind::Merge) {
            return false;
        }
        let targets = self.live_neighbors(at, kind);
        let powers: Vec<f64> = targets
            .iter()
            .filter_map(|&n| self.grid.cells[n].content.producer().map(Producer::power))
            .collect();
        let Some(power) = merged_power(&powers) else {
            return false;
        };
        for (i, &n) in targets.iter().enumerate() {
            let content = &mut self.grid.cells[n].content;
            if i == 0 {
                if let Some(p) = content.producer_mut() {
                    match kind {
                        CellKind::Boss => p.state.dis_power = power,
                        _ => p.state.tick_power = power,
                    }
                }
            } else {
                content.mark_merged();
            }
        }
        self.add_log(
            now,
            format!("Merged {} {} into 1 x {}", targets.len(), kind.label(), format_value(power, RoundType::Floor, "", "")),
        );
        true
    }

    fn build(&mut self, at: usize, kind: CellKind, now: f64) -> bool {
        if !self.selectable_kind(at, CellKind::Build) {
            return false;
        }
        let Some(target) = self.grid.first_empty_neighbor(at) else {
            return false;
        };
        let cost: Option<BuildCost> = match kind {
            CellKind::Boss => boss_cost(&self.points),
            _ => spot_cost(&self.points),
        };
        let Some(cost) = cost else {
            return false;
        };
        self.points.tpoints -= cost.tpoints;
        self.points.dpoints -= cost.dpoints;
        let (content, label) = match kind {
            CellKind::Boss => (CellObject::Boss(Producer::boss(cost.power)), "BOSS"),
            _ => (CellObject::Spot(Producer::spot(cost.power)), "SPOT"),
        };
        self.grid.cells[target].content = content;
        self.add_log(now, format!("Built {} x {}", label, format_value(cost.power, RoundType::Floor, "", "")));
        true
    }

    fn sacrifice(&mut self, at: usize, now: f64) -> bool {
        if !self.selectable_kind(at, CellKind::Spawn) {
            return false;
        }
        let spots = self.live_neighbors(at, CellKind::Spot);
        let bosses = self.live_neighbors(at, CellKind::Boss);
        if spots.is_empty() && bosses.is_empty() {
            return false;
        }
        let mut total_t = 0.0;
        let mut total_d = 0.0;
        for &n in spots.iter().chain(bosses.iter()) {
            let content = &mut self.grid.cells[n].content;
            if let Some(p) = content.producer() {
                total_t += p.state.tick_power;
                total_d += p.state.dis_power;
            }
            content.mark_merged();
        }
        if let CellObject::Spawn(spawn) = &mut self.grid.cells[at].content {
            spawn.add_sacrifice(total_t, total_d, now);
        }
        self.add_log(
            now,
            format!(
                "Sacrificed {} SPOTs and {} BOSSes for {} T, {} D",
                spots.len(),
                bosses.len(),
                format_value(total_t, RoundType::Floor, "", ""),
                format_value(total_d, RoundType::Floor, "", "")
            ),
        );
        true
    }

    fn command(&mut self, at: usize, command: CellCommand, now: f64) -> bool {
        match self.grid.get_mut(at) {
            Some(cell) if cell.selectable => cell.content.command(command, now),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(x: u32, y: u32) -> usize {
        (x + y * 32) as usize
    }

    #[test]
    fn fresh_world_counts_obstacles() {
        let game = Game::start(0.0);
        assert!(game.counters.total_walls > 300);
        assert!(game.counters.total_enemies > 0);
        assert_eq!(game.counters.walls_done(), 0);
        assert_eq!(game.log.len(), 1);
        assert!(game.is_lore_unlocked(0));
        assert!(!game.is_lore_unlocked(1));
    }

    #[test]
    fn start_area_is_reachable() {
        let game = Game::start(0.0);
        assert!(game.grid.cells[index(1, 0)].reachable);
        assert!(game.grid.cells[index(0, 1)].reachable);
        // Wall at (3,1) borders (3,0).
        assert!(game.grid.cells[index(3, 1)].selectable);
        assert!(!game.grid.cells[index(3, 1)].reachable);
    }

    #[test]
    fn producers_move_onto_empty_reachable_cells() {
        let mut game = Game::start(0.0);
        let spot = index(0, 1);
        let empty = index(2, 0);
        assert!(game.apply(GameAction::Move { from: spot, to: empty }, 0.0));
        assert_eq!(game.grid.cells[empty].content.kind(), CellKind::Spot);
        assert!(!game.apply(GameAction::Move { from: index(0, 0), to: spot }, 0.0));
        assert!(!game.apply(GameAction::Move { from: empty, to: index(3, 1) }, 0.0));
    }

    #[test]
    fn build_spends_points() {
        let mut game = Game::start(0.0);
        let build = index(1, 1);
        assert!(!game.apply(GameAction::BuildSpot { at: build }, 0.0));
        game.points = Points { tpoints: 10.0, dpoints: 2.0 };
        assert!(game.apply(GameAction::BuildSpot { at: build }, 0.0));
        assert_eq!(game.points, Points { tpoints: 6.0, dpoints: 1.0 });
        let built = game.grid.cells[index(0, 2)].content.producer().map(|p| p.state.tick_power);
        assert_eq!(built, Some(4.0));
    }

    #[test]
    fn merging_needs_two_live_producers() {
        let mut game = Game::start(0.0);
        let merge = index(1, 7);
        assert!(!game.apply(GameAction::MergeSpots { at: merge }, 0.0));
    }
}
