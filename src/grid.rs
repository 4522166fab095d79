use std::collections::VecDeque;

use crate::cells::CellObject;
use crate::model::{Contribution, GridSize, Position};

pub const GRID_SIZE: GridSize = GridSize { width: 32, height: 32 };

#[derive(Clone, Debug)]
pub struct Cell {
    pub pos: Position,
    pub content: CellObject,
    /// Connected to the origin through non-blocking cells.
    pub reachable: bool,
    /// Reachable, or an obstacle on the reachable frontier.
    pub selectable: bool,
}

/// Fixed grid of cells in row-major order. Cells never move, only their
/// content does.
#[derive(Clone, Debug)]
pub struct Grid {
    pub size: GridSize,
    pub cells: Vec<Cell>,
    neighbors: Vec<Vec<usize>>,
}

impl Grid {
    /// Build a grid, asking `content` for what sits at each position.
    pub fn new(size: GridSize, mut content: impl FnMut(Position) -> CellObject) -> Self {
        let mut cells = Vec::with_capacity(size.cell_count());
        for y in 0..size.height {
            for x in 0..size.width {
                let pos = Position { x, y };
                cells.push(Cell { pos, content: content(pos), reachable: false, selectable: false });
            }
        }
        let neighbors = (0..cells.len()).map(|i| moore_neighbors(size, i)).collect();
        let mut grid = Self { size, cells, neighbors };
        grid.reflow();
        grid
    }

    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.size.width && y < self.size.height).then(|| (y * self.size.width + x) as usize)
    }

    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// The eight surrounding cells that exist, in a fixed order.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index).map_or(&[], |n| n.as_slice())
    }

    /// Every cell's outgoing contribution, taken before anything updates.
    pub fn contributions(&self) -> Vec<Contribution> {
        self.cells.iter().map(|c| c.content.contribution()).collect()
    }

    pub fn neighbor_contributions(&self, index: usize, snapshot: &[Contribution]) -> Vec<Contribution> {
        self.neighbors(index).iter().filter_map(|&n| snapshot.get(n).copied()).collect()
    }

    /// First empty neighbor in neighbor order.
    pub fn first_empty_neighbor(&self, index: usize) -> Option<usize> {
        self.neighbors(index).iter().copied().find(|&n| self.cells[n].content.accepts_drop())
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b || a >= self.cells.len() || b >= self.cells.len() {
            return;
        }
        let taken = std::mem::take(&mut self.cells[a].content);
        self.cells[a].content = std::mem::replace(&mut self.cells[b].content, taken);
    }

    /// Flood fill from the origin over orthogonal neighbors. Obstacles stop
    /// the fill but are marked selectable.
    pub fn reflow(&mut self) {
        for cell in &mut self.cells {
            cell.reachable = false;
            cell.selectable = false;
        }
        if self.cells.is_empty() {
            return;
        }
        let gs = self.size;
        let inb = |x: i64, y: i64| x >= 0 && y >= 0 && x < gs.width as i64 && y < gs.height as i64;
        let mut q: VecDeque<usize> = VecDeque::new();
        self.cells[0].reachable = true;
        self.cells[0].selectable = true;
        q.push_back(0);
        let dirs = [(0, -1), (0, 1), (-1, 0), (1, 0)];
        while let Some(i) = q.pop_front() {
            let Position { x, y } = self.cells[i].pos;
            for (dx, dy) in dirs {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if !inb(nx, ny) {
                    continue;
                }
                let ni = (ny as u32 * gs.width + nx as u32) as usize;
                let n = &mut self.cells[ni];
                n.selectable = true;
                if !n.reachable && !n.content.is_blocking() {
                    n.reachable = true;
                    q.push_back(ni);
                }
            }
        }
    }
}

/// Neighbor indices scanning dx in the outer loop and dy in the inner one.
fn moore_neighbors(size: GridSize, index: usize) -> Vec<usize> {
    let x = (index as u32 % size.width) as i64;
    let y = (index as u32 / size.width) as i64;
    let mut out = Vec::with_capacity(8);
    for dx in -1..=1 {
        for dy in -1..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x + dx;
            let ny = y + dy;
            if nx < 0 || ny < 0 || nx >= size.width as i64 || ny >= size.height as i64 {
                continue;
            }
            out.push((ny as u32 * size.width + nx as u32) as usize);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::CellKind;

    fn small(map: &[&str]) -> Grid {
        let size = GridSize { width: map[0].len() as u32, height: map.len() as u32 };
        Grid::new(size, |p| {
            let kind = match map[p.y as usize].as_bytes()[p.x as usize] {
                b'x' => CellKind::Wall,
                b's' => CellKind::Spot,
                _ => CellKind::None,
            };
            CellObject::new(kind, p.dist())
        })
    }

    #[test]
    fn neighbor_order_and_edges() {
        let grid = small(&["...", "...", "..."]);
        assert_eq!(grid.neighbors(4), &[0, 3, 6, 1, 7, 2, 5, 8]);
        assert_eq!(grid.neighbors(0), &[3, 1, 4]);
        assert_eq!(grid.neighbors(8).len(), 3);
    }

    #[test]
    fn walls_stop_the_fill_but_stay_selectable() {
        let grid = small(&["..x..", "..x..", "xxx..", "....."]);
        assert!(grid.cells[1].reachable);
        assert!(grid.cells[2].selectable);
        assert!(!grid.cells[2].reachable);
        assert!(!grid.cells[3].selectable);
        assert!(!grid.cells[19].reachable);
    }

    #[test]
    fn origin_is_always_reachable() {
        let grid = small(&["x.", ".."]);
        assert!(grid.cells[0].reachable);
        assert!(grid.cells[1].reachable);
    }

    #[test]
    fn swap_moves_content() {
        let mut grid = small(&["s.", ".."]);
        grid.swap(0, 3);
        assert_eq!(grid.cells[0].content.kind(), CellKind::None);
        assert_eq!(grid.cells[3].content.kind(), CellKind::Spot);
        assert_eq!(grid.index(1, 1), Some(3));
        assert_eq!(grid.index(2, 0), None);
    }

    #[test]
    fn contributions_come_from_the_snapshot() {
        let grid = small(&["s.", ".x"]);
        let snap = grid.contributions();
        let seen = grid.neighbor_contributions(3, &snap);
        assert_eq!(seen.iter().map(|c| c.tick_power).sum::<f64>(), 1.0);
        assert_eq!(grid.first_empty_neighbor(0), Some(2));
    }
}
