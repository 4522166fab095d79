use pptop::grid::Grid;
use pptop::model::{GridSize, Position};
use pptop::world;
use pptop::{CellKind, CellObject};

const SIZE: GridSize = GridSize { width: 7, height: 7 };

/// Walls on the square ring at distance 3 from the origin, optionally
/// leaving `gap` open.
fn ringed(gap: Option<(u32, u32)>) -> Grid {
    Grid::new(SIZE, |p: Position| {
        let on_ring = (p.x == 3 && p.y <= 3) || (p.y == 3 && p.x <= 3);
        if on_ring && gap != Some((p.x, p.y)) {
            CellObject::new(CellKind::Wall, p.dist())
        } else {
            CellObject::default()
        }
    })
}

fn cell(grid: &Grid, x: u32, y: u32) -> &pptop::grid::Cell {
    &grid.cells[grid.index(x, y).unwrap()]
}

#[test]
fn closed_ring_keeps_the_outside_unreachable() {
    let grid = ringed(None);
    assert!(cell(&grid, 2, 2).reachable);
    assert!(cell(&grid, 3, 0).selectable);
    assert!(!cell(&grid, 3, 0).reachable);
    assert!(!cell(&grid, 5, 5).reachable);
    assert!(!cell(&grid, 5, 5).selectable);
    assert!(!cell(&grid, 4, 0).selectable);
}

#[test]
fn gap_lets_the_fill_through() {
    let grid = ringed(Some((3, 1)));
    assert!(cell(&grid, 3, 1).reachable);
    assert!(cell(&grid, 4, 1).reachable);
    assert!(cell(&grid, 6, 6).reachable);
    // walls stay blocked but border the fill on both sides
    assert!(!cell(&grid, 3, 0).reachable);
    assert!(cell(&grid, 3, 0).selectable);
    assert!(cell(&grid, 3, 3).selectable);
}

#[test]
fn clearing_a_wall_opens_the_ring() {
    let mut grid = ringed(None);
    let wall = grid.index(3, 2).unwrap();
    grid.cells[wall].content = CellObject::default();
    grid.reflow();
    assert!(cell(&grid, 5, 5).reachable);
}

#[test]
fn generated_world_is_consistent() {
    let grid = world::generate();
    assert_eq!(grid.cells.len(), 32 * 32);
    for (i, c) in grid.cells.iter().enumerate() {
        if c.reachable {
            assert!(c.selectable);
            assert!(!c.content.is_blocking(), "blocking cell {} marked reachable", i);
            let Position { x, y } = c.pos;
            let orthogonal = [(x.wrapping_sub(1), y), (x + 1, y), (x, y.wrapping_sub(1)), (x, y + 1)];
            for (nx, ny) in orthogonal {
                if let Some(n) = grid.index(nx, ny) {
                    assert!(grid.cells[n].selectable, "({},{}) borders the fill", nx, ny);
                }
            }
        }
    }
}
