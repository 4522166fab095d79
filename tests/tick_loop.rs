use pptop::cells::producer::Producer;
use pptop::grid::Grid;
use pptop::model::{GridSize, Points, Position};
use pptop::{CellKind, CellObject, Game, GameAction};

/// A game on a small hand-built grid instead of the generated world.
fn game_with(size: GridSize, content: impl FnMut(Position) -> CellObject) -> Game {
    let mut game = Game::new(0.0);
    game.grid = Grid::new(size, content);
    game.refresh();
    game
}

fn boss_and_wall(boss_power: f64) -> Game {
    game_with(GridSize { width: 3, height: 1 }, |p| match p.x {
        0 => CellObject::Boss(Producer::boss(boss_power)),
        1 => CellObject::new(CellKind::Wall, p.dist()),
        _ => CellObject::default(),
    })
}

#[test]
fn boss_disassembles_adjacent_wall() {
    let mut game = boss_and_wall(15.0);
    assert!(!game.grid.cells[2].reachable);
    assert_eq!(game.counters.walls, 1);

    assert!(!game.tick(0.0));
    assert_eq!(game.grid.cells[1].content.kind(), CellKind::Wall);
    assert!(game.tick(2.0));

    assert_eq!(game.grid.cells[1].content.kind(), CellKind::None);
    assert!(game.points.dpoints > 0.0);
    assert_eq!(game.points.tpoints, 0.0);
    assert_eq!(game.counters.walls, 0);
    assert!(game.grid.cells[2].reachable);
    assert!(game.log.iter().any(|e| e.msg.starts_with("Completed wall @ (1,0)")));
}

#[test]
fn completion_pays_out_once() {
    let mut game = boss_and_wall(15.0);
    game.tick(0.0);
    game.tick(2.0);
    let paid = game.points;
    let entries = game.log.len();
    for t in 3..10 {
        game.tick(t as f64);
    }
    assert_eq!(game.points, paid);
    assert_eq!(game.log.len(), entries);
}

#[test]
fn weak_boss_takes_longer() {
    let mut game = boss_and_wall(1.0);
    game.tick(0.0);
    assert!(!game.tick(2.0));
    assert_eq!(game.grid.cells[1].content.kind(), CellKind::Wall);
    assert!(game.grid.cells[1].content.percent() < 100.0);
}

#[test]
fn without_power_nothing_happens() {
    let mut game = game_with(GridSize { width: 3, height: 1 }, |p| match p.x {
        1 => CellObject::new(CellKind::Wall, p.dist()),
        _ => CellObject::default(),
    });
    for t in 0..100 {
        assert!(!game.tick(t as f64 * 10.0));
    }
    assert_eq!(game.points, Points::default());
    assert_eq!(game.grid.cells[1].content.kind(), CellKind::Wall);
}

#[test]
fn merge_folds_spots_into_the_first() {
    let powers = [2.0, 3.0, 5.0];
    let mut game = game_with(GridSize { width: 3, height: 3 }, |p| match (p.x, p.y) {
        (x, 0) => CellObject::Spot(Producer::spot(powers[x as usize])),
        (1, 1) => CellObject::new(CellKind::Merge, p.dist()),
        _ => CellObject::default(),
    });
    assert!(game.apply(GameAction::MergeSpots { at: 4 }, 0.0));
    // the merged-away producers leave on the next tick
    game.tick(0.0);

    let spots: Vec<f64> = game
        .grid
        .cells
        .iter()
        .filter_map(|c| c.content.producer())
        .map(|p| p.state.tick_power)
        .collect();
    assert_eq!(spots.len(), 1);
    assert!((spots[0] - (10.0 + 0.4 * 2.0)).abs() < 1e-9);
    assert!(game.log.iter().any(|e| e.msg.starts_with("Merged 3 SPOT")));
}

#[test]
fn merge_needs_two_spots() {
    let mut game = game_with(GridSize { width: 3, height: 3 }, |p| match (p.x, p.y) {
        (0, 0) => CellObject::Spot(Producer::spot(4.0)),
        (1, 1) => CellObject::new(CellKind::Merge, p.dist()),
        _ => CellObject::default(),
    });
    assert!(!game.apply(GameAction::MergeSpots { at: 4 }, 0.0));
    assert!(!game.apply(GameAction::MergeBosses { at: 4 }, 0.0));
    game.tick(1.0);
    assert_eq!(game.grid.cells[0].content.producer().map(|p| p.state.tick_power), Some(4.0));
}

#[test]
fn spawn_turns_sacrifices_into_a_harvest() {
    let mut game = game_with(GridSize { width: 3, height: 3 }, |p| match (p.x, p.y) {
        (0, 0) => CellObject::Spot(Producer::spot(100.0)),
        (1, 1) => CellObject::new(CellKind::Spawn, p.dist()),
        _ => CellObject::default(),
    });
    game.tick(0.0);
    assert!(game.apply(GameAction::Sacrifice { at: 4 }, 0.0));
    game.tick(0.0);
    assert_eq!(game.grid.cells[0].content.kind(), CellKind::None);
    assert!(!game.apply(GameAction::Sacrifice { at: 4 }, 1.0));

    game.tick(1000.0);
    let harvest = pptop::CellCommand::Spawn(pptop::cells::spawn::SpawnCommand::Harvest);
    assert!(game.apply(GameAction::Command { at: 4, command: harvest }, 1000.0));
    game.tick(1000.0);
    assert!(game.points.tpoints > 0.0);
    assert_eq!(game.grid.cells[4].content.kind(), CellKind::Spawn);
}

#[test]
fn stale_actions_are_ignored() {
    let mut game = boss_and_wall(15.0);
    // wall is not a merge cell, index out of range, not draggable
    assert!(!game.apply(GameAction::MergeSpots { at: 1 }, 0.0));
    assert!(!game.apply(GameAction::BuildSpot { at: 99 }, 0.0));
    assert!(!game.apply(GameAction::Move { from: 1, to: 2 }, 0.0));
}
