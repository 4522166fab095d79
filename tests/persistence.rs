use pptop::cells::anti::AntiCommand;
use pptop::cells::lawn::LawnCommand;
use pptop::model::{Contribution, Points};
use pptop::persistence::{self, SaveBlob};
use pptop::{CellCommand, CellKind, CellObject, Game, GameAction, LoadError};
use serde_json::{Value, json};

fn find(game: &Game, kind: CellKind) -> usize {
    game.grid.cells.iter().position(|c| c.content.kind() == kind).unwrap()
}

fn kinds(game: &Game) -> Vec<CellKind> {
    game.grid.cells.iter().map(|c| c.content.kind()).collect()
}

#[test]
fn fresh_game_survives_a_round_trip() {
    let mut game = Game::start(1_000.0);
    game.points = Points { tpoints: 12.5, dpoints: 3.25 };
    game.tick(1_000.0);
    game.tick(1_001.0);

    let raw = persistence::save_to_string(&game).unwrap();
    let loaded = persistence::load_from_str(&raw).unwrap();

    assert_eq!(kinds(&loaded), kinds(&game));
    assert_eq!(loaded.points, game.points);
    assert_eq!(loaded.log, game.log);
    assert_eq!(loaded.lore_unlocks, game.lore_unlocks);
    assert_eq!(loaded.game_start, game.game_start);
    assert_eq!(loaded.counters, game.counters);
    let reachable = |g: &Game| g.grid.cells.iter().map(|c| c.reachable).collect::<Vec<_>>();
    assert_eq!(reachable(&loaded), reachable(&game));
}

#[test]
fn infinite_timers_are_saved_as_null() {
    let game = Game::start(0.0);
    let anti = find(&game, CellKind::Anti);
    let saved = game.grid.cells[anti].content.save().unwrap();
    assert_eq!(saved["type"], json!("enemyAnti"));
    assert_eq!(saved["start"], Value::Null);

    let raw = persistence::save_to_string(&game).unwrap();
    let loaded = persistence::load_from_str(&raw).unwrap();
    match &loaded.grid.cells[anti].content {
        CellObject::Anti(a) => {
            assert_eq!(a.state.start, f64::INFINITY);
            assert!(!a.is_running());
        }
        other => panic!("expected antimatter, got {:?}", other.kind()),
    }
}

#[test]
fn started_antimatter_keeps_its_clock() {
    let mut game = Game::start(0.0);
    let anti = find(&game, CellKind::Anti);
    if let CellObject::Anti(a) = &mut game.grid.cells[anti].content {
        a.state.start = 42.0;
        a.state.bought_dims[0] = 3;
    }
    let raw = persistence::save_to_string(&game).unwrap();
    let loaded = persistence::load_from_str(&raw).unwrap();
    let CellObject::Anti(a) = &loaded.grid.cells[anti].content else {
        panic!("antimatter cell moved");
    };
    assert_eq!(a.state.start, 42.0);
    assert_eq!(a.state.bought_dims[0], 3);
}

#[test]
fn empty_blob_is_a_fresh_world() {
    let game = persistence::load_from_str("{}").unwrap();
    assert_eq!(kinds(&game), kinds(&Game::new(0.0)));
    assert_eq!(game.points, Points::default());
    assert!(game.is_lore_unlocked(0));
}

#[test]
fn broken_saves_are_reported() {
    assert!(matches!(persistence::load_from_str("not json"), Err(LoadError::Json(_))));

    let blob = SaveBlob { cell_saves: vec![json!({"type": "none"})], ..SaveBlob::default() };
    assert!(matches!(persistence::load_game(&blob), Err(LoadError::CellCount { found: 1, .. })));

    let game = Game::new(0.0);
    let mut blob = persistence::save_game(&game).unwrap();
    blob.cell_saves[5] = json!({"type": "dragon"});
    match persistence::load_game(&blob) {
        Err(LoadError::UnknownTag { index, tag }) => {
            assert_eq!(index, 5);
            assert_eq!(tag, "dragon");
        }
        other => panic!("unexpected {:?}", other.map(|_| ())),
    }

    blob.cell_saves[5] = json!({"power": 3});
    assert!(matches!(persistence::load_game(&blob), Err(LoadError::MissingTag { index: 5 })));
}

#[test]
fn out_of_range_lawn_fields_load_safely() {
    let mut saved = CellObject::new(CellKind::Lawn, 5).save().unwrap();
    saved["fields"][0]["tileSize"] = json!(99);
    saved["fields"][0]["machineWidth"] = json!(0);
    saved["fields"][0]["machineHeight"] = json!(0);
    saved["fields"][0]["tickRate"] = json!(0);
    saved["displayField"] = json!(40);

    let mut cell = CellObject::load(&saved, 5, 0).unwrap();
    cell.command(CellCommand::Lawn(LawnCommand::MarkViewed), 1.0);
    let spot = Contribution { tick_power: 1.0, ..Default::default() };
    cell.update(1.0, &[spot]);
    cell.update(1.5, &[spot]);
    assert!(cell.percent().is_finite());

    let CellObject::Lawn(lawn) = &cell else { panic!("expected a lawn") };
    assert_eq!(lawn.state.display_field, 10);
    assert_eq!(lawn.state.fields[0].tile_size, 7);
    assert!(lawn.state.fields[0].machine_width >= 1 && lawn.state.fields[0].tick_rate >= 1);
}

#[test]
fn commands_after_reload_still_apply() {
    let mut game = Game::start(0.0);
    let anti = find(&game, CellKind::Anti);
    let raw = persistence::save_to_string(&game).unwrap();
    game = persistence::load_from_str(&raw).unwrap();
    // unreachable cells ignore commands either way
    let selectable = game.grid.cells[anti].selectable;
    let applied = game.apply(GameAction::Command { at: anti, command: CellCommand::Anti(AntiCommand::ToggleBuySize) }, 1.0);
    assert_eq!(applied, selectable);
}
