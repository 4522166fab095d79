//! Save blob format and the helpers every persisted state shares.
//!
//! JSON has no infinity, so `inf` writes it as `null` and reads `null`
//! back as `+∞`. Loaded cell states are overlaid on the defaults of a
//! fresh cell so fields added later keep their default values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::cells::CellObject;
use crate::game::Game;
use crate::model::LogEntry;

/// Local storage key of the save blob.
pub const STORAGE_KEY: &str = "gridGame";

/// `#[serde(with = "inf")]` for `f64` fields that may hold infinity.
pub mod inf {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }

    /// Same mapping for every element of a `Vec<f64>`.
    pub mod seq {
        use serde::{Deserialize, Deserializer, Serialize, Serializer};

        pub fn serialize<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
            let mapped: Vec<Option<f64>> = values.iter().map(|v| v.is_finite().then_some(*v)).collect();
            mapped.serialize(serializer)
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f64>, D::Error> {
            let raw = Vec::<Option<f64>>::deserialize(deserializer)?;
            Ok(raw.into_iter().map(|v| v.unwrap_or(f64::INFINITY)).collect())
        }
    }
}

/// Merge `saved` into `base`. Objects merge key by key at any depth;
/// arrays and scalars from `saved` replace what `base` holds.
pub fn overlay(base: &mut Value, saved: &Value) {
    match (base, saved) {
        (Value::Object(base), Value::Object(saved)) => {
            for (key, value) in saved {
                match base.get_mut(key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, saved) => *base = saved.clone(),
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("save blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cell {index} has no type tag")]
    MissingTag { index: usize },
    #[error("cell {index} has unknown type tag {tag:?}")]
    UnknownTag { index: usize, tag: String },
    #[error("save holds {found} cells, grid has {expected}")]
    CellCount { expected: usize, found: usize },
    #[error("cell {index} ({tag}) has a malformed state: {source}")]
    BadState {
        index: usize,
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything persisted between sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveBlob {
    #[serde(default)]
    pub log: Vec<LogEntry>,
    #[serde(default)]
    pub lore_unlocks: Vec<bool>,
    #[serde(with = "inf", default)]
    pub tpoints: f64,
    #[serde(with = "inf", default)]
    pub dpoints: f64,
    /// Unix time of the first session in milliseconds.
    #[serde(with = "inf", default)]
    pub game_start: f64,
    /// Tagged cell states in row-major grid order.
    #[serde(default)]
    pub cell_saves: Vec<Value>,
}

pub fn save_game(game: &Game) -> Result<SaveBlob, serde_json::Error> {
    let cell_saves = game.grid.cells.iter().map(|c| c.content.save()).collect::<Result<Vec<_>, _>>()?;
    Ok(SaveBlob {
        log: game.log.clone(),
        lore_unlocks: game.lore_unlocks.clone(),
        tpoints: game.points.tpoints,
        dpoints: game.points.dpoints,
        game_start: game.game_start,
        cell_saves,
    })
}

pub fn save_to_string(game: &Game) -> Result<String, serde_json::Error> {
    serde_json::to_string(&save_game(game)?)
}

/// Rebuild a game from a blob. The world is generated first so the
/// completion totals match a fresh start, then every cell is replaced by
/// its saved content.
pub fn load_game(blob: &SaveBlob) -> Result<Game, LoadError> {
    let mut game = Game::new(blob.game_start);
    let expected = game.grid.cells.len();
    if !blob.cell_saves.is_empty() && blob.cell_saves.len() != expected {
        return Err(LoadError::CellCount { expected, found: blob.cell_saves.len() });
    }
    for (index, saved) in blob.cell_saves.iter().enumerate() {
        let cell = &mut game.grid.cells[index];
        cell.content = CellObject::load(saved, cell.pos.dist(), index)?;
    }
    game.log = blob.log.clone();
    if !blob.lore_unlocks.is_empty() {
        game.lore_unlocks = blob.lore_unlocks.clone();
    }
    game.points.tpoints = blob.tpoints;
    game.points.dpoints = blob.dpoints;
    game.refresh();
    Ok(game)
}

pub fn load_from_str(raw: &str) -> Result<Game, LoadError> {
    let blob: SaveBlob = serde_json::from_str(raw)?;
    load_game(&blob)
}
