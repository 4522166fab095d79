//! Simulation core of the grid game: cell kinds, the grid, the tick loop
//! and the save format. Nothing here touches the DOM; the `yew-pptop`
//! binary renders it.

pub mod cells;
pub mod game;
pub mod grid;
pub mod model;
pub mod persistence;
pub mod state;
pub mod util;
pub mod world;

pub use cells::{CellCommand, CellKind, CellObject};
pub use game::{Game, GameAction};
pub use persistence::{LoadError, SaveBlob};
