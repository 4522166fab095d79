//! Every kind of grid content. Each kind owns a serializable state record,
//! a per-tick `update` and a completion contract; `CellObject` closes the
//! set so the grid and the save format can dispatch over it.

pub mod anti;
pub mod build;
pub mod business;
pub mod cheese;
pub mod crank;
pub mod info;
pub mod lawn;
pub mod merge;
pub mod obstacle;
pub mod prestige;
pub mod producer;
pub mod snail;
pub mod spawn;
pub mod wall;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{Contribution, Points, Reward};
use crate::persistence::{LoadError, overlay};
use crate::util::{RoundType, format_value};

use anti::{Anti, AntiCommand};
use build::Build;
use business::{Business, BusinessCommand};
use cheese::Cheese;
use crank::{Crank, CrankCommand};
use info::{Info, InfoCommand};
use lawn::{Lawn, LawnCommand};
use merge::Merge;
use obstacle::Aggregate;
use prestige::Prestige;
use producer::Producer;
use snail::{Snail, SnailCommand};
use spawn::{Spawn, SpawnCommand};
use wall::Wall;

/// Per-kind behavior behind `CellObject`.
pub trait CellBehavior {
    type State: Serialize + DeserializeOwned;

    fn state(&self) -> &Self::State;

    /// Replace the persisted state after a load.
    fn restore(&mut self, state: Self::State);

    /// Advance to `now` given what the eight neighbors hand out. A returned
    /// reward ends the cell unless it is a harvest.
    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward>;

    /// Remaining strength in percent for the progress bar.
    fn percent(&self) -> f64 {
        0.0
    }

    fn contribution(&self) -> Contribution {
        Contribution::default()
    }
}

/// State of kinds that only persist their type tag.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stateless {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    None,
    Spot,
    Boss,
    Enemy,
    Wall,
    Cheese,
    Business,
    Merge,
    Build,
    Info,
    Prestige,
    Crank,
    Lawn,
    Anti,
    Snail,
    Spawn,
}

impl CellKind {
    pub const ALL: [CellKind; 16] = [
        CellKind::None,
        CellKind::Spot,
        CellKind::Boss,
        CellKind::Enemy,
        CellKind::Wall,
        CellKind::Cheese,
        CellKind::Business,
        CellKind::Merge,
        CellKind::Build,
        CellKind::Info,
        CellKind::Prestige,
        CellKind::Crank,
        CellKind::Lawn,
        CellKind::Anti,
        CellKind::Snail,
        CellKind::Spawn,
    ];

    /// Save format type tag. Changing one breaks existing saves.
    pub fn tag(self) -> &'static str {
        match self {
            CellKind::None => "none",
            CellKind::Spot => "spot",
            CellKind::Boss => "boss",
            CellKind::Enemy => "enemy",
            CellKind::Wall => "wall",
            CellKind::Cheese => "enemyCheese",
            CellKind::Business => "enemyBusiness",
            CellKind::Merge => "merge",
            CellKind::Build => "build",
            CellKind::Info => "info",
            CellKind::Prestige => "enemyPrestige",
            CellKind::Crank => "enemyCrank",
            CellKind::Lawn => "enemyLawn",
            CellKind::Anti => "enemyAnti",
            CellKind::Snail => "enemySnail",
            CellKind::Spawn => "spawn",
        }
    }

    pub fn from_tag(tag: &str) -> Option<CellKind> {
        CellKind::ALL.into_iter().find(|k| k.tag() == tag)
    }

    /// Counted as an enemy for the completion totals.
    pub fn is_enemy(self) -> bool {
        self.tag().starts_with("enemy")
    }

    /// Enemies and walls block movement.
    pub fn is_obstacle(self) -> bool {
        self.is_enemy() || self == CellKind::Wall
    }

    pub fn label(self) -> &'static str {
        match self {
            CellKind::None => "-",
            CellKind::Spot => "SPOT",
            CellKind::Boss => "BOSS",
            CellKind::Enemy => "Enemy",
            CellKind::Wall => "Wall",
            CellKind::Cheese => "Cheese",
            CellKind::Business => "Business",
            CellKind::Merge => "Merge",
            CellKind::Build => "Build",
            CellKind::Info => "Info",
            CellKind::Prestige => "Prestige",
            CellKind::Crank => "Crank",
            CellKind::Lawn => "Lawn",
            CellKind::Anti => "Antimatter",
            CellKind::Snail => "Triangle",
            CellKind::Spawn => "Spawn",
        }
    }
}

/// Empty ground. Accepts dropped producers.
#[derive(Clone, Debug, Default)]
pub struct Blank {
    pub state: Stateless,
}

impl CellBehavior for Blank {
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

/// Placeholder obstacle that blocks forever.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub dist: u32,
    pub state: Stateless,
    power: Aggregate,
}

impl Enemy {
    pub fn new(dist: u32) -> Self {
        Self { dist, state: Stateless::default(), power: Aggregate::default() }
    }

    pub fn describe(&self) -> String {
        format!(
            "Enemy Details - Dist: {} T: {} D: {} E: {} Rem: 100.00",
            self.dist,
            format_value(self.power.t(), RoundType::Floor, "", ""),
            format_value(self.power.d(), RoundType::Floor, "", ""),
            self.power.e()
        )
    }
}

impl CellBehavior for Enemy {
    type State = Stateless;

    fn state(&self) -> &Stateless {
        &self.state
    }

    fn restore(&mut self, state: Stateless) {
        self.state = state;
    }

    fn update(&mut self, _now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        None
    }

    fn percent(&self) -> f64 {
        100.0
    }
}

/// Commands a player can send to the selected cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellCommand {
    /// Wall click boost.
    Click,
    Milk,
    Business(BusinessCommand),
    Prestige(usize),
    Crank(CrankCommand),
    Lawn(LawnCommand),
    Anti(AntiCommand),
    Snail(SnailCommand),
    Spawn(SpawnCommand),
    Info(InfoCommand),
}

#[derive(Clone, Debug)]
pub enum CellObject {
    Blank(Blank),
    Spot(Producer),
    Boss(Producer),
    Enemy(Enemy),
    Wall(Wall),
    Cheese(Cheese),
    Business(Business),
    Merge(Merge),
    Build(Build),
    Info(Info),
    Prestige(Prestige),
    Crank(Crank),
    Lawn(Lawn),
    Anti(Anti),
    Snail(Snail),
    Spawn(Spawn),
}

macro_rules! dispatch {
    ($value:expr, $cell:ident => $body:expr) => {
        match $value {
            CellObject::Blank($cell) => $body,
            CellObject::Spot($cell) => $body,
            CellObject::Boss($cell) => $body,
            CellObject::Enemy($cell) => $body,
            CellObject::Wall($cell) => $body,
            CellObject::Cheese($cell) => $body,
            CellObject::Business($cell) => $body,
            CellObject::Merge($cell) => $body,
            CellObject::Build($cell) => $body,
            CellObject::Info($cell) => $body,
            CellObject::Prestige($cell) => $body,
            CellObject::Crank($cell) => $body,
            CellObject::Lawn($cell) => $body,
            CellObject::Anti($cell) => $body,
            CellObject::Snail($cell) => $body,
            CellObject::Spawn($cell) => $body,
        }
    };
}

fn save_state<C: CellBehavior>(cell: &C) -> Result<Value, serde_json::Error> {
    serde_json::to_value(cell.state())
}

/// Overlay `saved` on the cell's default state and restore the result.
fn restore_state<C: CellBehavior>(cell: &mut C, saved: &Value) -> Result<(), serde_json::Error> {
    let mut merged = serde_json::to_value(cell.state())?;
    overlay(&mut merged, saved);
    let state = serde_json::from_value(merged)?;
    cell.restore(state);
    Ok(())
}

impl Default for CellObject {
    fn default() -> Self {
        CellObject::Blank(Blank::default())
    }
}

impl CellObject {
    /// Default content of `kind` at Manhattan distance `dist`.
    pub fn new(kind: CellKind, dist: u32) -> Self {
        match kind {
            CellKind::None => CellObject::Blank(Blank::default()),
            CellKind::Spot => CellObject::Spot(Producer::spot(1.0)),
            CellKind::Boss => CellObject::Boss(Producer::boss(1.0)),
            CellKind::Enemy => CellObject::Enemy(Enemy::new(dist)),
            CellKind::Wall => CellObject::Wall(Wall::new(dist)),
            CellKind::Cheese => CellObject::Cheese(Cheese::new(dist)),
            CellKind::Business => CellObject::Business(Business::new(dist)),
            CellKind::Merge => CellObject::Merge(Merge::default()),
            CellKind::Build => CellObject::Build(Build::default()),
            CellKind::Info => CellObject::Info(Info::default()),
            CellKind::Prestige => CellObject::Prestige(Prestige::new(dist)),
            CellKind::Crank => CellObject::Crank(Crank::new(dist)),
            CellKind::Lawn => CellObject::Lawn(Lawn::new(dist)),
            CellKind::Anti => CellObject::Anti(Anti::new(dist)),
            CellKind::Snail => CellObject::Snail(Snail::new(dist)),
            CellKind::Spawn => CellObject::Spawn(Spawn::new()),
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            CellObject::Blank(_) => CellKind::None,
            CellObject::Spot(_) => CellKind::Spot,
            CellObject::Boss(_) => CellKind::Boss,
            CellObject::Enemy(_) => CellKind::Enemy,
            CellObject::Wall(_) => CellKind::Wall,
            CellObject::Cheese(_) => CellKind::Cheese,
            CellObject::Business(_) => CellKind::Business,
            CellObject::Merge(_) => CellKind::Merge,
            CellObject::Build(_) => CellKind::Build,
            CellObject::Info(_) => CellKind::Info,
            CellObject::Prestige(_) => CellKind::Prestige,
            CellObject::Crank(_) => CellKind::Crank,
            CellObject::Lawn(_) => CellKind::Lawn,
            CellObject::Anti(_) => CellKind::Anti,
            CellObject::Snail(_) => CellKind::Snail,
            CellObject::Spawn(_) => CellKind::Spawn,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.kind().is_obstacle()
    }

    pub fn is_draggable(&self) -> bool {
        matches!(self, CellObject::Spot(_) | CellObject::Boss(_))
    }

    /// Only empty ground takes a dropped producer.
    pub fn accepts_drop(&self) -> bool {
        matches!(self, CellObject::Blank(_))
    }

    pub fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        dispatch!(self, c => c.update(now, neighbors))
    }

    pub fn percent(&self) -> f64 {
        dispatch!(self, c => c.percent())
    }

    /// What this cell hands its neighbors. Live obstacles carry an enemy
    /// weight of one, walls none.
    pub fn contribution(&self) -> Contribution {
        match self {
            CellObject::Spot(p) | CellObject::Boss(p) => p.contribution(),
            CellObject::Wall(_) => Contribution::default(),
            other if other.is_blocking() => Contribution { enemy_power: 1.0, ..Default::default() },
            _ => Contribution::default(),
        }
    }

    pub fn producer(&self) -> Option<&Producer> {
        match self {
            CellObject::Spot(p) | CellObject::Boss(p) => Some(p),
            _ => None,
        }
    }

    pub fn producer_mut(&mut self) -> Option<&mut Producer> {
        match self {
            CellObject::Spot(p) | CellObject::Boss(p) => Some(p),
            _ => None,
        }
    }

    /// A producer that has not been merged or sacrificed yet.
    pub fn is_live_producer(&self, kind: CellKind) -> bool {
        self.kind() == kind && self.producer().is_some_and(|p| !p.merged)
    }

    /// Flag a producer for removal on its next update.
    pub fn mark_merged(&mut self) -> bool {
        match self.producer_mut() {
            Some(p) if !p.merged => {
                p.merged = true;
                true
            }
            _ => false,
        }
    }

    pub fn command(&mut self, command: CellCommand, now: f64) -> bool {
        match (self, command) {
            (CellObject::Wall(w), CellCommand::Click) => w.click(),
            (CellObject::Cheese(c), CellCommand::Milk) => {
                c.milk(now);
                true
            }
            (CellObject::Business(b), CellCommand::Business(cmd)) => b.command(cmd, now),
            (CellObject::Prestige(p), CellCommand::Prestige(tier)) => p.activate(tier, now),
            (CellObject::Crank(c), CellCommand::Crank(cmd)) => c.command(cmd, now),
            (CellObject::Lawn(l), CellCommand::Lawn(cmd)) => l.command(cmd, now),
            (CellObject::Anti(a), CellCommand::Anti(cmd)) => a.command(cmd, now),
            (CellObject::Snail(s), CellCommand::Snail(cmd)) => s.command(cmd, now),
            (CellObject::Spawn(s), CellCommand::Spawn(cmd)) => s.command(cmd, now),
            (CellObject::Info(i), CellCommand::Info(cmd)) => i.command(cmd),
            _ => false,
        }
    }

    /// Drop every held button. Called when the cell loses focus.
    pub fn release_all(&mut self) {
        match self {
            CellObject::Business(b) => b.release_all(),
            CellObject::Crank(c) => c.release_all(),
            _ => {}
        }
    }

    pub fn describe(&self, now: f64, dist: u32, points: &Points) -> String {
        match self {
            CellObject::Blank(_) => "-".to_string(),
            CellObject::Spot(p) => p.describe("SPOT"),
            CellObject::Boss(p) => p.describe("BOSS"),
            CellObject::Enemy(e) => e.describe(),
            CellObject::Wall(w) => w.describe(),
            CellObject::Cheese(c) => c.describe(),
            CellObject::Business(b) => b.describe(),
            CellObject::Merge(m) => m.describe(dist),
            CellObject::Build(b) => b.describe(points),
            CellObject::Info(_) => "Tutorial, log, lore and settings".to_string(),
            CellObject::Prestige(p) => p.describe(),
            CellObject::Crank(c) => c.describe(),
            CellObject::Lawn(l) => l.describe(),
            CellObject::Anti(a) => a.describe(),
            CellObject::Snail(s) => s.describe(now),
            CellObject::Spawn(s) => s.describe(now),
        }
    }

    /// Persisted state with its `type` tag.
    pub fn save(&self) -> Result<Value, serde_json::Error> {
        let mut value = dispatch!(self, c => save_state(c))?;
        if let Value::Object(map) = &mut value {
            map.insert("type".to_string(), Value::String(self.kind().tag().to_string()));
        }
        Ok(value)
    }

    /// Rebuild a cell from its saved record. Missing fields keep the
    /// defaults of a fresh cell at `dist`.
    pub fn load(saved: &Value, dist: u32, index: usize) -> Result<CellObject, LoadError> {
        let tag = saved.get("type").and_then(Value::as_str).ok_or(LoadError::MissingTag { index })?;
        let kind = CellKind::from_tag(tag).ok_or_else(|| LoadError::UnknownTag { index, tag: tag.to_string() })?;
        let mut cell = CellObject::new(kind, dist);
        dispatch!(&mut cell, c => restore_state(c, saved))
            .map_err(|source| LoadError::BadState { index, tag: tag.to_string(), source })?;
        Ok(cell)
    }
}
