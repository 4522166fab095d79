//! Lawn care idler: eleven fields, each with its own upgrade track, earning
//! money at a tabulated yield. The tile automaton only runs while the panel
//! is on screen and is purely cosmetic.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate};
use crate::model::{Contribution, Reward, STRENGTH_DIST_FACTOR, reward_scale};
use crate::persistence::inf;
use crate::util::{RoundType, format_currency, format_value};

/// Canvas edge in pixels.
pub const CANVAS_SIZE: u32 = 240;
/// Tile edge in pixels per tile-size level.
pub const TILE_SIZES: [u32; 8] = [24, 12, 10, 5, 3, 2, 1, 1];
/// Tile edges of the yield model, per tile-size level.
const YIELD_TILE_SIZES: [f64; 8] = [50.0, 25.0, 20.0, 10.0, 5.0, 4.0, 2.0, 1.0];
pub const MAX_GROWTH: u8 = 15;
const CUT_HEIGHT: u8 = 5;
/// Seconds without a `MarkViewed` after which the automaton pauses.
const VIEW_TIMEOUT: f64 = 1.0;

pub struct FieldInfo {
    pub name: &'static str,
    pub multiplier_buff: f64,
    pub initial_buff: f64,
    pub base_color: [u8; 3],
    pub grown_color: [u8; 3],
    pub machine_color: &'static str,
    pub unlock_price: f64,
    pub value: f64,
    pub machine_name: &'static str,
}

macro_rules! field {
    ($name:expr, $mb:expr, $ib:expr, $base:expr, $grown:expr, $mc:expr, $price:expr, $value:expr, $machine:expr) => {
        FieldInfo {
            name: $name,
            multiplier_buff: $mb,
            initial_buff: $ib,
            base_color: $base,
            grown_color: $grown,
            machine_color: $mc,
            unlock_price: $price,
            value: $value,
            machine_name: $machine,
        }
    };
}

pub const FIELDS: [FieldInfo; 11] = [
    field!("Grass", 0.0, 1.0, [0, 210, 0], [0, 130, 0], "rgb(255,0,0)", 0.0, 1.0, "Lawnmower"),
    field!("Dirt", 0.15, 10.0, [175, 175, 175], [122, 96, 0], "rgb(68, 130, 206)", 1e5, 5.0, "Vacuum"),
    field!("Weed", 0.25, 50.0, [239, 233, 112], [145, 233, 124], "rgb(255,127,0)", 1e6, 20.0, "Weed Whacker"),
    field!("Pumpkin", 0.35, 100.0, [181, 155, 105], [255, 188, 61], "rgb(119, 119, 119)", 1e7, 50.0, "Harvester"),
    field!("Tree", 0.45, 500.0, [122, 81, 0], [54, 109, 0], "rgb(97, 175, 191)", 1e8, 100.0, "Chainsaw"),
    field!("Fire", 0.55, 1000.0, [255, 0, 0], [255, 255, 0], "rgb(0,0,255)", 1e9, 200.0, "Wave"),
    field!("Stone", 0.65, 5000.0, [255, 255, 255], [124, 124, 124], "rgb(122, 73, 33)", 1e10, 500.0, "Wooden Pickaxe"),
    field!("Iron", 0.75, 10000.0, [124, 124, 124], [221, 206, 193], "rgb(100, 100, 100)", 1e11, 1000.0, "Stone Pickaxe"),
    field!("Diamond", 0.85, 50000.0, [124, 124, 124], [124, 239, 228], "rgb(221, 206, 193)", 1e12, 2000.0, "Iron Pickaxe"),
    field!("Gold", 0.95, 100000.0, [138, 202, 216], [211, 176, 0], "rgb(143, 158, 139)", 1e13, 5000.0, "Pan"),
    field!("People", 0.65, 5000.0, [255, 67, 50], [255, 211, 168], "rgb(100, 100, 100)", 1e14, 10000.0, "Terminator"),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LawnUpgrade {
    #[serde(rename = "tr")]
    TickRate,
    #[serde(rename = "gr")]
    GrowthRate,
    #[serde(rename = "ls")]
    MachineSpeed,
    #[serde(rename = "lz")]
    MachineSize,
    #[serde(rename = "ts")]
    TileSize,
}

impl LawnUpgrade {
    pub const ALL: [LawnUpgrade; 5] = [
        LawnUpgrade::TickRate,
        LawnUpgrade::GrowthRate,
        LawnUpgrade::MachineSpeed,
        LawnUpgrade::MachineSize,
        LawnUpgrade::TileSize,
    ];

    /// Base price and per-level multiplier.
    pub fn pricing(self) -> (f64, f64) {
        match self {
            LawnUpgrade::TickRate => (5.0, 1.2),
            LawnUpgrade::GrowthRate => (10.0, 1.2),
            LawnUpgrade::MachineSpeed => (50.0, 2.5),
            LawnUpgrade::MachineSize => (75.0, 1.5),
            LawnUpgrade::TileSize => (150.0, 3.5),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLevels {
    pub tr: u32,
    pub gr: u32,
    pub ls: u32,
    pub lz: u32,
    pub ts: u32,
}

impl UpgradeLevels {
    pub fn get(&self, upgrade: LawnUpgrade) -> u32 {
        match upgrade {
            LawnUpgrade::TickRate => self.tr,
            LawnUpgrade::GrowthRate => self.gr,
            LawnUpgrade::MachineSpeed => self.ls,
            LawnUpgrade::MachineSize => self.lz,
            LawnUpgrade::TileSize => self.ts,
        }
    }

    fn bump(&mut self, upgrade: LawnUpgrade) {
        let level = match upgrade {
            LawnUpgrade::TickRate => &mut self.tr,
            LawnUpgrade::GrowthRate => &mut self.gr,
            LawnUpgrade::MachineSpeed => &mut self.ls,
            LawnUpgrade::MachineSize => &mut self.lz,
            LawnUpgrade::TileSize => &mut self.ts,
        };
        *level += 1;
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    pub tile_size: usize,
    pub machine_speed: u32,
    pub machine_width: u32,
    pub machine_height: u32,
    pub growth_amount: u32,
    /// Milliseconds between automaton ticks.
    pub tick_rate: u32,
    pub unlocked: bool,
    pub upgrades: UpgradeLevels,
}

impl Default for FieldState {
    fn default() -> Self {
        Self {
            tile_size: 0,
            machine_speed: 1,
            machine_width: 1,
            machine_height: 1,
            growth_amount: 4,
            tick_rate: 1000,
            unlocked: false,
            upgrades: UpgradeLevels::default(),
        }
    }
}

impl FieldState {
    /// Tiles along one edge of the canvas.
    pub fn tiles_per_side(&self) -> u32 {
        CANVAS_SIZE / TILE_SIZES[self.tile_size]
    }

    pub fn can_buy(&self, upgrade: LawnUpgrade) -> bool {
        match upgrade {
            LawnUpgrade::TickRate => self.tick_rate > 4,
            LawnUpgrade::GrowthRate => self.growth_amount < 60,
            LawnUpgrade::MachineSpeed => self.machine_speed < 20,
            LawnUpgrade::MachineSize => self.machine_height < self.tiles_per_side(),
            LawnUpgrade::TileSize => self.tile_size < TILE_SIZES.len() - 1,
        }
    }

    /// Pull a loaded record back inside the ranges the upgrades can reach.
    fn clamp(&mut self) {
        self.tile_size = self.tile_size.min(TILE_SIZES.len() - 1);
        self.machine_width = self.machine_width.clamp(1, CANVAS_SIZE);
        self.machine_height = self.machine_height.clamp(1, CANVAS_SIZE);
        self.machine_speed = self.machine_speed.clamp(1, 20);
        self.growth_amount = self.growth_amount.min(60);
        self.tick_rate = self.tick_rate.max(1);
    }

    fn apply(&mut self, upgrade: LawnUpgrade) {
        match upgrade {
            LawnUpgrade::TickRate => self.tick_rate = ((self.tick_rate as f64 * 0.9).floor() as u32).max(1),
            LawnUpgrade::GrowthRate => self.growth_amount += 2,
            LawnUpgrade::MachineSpeed => self.machine_speed += 1,
            LawnUpgrade::MachineSize => {
                if self.machine_width == self.machine_height {
                    self.machine_width += 1;
                } else {
                    self.machine_height += 1;
                }
            }
            LawnUpgrade::TileSize => self.tile_size = (self.tile_size + 1).min(TILE_SIZES.len() - 1),
        }
        self.upgrades.bump(upgrade);
    }

    /// Money per second this field earns at one tick power.
    pub fn rate(&self, info: &FieldInfo) -> f64 {
        if !self.unlocked {
            return 0.0;
        }
        let mut scale = 1.0;
        let mut g = self.growth_amount as f64;
        if g > 58.0 {
            scale *= 1.01;
            g = 58.0;
        }
        let mut s = self.machine_speed as f64;
        if s > 19.0 {
            scale *= 1.01;
            s = 19.0;
        }
        let side = 500.0 / YIELD_TILE_SIZES[self.tile_size];
        let w = self.machine_width as f64;
        let wstep = (side / 5.0).floor();
        let wl = ((w - 1.0) / wstep).floor() * wstep + 1.0;
        let wh = side.min((w / wstep).ceil() * wstep + 1.0);
        let per_tick = if w == wl || wh <= wl {
            tick_yield(g, s, side, w)
        } else {
            let lb = tick_yield(g, s, side, wl);
            let ub = tick_yield(g, s, side, wh);
            lb + (ub - lb) * (w - wl) / (wh - wl)
        };
        per_tick * scale * (1000.0 / self.tick_rate as f64) * info.value
    }
}

/// Sampled yield per automaton tick: grass grown is the supply, tiles swept
/// is the cover, and the harvest saturates at whichever is scarcer.
fn tick_yield(growth: f64, speed: f64, side: f64, width: f64) -> f64 {
    let supply = growth / 5.0;
    let cover = (side * side).min(speed * width * width);
    supply * cover / (supply + cover)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LawnState {
    pub money: Accumulator,
    pub total_money: Accumulator,
    #[serde(with = "inf")]
    pub mulch: f64,
    pub display_field: usize,
    pub highest_unlock: usize,
    pub fields: Vec<FieldState>,
}

fn fresh_fields() -> Vec<FieldState> {
    let mut fields = vec![FieldState::default(); FIELDS.len()];
    fields[0].unlocked = true;
    fields
}

/// Transient tile grid of the displayed field.
#[derive(Clone, Debug)]
pub struct Tiles {
    pub side: u32,
    pub heights: Vec<u8>,
    /// Mower slot along its serpentine sweep.
    pub machine: u32,
    next_tick: f64,
    rng: ChaCha8Rng,
}

impl Tiles {
    fn new(field: &FieldState, seed: u64) -> Self {
        let side = field.tiles_per_side();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let heights = (0..side * side).map(|_| rng.gen_range(0..MAX_GROWTH)).collect();
        Self { side, heights, machine: 0, next_tick: 0.0, rng }
    }

    pub fn height(&self, x: u32, y: u32) -> u8 {
        self.heights[(x * self.side + y) as usize]
    }

    /// Mower slots per sweep.
    fn slots(field: &FieldState) -> u32 {
        let s = TILE_SIZES[field.tile_size];
        CANVAS_SIZE.div_ceil(field.machine_width * s) * CANVAS_SIZE.div_ceil(field.machine_height * s)
    }

    /// Top-left tile of mower slot `i`: columns top to bottom, then bottom to top.
    pub fn machine_origin(field: &FieldState, i: u32) -> (u32, u32) {
        let s = TILE_SIZES[field.tile_size];
        let ch = CANVAS_SIZE.div_ceil(s * field.machine_height);
        let mx = i / ch;
        let my = if mx % 2 == 1 { (ch - 1) - i % ch } else { i % ch };
        (mx * field.machine_width, my * field.machine_height)
    }

    fn grow(&mut self, field: &FieldState, bonus: u8) {
        if field.machine_width > 50 {
            return;
        }
        let x = self.rng.gen_range(0..self.side);
        let y = self.rng.gen_range(0..self.side);
        let idx = (x * self.side + y) as usize;
        self.heights[idx] = (self.heights[idx] + 1 + bonus).min(MAX_GROWTH);
    }

    fn cut(&mut self, field: &FieldState) {
        if field.machine_width > 50 {
            return;
        }
        let (ox, oy) = Self::machine_origin(field, self.machine);
        for x in ox..(ox + field.machine_width).min(self.side) {
            for y in oy..(oy + field.machine_height).min(self.side) {
                let idx = (x * self.side + y) as usize;
                if self.heights[idx] >= CUT_HEIGHT {
                    self.heights[idx] = 0;
                }
            }
        }
    }

    fn step(&mut self, field: &FieldState, bonus: u8, now: f64) {
        self.next_tick = now + field.tick_rate as f64 / 1000.0;
        for _ in 0..field.growth_amount {
            self.grow(field, bonus);
        }
        let slots = Self::slots(field);
        for _ in 0..field.machine_speed {
            self.machine = (self.machine + 1) % slots;
            self.cut(field);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LawnCommand {
    BuyUpgrade(LawnUpgrade),
    UnlockField,
    PrevField,
    NextField,
    Prestige,
    /// The panel is on screen; keeps the tile automaton running.
    MarkViewed,
}

#[derive(Clone, Debug)]
pub struct Lawn {
    pub dist: u32,
    pub state: LawnState,
    power: Aggregate,
    pub percent: f64,
    pub money: f64,
    pub total_money: f64,
    /// Money per second including the mulch bonus.
    pub rate: f64,
    pub tiles: Option<Tiles>,
    last_viewed: f64,
}

impl Lawn {
    pub fn new(dist: u32) -> Self {
        Self {
            dist,
            state: LawnState {
                money: Accumulator::idle(),
                total_money: Accumulator::idle(),
                mulch: 0.0,
                display_field: 0,
                highest_unlock: 0,
                fields: fresh_fields(),
            },
            power: Aggregate::default(),
            percent: 100.0,
            money: 0.0,
            total_money: 0.0,
            rate: 0.0,
            tiles: None,
            last_viewed: f64::NEG_INFINITY,
        }
    }

    pub fn base_strength(&self) -> f64 {
        10.0 * STRENGTH_DIST_FACTOR.powi(self.dist as i32)
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn field(&self) -> &FieldState {
        &self.state.fields[self.state.display_field]
    }

    pub fn field_info(&self) -> &'static FieldInfo {
        &FIELDS[self.state.display_field]
    }

    /// Combined money per second of every unlocked field at one tick power.
    pub fn gain(&self) -> f64 {
        self.state.fields.iter().zip(FIELDS.iter()).map(|(f, info)| f.rate(info)).sum()
    }

    pub fn mulch_multiplier(&self) -> f64 {
        1.0 + self.state.mulch / 100.0
    }

    pub fn growth_bonus(&self) -> u8 {
        (self.state.mulch.max(1.0).ln() / 15f64.ln()).floor() as u8
    }

    pub fn next_mulch(&self) -> f64 {
        ((self.total_money / 10.0 - 7500.0).max(0.0).powf(0.575) - self.state.mulch).max(0.0).floor()
    }

    pub fn upgrade_price(&self, upgrade: LawnUpgrade) -> f64 {
        let (price, mult) = upgrade.pricing();
        let info = self.field_info();
        let level = self.field().upgrades.get(upgrade);
        (price * info.initial_buff * (mult + info.multiplier_buff).powi(level as i32)).floor()
    }

    /// Money accrues continuously between ticks, not in whole seconds.
    pub fn money_at(&self, now: f64) -> f64 {
        self.state.money.progress(now, self.rate)
    }

    fn total_at(&self, now: f64) -> f64 {
        self.state.total_money.progress(now, self.rate)
    }

    /// Spend `cost` and restart both accumulators from the balances at `now`.
    fn spend(&mut self, cost: f64, now: f64) {
        let money = self.money_at(now) - cost;
        let total = self.total_at(now);
        self.state.money = Accumulator { start: now, previous_progress: money };
        self.state.total_money = Accumulator { start: now, previous_progress: total };
        self.money = money;
        self.total_money = total;
    }

    fn reset_tiles(&mut self) {
        let seed = ((self.dist as u64) << 8) | self.state.display_field as u64;
        self.tiles = Some(Tiles::new(self.field(), seed));
    }

    pub fn buy_upgrade(&mut self, upgrade: LawnUpgrade, now: f64) -> bool {
        let cost = self.upgrade_price(upgrade);
        if !self.field().can_buy(upgrade) || self.money_at(now) < cost {
            return false;
        }
        self.spend(cost, now);
        let idx = self.state.display_field;
        self.state.fields[idx].apply(upgrade);
        if matches!(upgrade, LawnUpgrade::TileSize | LawnUpgrade::MachineSize) {
            self.reset_tiles();
        }
        true
    }

    pub fn unlock_field(&mut self, now: f64) -> bool {
        let next = self.state.highest_unlock + 1;
        if next >= FIELDS.len() || self.money_at(now) < FIELDS[next].unlock_price {
            return false;
        }
        self.spend(FIELDS[next].unlock_price, now);
        self.state.fields[next].unlocked = true;
        self.state.highest_unlock = next;
        self.state.display_field = next;
        self.reset_tiles();
        true
    }

    pub fn prev_field(&mut self) -> bool {
        if self.state.display_field == 0 {
            return false;
        }
        self.state.display_field -= 1;
        self.reset_tiles();
        true
    }

    pub fn next_field(&mut self) -> bool {
        let next = self.state.display_field + 1;
        if next >= FIELDS.len() || !self.state.fields[next].unlocked {
            return false;
        }
        self.state.display_field = next;
        self.reset_tiles();
        true
    }

    /// Trade all money and fields for mulch.
    pub fn prestige(&mut self, now: f64) -> bool {
        let gained = self.next_mulch();
        if gained <= 0.0 {
            return false;
        }
        self.state.mulch += gained;
        self.state.money.restart(now);
        self.state.total_money.restart(now);
        self.state.display_field = 0;
        self.state.highest_unlock = 0;
        self.state.fields = fresh_fields();
        self.money = 0.0;
        self.total_money = 0.0;
        self.rate = self.power.t() * self.gain() * self.mulch_multiplier();
        self.reset_tiles();
        true
    }

    pub fn command(&mut self, command: LawnCommand, now: f64) -> bool {
        match command {
            LawnCommand::BuyUpgrade(upgrade) => self.buy_upgrade(upgrade, now),
            LawnCommand::UnlockField => self.unlock_field(now),
            LawnCommand::PrevField => self.prev_field(),
            LawnCommand::NextField => self.next_field(),
            LawnCommand::Prestige => self.prestige(now),
            LawnCommand::MarkViewed => {
                self.last_viewed = now;
                true
            }
        }
    }

    /// Tile colour between the field's base and grown colours.
    pub fn tile_color(&self, height: u8) -> (u8, u8, u8) {
        let info = self.field_info();
        let ratio = height as f64 / MAX_GROWTH as f64;
        let mix = |a: u8, b: u8| (a as f64 + ratio * (b as f64 - a as f64)) as u8;
        (
            mix(info.base_color[0], info.grown_color[0]),
            mix(info.base_color[1], info.grown_color[1]),
            mix(info.base_color[2], info.grown_color[2]),
        )
    }

    pub fn describe(&self) -> String {
        format!(
            "{} / {}\nField {} ({}), mulch {} (+{}%), growth x{}",
            format_currency(self.money, RoundType::Floor),
            format_currency(self.base_strength(), RoundType::Ceil),
            self.field_info().name,
            self.field_info().machine_name,
            format_value(self.state.mulch, RoundType::Floor, "", ""),
            format_value(self.state.mulch, RoundType::Floor, "", ""),
            self.growth_bonus() as u32 + 1
        )
    }
}

impl CellBehavior for Lawn {
    type State = LawnState;

    fn state(&self) -> &LawnState {
        &self.state
    }

    fn restore(&mut self, state: LawnState) {
        self.state = state;
        if self.state.fields.len() != FIELDS.len() {
            self.state.fields.resize(FIELDS.len(), FieldState::default());
        }
        self.state.fields.iter_mut().for_each(FieldState::clamp);
        self.state.fields[0].unlocked = true;
        self.state.display_field = self.state.display_field.min(FIELDS.len() - 1);
        self.state.highest_unlock = self.state.highest_unlock.min(FIELDS.len() - 1);
        self.tiles = None;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        let per_power = self.gain() * self.mulch_multiplier();
        let t = self.power.t();

        if !self.state.money.is_running() && t > 0.0 {
            self.state.money.begin(now);
            self.state.total_money.begin(now);
        }
        if self.power.t_changed() {
            let old = self.power.last_t() * per_power;
            self.state.money.rebase(now, old);
            self.state.total_money.rebase(now, old);
        }
        self.rate = t * per_power;
        self.money = self.money_at(now);
        self.total_money = self.total_at(now);

        if self.rate > 0.0 && now - self.last_viewed < VIEW_TIMEOUT {
            if self.tiles.is_none() {
                self.reset_tiles();
            }
            let bonus = self.growth_bonus();
            let field = self.state.fields[self.state.display_field].clone();
            if let Some(tiles) = self.tiles.as_mut() {
                if now >= tiles.next_tick {
                    tiles.step(&field, bonus, now);
                }
            }
        }

        self.percent = 100.0 * (1.0 - self.money / self.base_strength());
        (self.percent <= 0.0).then(|| Reward::tpoints(reward_scale(self.dist)))
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
    fn only_grass_starts_unlocked() {
        let lawn = Lawn::new(10);
        assert!(lawn.state.fields[0].unlocked);
        assert!(lawn.state.fields[1..].iter().all(|f| !f.unlocked));
        assert_eq!(lawn.state.fields[1].rate(&FIELDS[1]), 0.0);
        assert!(lawn.gain() > 0.0);
    }

    #[test]
    fn upgrade_prices() {
        let lawn = Lawn::new(10);
        assert_eq!(lawn.upgrade_price(LawnUpgrade::TickRate), 5.0);
        assert_eq!(lawn.upgrade_price(LawnUpgrade::TileSize), 150.0);
    }

    #[test]
    fn more_speed_or_growth_never_lowers_yield() {
        let base = FieldState { unlocked: true, ..Default::default() };
        let mut faster = base.clone();
        faster.apply(LawnUpgrade::MachineSpeed);
        let mut greener = base.clone();
        greener.apply(LawnUpgrade::GrowthRate);
        assert!(faster.rate(&FIELDS[0]) >= base.rate(&FIELDS[0]));
        assert!(greener.rate(&FIELDS[0]) >= base.rate(&FIELDS[0]));
        let mut quicker = base.clone();
        quicker.apply(LawnUpgrade::TickRate);
        assert_eq!(quicker.tick_rate, 900);
        assert!(quicker.rate(&FIELDS[0]) > base.rate(&FIELDS[0]));
    }

    #[test]
    fn machine_size_alternates_width_and_height() {
        let mut field = FieldState::default();
        field.apply(LawnUpgrade::MachineSize);
        assert_eq!((field.machine_width, field.machine_height), (2, 1));
        field.apply(LawnUpgrade::MachineSize);
        assert_eq!((field.machine_width, field.machine_height), (2, 2));
        assert_eq!(field.upgrades.lz, 2);
    }

    #[test]
    fn buying_spends_money() {
        let mut lawn = Lawn::new(10);
        lawn.update(0.0, &[spot(1.0)]);
        assert!(!lawn.buy_upgrade(LawnUpgrade::TickRate, 0.0));
        let t = lawn.rate;
        let when = 6.0 / t;
        assert!(lawn.buy_upgrade(LawnUpgrade::TickRate, when));
        assert!((lawn.money_at(when) - 1.0).abs() < 1e-9);
        assert_eq!(lawn.field().upgrades.tr, 1);
        assert!((lawn.total_at(when) - 6.0).abs() < 1e-9);
    }

    #[test]
    fn field_navigation_respects_unlocks() {
        let mut lawn = Lawn::new(10);
        assert!(!lawn.prev_field());
        assert!(!lawn.next_field());
        lawn.state.money = Accumulator { start: 0.0, previous_progress: 2e5 };
        assert!(lawn.unlock_field(0.0));
        assert_eq!(lawn.state.display_field, 1);
        assert_eq!(lawn.state.highest_unlock, 1);
        assert!(lawn.prev_field());
        assert!(lawn.next_field());
    }

    #[test]
    fn mulch_prestige_resets_fields() {
        let mut lawn = Lawn::new(10);
        lawn.total_money = 10.0 * (7500.0 + 100.0);
        let expected = 100f64.powf(0.575).floor();
        assert_eq!(lawn.next_mulch(), expected);
        lawn.state.fields[1].unlocked = true;
        assert!(lawn.prestige(5.0));
        assert_eq!(lawn.state.mulch, expected);
        assert!(!lawn.state.fields[1].unlocked);
        assert_eq!(lawn.money_at(5.0), 0.0);
        assert_eq!(lawn.growth_bonus(), 0);
        lawn.state.mulch = 16.0;
        assert_eq!(lawn.growth_bonus(), 1);
    }

    #[test]
    fn tiles_only_run_while_viewed() {
        let mut lawn = Lawn::new(10);
        lawn.update(0.0, &[spot(1.0)]);
        assert!(lawn.tiles.is_none());
        lawn.command(LawnCommand::MarkViewed, 0.5);
        lawn.update(0.6, &[spot(1.0)]);
        let tiles = lawn.tiles.as_ref().map(|t| t.machine);
        assert_eq!(tiles, Some(1));
        lawn.update(5.0, &[spot(1.0)]);
        assert_eq!(lawn.tiles.as_ref().map(|t| t.machine), Some(1));
    }

    #[test]
    fn serpentine_sweep() {
        let field = FieldState::default();
        assert_eq!(Tiles::machine_origin(&field, 0), (0, 0));
        assert_eq!(Tiles::machine_origin(&field, 9), (0, 9));
        assert_eq!(Tiles::machine_origin(&field, 10), (1, 9));
        assert_eq!(Tiles::machine_origin(&field, 19), (1, 0));
    }

    #[test]
    fn restore_clamps_out_of_range_fields() {
        let mut lawn = Lawn::new(5);
        let mut state = lawn.state.clone();
        state.fields[0] = FieldState {
            tile_size: 99,
            machine_width: 0,
            machine_height: 0,
            machine_speed: 0,
            tick_rate: 0,
            growth_amount: u32::MAX,
            unlocked: true,
            upgrades: UpgradeLevels::default(),
        };
        state.highest_unlock = usize::MAX;
        lawn.restore(state);
        let field = lawn.field();
        assert_eq!(field.tile_size, TILE_SIZES.len() - 1);
        assert_eq!((field.machine_width, field.machine_height), (1, 1));
        assert_eq!((field.machine_speed, field.tick_rate, field.growth_amount), (1, 1, 60));
        assert!(!lawn.unlock_field(0.0));

        lawn.command(LawnCommand::MarkViewed, 0.0);
        lawn.update(0.5, &[spot(1.0)]);
        assert!(lawn.rate.is_finite() && lawn.rate > 0.0);
        assert!(lawn.tiles.is_some());
    }

    #[test]
    fn money_accrues_between_whole_seconds() {
        let mut lawn = Lawn::new(10);
        lawn.update(0.0, &[spot(1.0)]);
        assert!((lawn.money_at(0.5) - 0.5 * lawn.rate).abs() < 1e-9);
    }

    #[test]
    fn completes_when_money_reaches_strength() {
        let mut lawn = Lawn::new(0);
        lawn.update(0.0, &[spot(1.0)]);
        let needed = lawn.base_strength() / lawn.rate;
        assert_eq!(lawn.update(needed * 0.5, &[spot(1.0)]), None);
        assert!(lawn.update(needed + 0.01, &[spot(1.0)]).is_some());
    }
}
