//! The fixed starting map. Digits mark path cells whose obstacle is drawn
//! from a deterministic shuffle bag so every new game gets the same world.

use crate::cells::{CellKind, CellObject};
use crate::grid::{GRID_SIZE, Grid};

pub const WORLD: [&str; 32] = [
    "?b..11111111x1x1x11x1xxxxxx11111",
    "sB.xxx1m1x11x1x1x111111111x1x1x1",
    "..333xxxxx11x111x11x1xxxx1x1x1x1",
    ".x333x33xx1111x1x11x111111x1x1x1",
    "2x3333333x1111x11x1x1xxxx1x1x1x1",
    "2xxx3x33x11111x1111x111111x1x1x1",
    "22x333x33xxxxxx111x.xxxxx1x1x1x1",
    "2mx3333S3333333x1x111x111111x1x1",
    "22xx3x333xxxx333x11x11xxxxxx1111",
    "2xxxx2x3x3333x333x111x11111111xx",
    "222222x3x3xx3x3333x1x11111111x11",
    "222222x3x3x33333333x11xxxxxxx111",
    "xxx222x3x333x33x3x3xx11111111111",
    "222222x33xx33xx333xxxx1111111x11",
    "xx2xxxx333333xx333xxxx1xxxxxx11x",
    "2222222x3333x33x333333333x1111x1",
    "xxxx2222x3333333xxxxxx3x3x111x11",
    "2222x22x2x33x333xx33333x3x11x1x1",
    "222222x222x33xx3x33x3x3x3x11x111",
    "x2xxxx.2x22xxxx3x3x33x3x3x11x111",
    "222222x222x2xxx3x333xx3x3x11x111",
    "x2x2x2xx2x222xx3x3xxx33x3x11x1x1",
    "x2x2x2x2x2222223333333xx3x1111x1",
    "x2x2x2x2x22x22x3xxxxxxx33xx111x1",
    "x2x2x2x2x22x22x333333333333x11x1",
    "x2222222x22x22xxxxxxxxxx333x1x11",
    "xxxxxxx2x22x22x22222222x3333x111",
    "22222222x22x22x222222222xx331111",
    "2xxxxxxx222x22x22xxxxx2222x231xx",
    "2222222222x22x22x22222222x222.$r",
    "2xxxxxxx2x22222x2x222xxxx222xcxa",
    "222222222x2222x2222222222222xlpF",
];

/// Cell index to the lore entry its completion unlocks.
pub const LORE_UNLOCK_MAP: [(usize, usize); 27] = [
    (0, 0),
    (4, 1),
    (2 + 2 * 32, 2),
    (4 * 32, 3),
    (9, 4),
    (4 + 4 * 32, 5),
    (9 * 32, 6),
    (15 + 4 * 32, 7),
    (4 + 15 * 32, 8),
    (8 + 8 * 32, 9),
    (19 + 10 * 32, 10),
    (10 + 19 * 32, 11),
    (9 + 9 * 32, 12),
    (29 + 8 * 32, 13),
    (8 + 29 * 32, 14),
    (18 + 18 * 32, 15),
    (12 + 29 * 32, 16),
    (29 + 12 * 32, 17),
    (21 + 21 * 32, 18),
    (22 + 28 * 32, 19),
    (31 + 21 * 32, 20),
    (25 + 25 * 32, 21),
    (26 + 30 * 32, 22),
    (29 + 28 * 32, 23),
    (29 + 29 * 32, 24),
    (28 + 29 * 32, 25),
    (31 + 31 * 32, 26),
];

pub const LORE_COUNT: usize = LORE_UNLOCK_MAP.len();

pub fn lore_for_cell(index: usize) -> Option<usize> {
    LORE_UNLOCK_MAP.iter().find(|(cell, _)| *cell == index).map(|(_, lore)| *lore)
}

pub fn kind_for_char(c: char) -> Option<CellKind> {
    Some(match c {
        '.' => CellKind::None,
        'b' => CellKind::Boss,
        's' => CellKind::Spot,
        'e' => CellKind::Enemy,
        'x' => CellKind::Wall,
        'c' => CellKind::Cheese,
        '$' => CellKind::Business,
        'm' => CellKind::Merge,
        'B' => CellKind::Build,
        '?' => CellKind::Info,
        'p' => CellKind::Prestige,
        'r' => CellKind::Crank,
        'l' => CellKind::Lawn,
        'a' => CellKind::Anti,
        'F' => CellKind::Snail,
        'S' => CellKind::Spawn,
        _ => return None,
    })
}

/// Sine hash in `[0, 1)`.
pub fn rnd(seed: f64) -> f64 {
    let x = seed.sin() * 14324.0;
    x - x.floor()
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Shuffled copies of a character set. Refills from its last seed when empty.
#[derive(Clone, Debug)]
pub struct RndBag {
    contents: Vec<char>,
    duplicates: usize,
    seed: f64,
    bag: Vec<char>,
}

impl RndBag {
    pub fn new(contents: &str, duplicates: usize, seed: f64) -> Self {
        let mut bag = Self { contents: contents.chars().collect(), duplicates, seed, bag: Vec::new() };
        bag.fill();
        bag
    }

    fn fill(&mut self) {
        let mut bag: Vec<char> = Vec::with_capacity(self.contents.len() * self.duplicates);
        for _ in 0..self.duplicates {
            bag.extend_from_slice(&self.contents);
        }
        for i in (1..bag.len()).rev() {
            self.seed = (rnd(self.seed) * MAX_SAFE_INTEGER).floor();
            let swap = (self.seed as u64 % (i as u64 + 1)) as usize;
            bag.swap(i, swap);
        }
        self.bag = bag;
        self.bag.reverse();
    }

    pub fn draw(&mut self) -> Option<char> {
        if self.bag.is_empty() {
            self.fill();
        }
        self.bag.pop()
    }
}

/// Fills the starting grid, drawing path cells from one bag per path.
pub struct WorldBuilder {
    paths: [RndBag; 3],
}

impl Default for WorldBuilder {
    fn default() -> Self {
        // Bags are seeded in this order: path 1, path 3, path 2.
        let path1 = RndBag::new("$ra", 3, 260.0);
        let path3 = RndBag::new("c$prla", 3, 365.0);
        let path2 = RndBag::new("cpl", 3, 52.0);
        Self { paths: [path1, path2, path3] }
    }
}

impl WorldBuilder {
    pub fn kind_at(&mut self, x: u32, y: u32) -> CellKind {
        let c = WORLD
            .get(y as usize)
            .and_then(|row| row.chars().nth(x as usize))
            .unwrap_or('.');
        let c = match c.to_digit(10) {
            Some(path @ 1..=3) => self.paths[path as usize - 1].draw().unwrap_or('.'),
            _ => c,
        };
        kind_for_char(c).unwrap_or(CellKind::None)
    }

    pub fn build(mut self) -> Grid {
        Grid::new(GRID_SIZE, |p| CellObject::new(self.kind_at(p.x, p.y), p.dist()))
    }
}

pub fn generate() -> Grid {
    WorldBuilder::default().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_shape() {
        assert!(WORLD.iter().all(|row| row.len() == 32));
        assert!(WORLD.iter().flat_map(|r| r.chars()).all(|c| c.is_ascii_digit() || kind_for_char(c).is_some()));
    }

    #[test]
    fn bags_hand_out_every_item_before_refilling() {
        let mut bag = RndBag::new("cpl", 3, 52.0);
        let mut first: Vec<char> = (0..9).filter_map(|_| bag.draw()).collect();
        first.sort_unstable();
        assert_eq!(first.iter().collect::<String>(), "ccclllppp");
        assert!(bag.draw().is_some());
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate();
        let b = generate();
        let kinds = |g: &Grid| g.cells.iter().map(|c| c.content.kind()).collect::<Vec<_>>();
        assert_eq!(kinds(&a), kinds(&b));
        assert_eq!(a.cells[0].content.kind(), CellKind::Info);
        assert_eq!(a.cells[31 + 31 * 32].content.kind(), CellKind::Snail);
        assert_eq!(a.cells[7 + 7 * 32].content.kind(), CellKind::Spawn);
    }

    #[test]
    fn lore_lookup() {
        assert_eq!(lore_for_cell(0), Some(0));
        assert_eq!(lore_for_cell(31 + 31 * 32), Some(26));
        assert_eq!(lore_for_cell(1), None);
    }
}
