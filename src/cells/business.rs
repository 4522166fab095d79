//! Lemonade-stand style obstacle: five production lines that earn cash when
//! their timers finish. The obstacle falls once enough cash is banked.

use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate, Press};
use crate::model::{ACTIVE_FACTOR, Contribution, Reward, STRENGTH_DIST_FACTOR, reward_scale};
use crate::persistence::inf;
use crate::util::{RoundType, format_currency, format_hms, round_to_val};

/// Owning this many of a line halves its duration once more.
pub const DURATION_MILESTONES: [u32; 12] = [25, 50, 100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusinessLine {
    Limeade,
    Spam,
    DogWash,
    Taco,
    Cupcake,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineInfo {
    pub name: &'static str,
    pub price_base: f64,
    pub price_factor: f64,
    pub revenue: f64,
    /// Work needed per cycle, in tick-power seconds.
    pub duration: f64,
}

const LINE_INFO: [LineInfo; 5] = [
    LineInfo { name: "Limeade", price_base: 4.0, price_factor: 1.17, revenue: 1.0, duration: 1.0 },
    LineInfo { name: "Spam", price_base: 240.0, price_factor: 1.17, revenue: 60.0, duration: 5e2 },
    LineInfo { name: "Dog Wash", price_base: 19200.0, price_factor: 1.17, revenue: 5.4e4, duration: 1e5 },
    LineInfo { name: "Taco", price_base: 1920000.0, price_factor: 1.17, revenue: 5.4e7, duration: 2e7 },
    LineInfo { name: "Cupcake", price_base: 230400000.0, price_factor: 1.17, revenue: 8.1e10, duration: 4e9 },
];

impl BusinessLine {
    pub const ALL: [BusinessLine; 5] = [
        BusinessLine::Limeade,
        BusinessLine::Spam,
        BusinessLine::DogWash,
        BusinessLine::Taco,
        BusinessLine::Cupcake,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn info(self) -> &'static LineInfo {
        &LINE_INFO[self.index()]
    }
}

/// Cost of buying `count` more units of `line` when `owned` are already owned.
/// The very first limeade stand is free.
pub fn price(line: BusinessLine, owned: u32, count: u32) -> f64 {
    if line == BusinessLine::Limeade && owned == 0 && count == 1 {
        return 0.0;
    }
    let LineInfo { price_base, price_factor: f, .. } = *line.info();
    let total = price_base * (f.powi((owned + count) as i32) - f.powi(owned as i32)) / (f - 1.0);
    round_to_val(total, RoundType::Round, 0.01)
}

/// Halved once for every milestone reached.
pub fn duration_factor(owned: u32) -> f64 {
    let reached = DURATION_MILESTONES.iter().take_while(|&&m| owned >= m).count();
    0.5f64.powi(reached as i32)
}

pub fn next_milestone(owned: u32) -> Option<u32> {
    DURATION_MILESTONES.iter().copied().find(|&m| owned < m)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelState {
    pub count: u32,
    /// Work done on the current cycle.
    pub progress: Accumulator,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessState {
    #[serde(with = "inf")]
    pub cash: f64,
    pub levels: [LevelState; 5],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BusinessCommand {
    Start(BusinessLine),
    Buy(BusinessLine),
    /// Start button held down: restart the line whenever it is idle.
    PressStart(BusinessLine),
    ReleaseStart,
    /// Buy button held down: buys repeatedly after the hold delay.
    PressBuy(BusinessLine),
    /// A release before the hold delay counts as a single click.
    ReleaseBuy,
}

#[derive(Clone, Debug)]
pub struct Business {
    pub dist: u32,
    pub state: BusinessState,
    power: Aggregate,
    pub percent: f64,
    pub line_percent: [f64; 5],
    pub line_time_remaining: [f64; 5],
    start_held: Option<BusinessLine>,
    buy_held: Option<Press<BusinessLine>>,
}

impl Business {
    pub fn new(dist: u32) -> Self {
        let idle = LevelState { count: 0, progress: Accumulator::idle() };
        Self {
            dist,
            state: BusinessState {
                cash: 0.0,
                levels: [idle.clone(), idle.clone(), idle.clone(), idle.clone(), idle],
            },
            power: Aggregate::default(),
            percent: 100.0,
            line_percent: [0.0; 5],
            line_time_remaining: [f64::INFINITY; 5],
            start_held: None,
            buy_held: None,
        }
    }

    pub fn base_strength(&self) -> f64 {
        round_to_val(ACTIVE_FACTOR * 100.0 * STRENGTH_DIST_FACTOR.powi(self.dist as i32), RoundType::Round, 0.01)
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn level(&self, line: BusinessLine) -> &LevelState {
        &self.state.levels[line.index()]
    }

    pub fn price_of_next(&self, line: BusinessLine) -> f64 {
        price(line, self.level(line).count, 1)
    }

    pub fn can_start(&self, line: BusinessLine) -> bool {
        let level = self.level(line);
        level.count > 0 && !level.progress.is_running() && self.power.t() > 0.0
    }

    pub fn start_line(&mut self, line: BusinessLine, now: f64) -> bool {
        if !self.can_start(line) {
            return false;
        }
        self.state.levels[line.index()].progress.restart(now);
        true
    }

    pub fn buy(&mut self, line: BusinessLine) -> bool {
        let cost = self.price_of_next(line);
        if self.state.cash < cost {
            return false;
        }
        self.state.cash -= cost;
        self.state.levels[line.index()].count += 1;
        true
    }

    pub fn command(&mut self, command: BusinessCommand, now: f64) -> bool {
        match command {
            BusinessCommand::Start(line) => self.start_line(line, now),
            BusinessCommand::Buy(line) => self.buy(line),
            BusinessCommand::PressStart(line) => {
                self.start_held = Some(line);
                self.start_line(line, now);
                true
            }
            BusinessCommand::ReleaseStart => {
                self.start_held = None;
                true
            }
            BusinessCommand::PressBuy(line) => {
                self.buy_held = Some(Press::new(line, now));
                true
            }
            BusinessCommand::ReleaseBuy => match self.buy_held.take() {
                Some(press) if press.is_click(now) => self.buy(press.target),
                _ => false,
            },
        }
    }

    /// Drop any held buttons, e.g. when the panel closes.
    pub fn release_all(&mut self) {
        self.start_held = None;
        self.buy_held = None;
    }

    pub fn describe(&self) -> String {
        let lines: Vec<String> = BusinessLine::ALL
            .iter()
            .map(|&line| {
                let i = line.index();
                format!(
                    "{} x{} ({:.0}%, {}) next {}",
                    line.info().name,
                    self.state.levels[i].count,
                    self.line_percent[i],
                    format_hms(self.line_time_remaining[i]),
                    format_currency(self.price_of_next(line), RoundType::Round)
                )
            })
            .collect();
        format!("Cash {} / {}\n{}", format_currency(self.state.cash, RoundType::Floor), format_currency(self.base_strength(), RoundType::Round), lines.join("\n"))
    }
}

impl CellBehavior for Business {
    type State = BusinessState;

    fn state(&self) -> &BusinessState {
        &self.state
    }

    fn restore(&mut self, state: BusinessState) {
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);

        if let Some(line) = self.start_held {
            self.start_line(line, now);
        }
        if let Some(press) = self.buy_held {
            if press.is_repeating(now) {
                self.buy(press.target);
            }
        }

        let t = self.power.t();
        let last_t = self.power.last_t();
        let changed = self.power.t_changed();
        for line in BusinessLine::ALL {
            let i = line.index();
            let info = line.info();
            let level = &mut self.state.levels[i];
            if changed {
                level.progress.rebase(now, last_t);
            }
            let required = info.duration * duration_factor(level.count);
            let work = level.progress.progress(now, t);

            if level.progress.is_running() && work >= required {
                level.progress.stop();
                self.state.cash += info.revenue * level.count as f64;
                self.line_percent[i] = 0.0;
                self.line_time_remaining[i] = required / t;
            } else {
                self.line_percent[i] = 100.0 * (work / required).min(1.0);
                self.line_time_remaining[i] = (required - work).max(0.0) / t;
            }
        }

        self.percent = 100.0 * (1.0 - self.state.cash / self.base_strength());
        (self.percent <= 0.0).then(|| Reward::tpoints(reward_scale(self.dist)))
    }

    fn percent(&self) -> f64 {
        self.percent
    }
}
