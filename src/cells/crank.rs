//! Hand-crank power economy: a crank with momentum charges a battery bank,
//! power is spent crafting scrap and batteries, and a CPU slowly turns a
//! steady power drain into upgrades.

use serde::{Deserialize, Serialize};

use super::CellBehavior;
use super::obstacle::{Accumulator, Aggregate, Press};
use crate::model::{ACTIVE_FACTOR, Contribution, Reward, STRENGTH_DIST_FACTOR, reward_scale};
use crate::persistence::inf;
use crate::util::{RoundType, format_value};

const CRANK_MASS: f64 = 1000.0;
const CRANK_FRICTION: f64 = 0.0005;
const CRANK_POWER: f64 = 0.1;
const METAL_RATE: f64 = 10.0;
const BATTERY_RATE: f64 = 10.0;
const COMP_RATE: f64 = 1.0;

pub const METAL_COST: f64 = 5.0;
pub const METAL_BOOST_COST: f64 = 1.0;
pub const BATTERY_METAL_COST: u32 = 10;
pub const BATTERY_POWER_COST: f64 = 10.0;
pub const BATTERY_BOOST_METAL_COST: u32 = 1;
/// Percent added to a running craft by a boost click.
pub const BOOST_PERCENT: f64 = 25.0;

/// What the CPU is currently upgrading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompTarget {
    #[default]
    Crank,
    Scrap,
    Battery,
    /// Burns power without an upgrade. Not selectable.
    Heat,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrankState {
    /// Scrap craft progress in percent.
    pub metal: Accumulator,
    pub metal_count: u32,
    pub metal_queue: u32,
    pub metal_queue_max: u32,
    /// Battery craft progress in percent.
    pub battery: Accumulator,
    pub battery_count: u32,
    pub battery_queue: u32,
    pub battery_queue_max: u32,
    pub comp_power: u32,
    pub comp_power_max: u32,
    pub comp_target: CompTarget,
    #[serde(with = "inf")]
    pub comp_progress: f64,
    #[serde(with = "inf")]
    pub last_update: f64,
    #[serde(with = "inf")]
    pub power_level: f64,
    #[serde(with = "inf")]
    pub total_power: f64,
    pub crank_levels: u32,
    pub scrap_levels: u32,
    pub battery_levels: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CrankButton {
    Metal,
    Battery,
    Cpu,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrankCommand {
    /// Crank handle grabbed: applies force every tick until released.
    Grab,
    Release,
    Click(CrankButton),
    Press(CrankButton),
    ReleaseButton,
    SetMetalQueue(u32),
    SetBatteryQueue(u32),
    SetCompPower(u32),
    SetCompTarget(CompTarget),
}

#[derive(Clone, Debug)]
pub struct Crank {
    pub dist: u32,
    pub state: CrankState,
    power: Aggregate,
    pub percent: f64,
    pub velocity: f64,
    pub angle: f64,
    force: f64,
    pub metal_progress: f64,
    pub battery_progress: f64,
    pressed: Option<Press<CrankButton>>,
}

impl Crank {
    pub fn new(dist: u32) -> Self {
        Self {
            dist,
            state: CrankState {
                metal: Accumulator::idle(),
                metal_count: 0,
                metal_queue: 0,
                metal_queue_max: 3,
                battery: Accumulator::idle(),
                battery_count: 0,
                battery_queue: 0,
                battery_queue_max: 3,
                comp_power: 0,
                comp_power_max: 0,
                comp_target: CompTarget::Crank,
                comp_progress: 0.0,
                last_update: f64::INFINITY,
                power_level: 0.0,
                total_power: 0.0,
                crank_levels: 0,
                scrap_levels: 0,
                battery_levels: 0,
            },
            power: Aggregate::default(),
            percent: 100.0,
            velocity: 0.0,
            angle: 0.0,
            force: 0.0,
            metal_progress: 0.0,
            battery_progress: 0.0,
            pressed: None,
        }
    }

    pub fn base_strength(&self) -> f64 {
        ACTIVE_FACTOR * 10.0 * STRENGTH_DIST_FACTOR.powi(self.dist as i32)
    }

    pub fn power(&self) -> &Aggregate {
        &self.power
    }

    pub fn max_velocity(&self) -> f64 {
        let levels = self.state.crank_levels as f64;
        0.1 * levels + 0.1 * 1.00105f64.powf(levels)
    }

    pub fn power_max(&self) -> f64 {
        let batteries = self.state.battery_count as f64;
        batteries * 10.0 + 100.0 * 1.02f64.powf(batteries)
    }

    pub fn comp_target_cost(&self) -> f64 {
        let levels = match self.state.comp_target {
            CompTarget::Crank => self.state.crank_levels,
            CompTarget::Scrap => self.state.scrap_levels,
            CompTarget::Battery => self.state.battery_levels,
            CompTarget::Heat => 0,
        };
        100.0 + 50.0 * levels as f64
    }

    pub fn cpu_upgrade_cost(&self) -> u32 {
        15 + 5 * self.state.comp_power_max
    }

    /// Start a scrap craft, or boost the running one.
    pub fn metal_click(&mut self, now: f64) -> bool {
        let s = &mut self.state;
        if !s.metal.is_running() && s.power_level >= METAL_COST {
            s.power_level -= METAL_COST;
            s.metal.begin(now);
            true
        } else if s.metal.is_running() && s.power_level >= METAL_BOOST_COST {
            s.power_level -= METAL_BOOST_COST;
            s.metal.previous_progress += BOOST_PERCENT;
            true
        } else {
            false
        }
    }

    /// Start a battery craft, or boost the running one with scrap.
    pub fn battery_click(&mut self, now: f64) -> bool {
        let s = &mut self.state;
        if !s.battery.is_running() && s.power_level >= BATTERY_POWER_COST && s.metal_count >= BATTERY_METAL_COST {
            s.power_level -= BATTERY_POWER_COST;
            s.metal_count -= BATTERY_METAL_COST;
            s.battery.begin(now);
            true
        } else if s.battery.is_running() && s.metal_count >= BATTERY_BOOST_METAL_COST {
            s.metal_count -= BATTERY_BOOST_METAL_COST;
            s.battery.previous_progress += BOOST_PERCENT;
            true
        } else {
            false
        }
    }

    pub fn cpu_click(&mut self) -> bool {
        let cost = self.cpu_upgrade_cost();
        if self.state.metal_count < cost {
            return false;
        }
        self.state.metal_count -= cost;
        self.state.comp_power_max += 1;
        true
    }

    fn click(&mut self, button: CrankButton, now: f64) -> bool {
        match button {
            CrankButton::Metal => self.metal_click(now),
            CrankButton::Battery => self.battery_click(now),
            CrankButton::Cpu => self.cpu_click(),
        }
    }

    pub fn set_comp_target(&mut self, target: CompTarget) -> bool {
        if target == CompTarget::Heat {
            return false;
        }
        self.state.comp_target = target;
        self.state.comp_progress = 0.0;
        true
    }

    pub fn command(&mut self, command: CrankCommand, now: f64) -> bool {
        match command {
            CrankCommand::Grab => {
                self.force = 1.0;
                true
            }
            CrankCommand::Release => {
                self.force = 0.0;
                true
            }
            CrankCommand::Click(button) => self.click(button, now),
            CrankCommand::Press(button) => {
                self.pressed = Some(Press::new(button, now));
                true
            }
            CrankCommand::ReleaseButton => match self.pressed.take() {
                Some(press) if press.is_click(now) => self.click(press.target, now),
                _ => false,
            },
            CrankCommand::SetMetalQueue(n) if n <= self.state.metal_queue_max => {
                self.state.metal_queue = n;
                true
            }
            CrankCommand::SetBatteryQueue(n) if n <= self.state.battery_queue_max => {
                self.state.battery_queue = n;
                true
            }
            CrankCommand::SetCompPower(n) if n <= self.state.comp_power_max => {
                self.state.comp_power = n;
                true
            }
            CrankCommand::SetCompTarget(target) => self.set_comp_target(target),
            _ => false,
        }
    }

    pub fn release_all(&mut self) {
        self.force = 0.0;
        self.pressed = None;
    }

    fn finish_comp_upgrade(&mut self) {
        let s = &mut self.state;
        match s.comp_target {
            CompTarget::Crank => s.crank_levels += 1,
            CompTarget::Scrap => {
                s.scrap_levels += 1;
                s.metal_queue_max += 1;
            }
            CompTarget::Battery => {
                s.battery_levels += 1;
                s.battery_queue_max += 1;
            }
            CompTarget::Heat => {}
        }
        s.comp_progress = 0.0;
    }

    fn run_queues(&mut self, now: f64) {
        let s = &mut self.state;
        if !s.metal.is_running() && s.power_level >= METAL_COST && s.metal_queue > 0 {
            s.power_level -= METAL_COST;
            s.metal.begin(now);
            s.metal_queue -= 1;
        }
        if !s.battery.is_running()
            && s.power_level >= BATTERY_POWER_COST
            && s.metal_count >= BATTERY_METAL_COST
            && s.battery_queue > 0
        {
            s.power_level -= BATTERY_POWER_COST;
            s.metal_count -= BATTERY_METAL_COST;
            s.battery.begin(now);
            s.battery_queue -= 1;
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "Power {} / {} (total {} of {})\nScrap {} ({:.0}%) Batteries {} ({:.0}%)\nCPU {}/{} on {:?} {:.0}%",
            format_value(self.state.power_level, RoundType::Floor, "", ""),
            format_value(self.power_max(), RoundType::Floor, "", ""),
            format_value(self.state.total_power, RoundType::Floor, "", ""),
            format_value(self.base_strength(), RoundType::Ceil, "", ""),
            self.state.metal_count,
            self.metal_progress,
            self.state.battery_count,
            self.battery_progress,
            self.state.comp_power,
            self.state.comp_power_max,
            self.state.comp_target,
            self.state.comp_progress
        )
    }
}

impl CellBehavior for Crank {
    type State = CrankState;

    fn state(&self) -> &CrankState {
        &self.state
    }

    fn restore(&mut self, state: CrankState) {
        self.state = state;
    }

    fn update(&mut self, now: f64, neighbors: &[Contribution]) -> Option<Reward> {
        self.power.update(self.dist, neighbors);
        let t = self.power.t();
        let dt = (now - self.state.last_update).max(0.0);

        if let Some(press) = self.pressed {
            if press.is_repeating(now) {
                self.click(press.target, now);
            }
        }

        let power_max = self.power_max();
        let vmax = self.max_velocity();
        let comp_cost = self.comp_target_cost();

        if self.power.t_changed() {
            let last_t = self.power.last_t();
            self.state.metal.rebase(now, last_t * METAL_RATE);
            self.state.battery.rebase(now, last_t * BATTERY_RATE);
        }

        let s = &mut self.state;
        let comp_power = s.comp_power as f64;
        let leak = (dt - 0.05 * s.crank_levels as f64).max(0.0);
        let comp_leak = match s.comp_target {
            CompTarget::Heat if s.comp_power > 0 => dt,
            CompTarget::Heat => 0.0,
            _ => comp_power * dt,
        };

        self.velocity = (self.velocity + t * self.force / CRANK_MASS - CRANK_FRICTION).clamp(0.0, vmax);
        self.angle += self.velocity;

        let before = s.power_level;
        s.power_level = (s.power_level + t * self.velocity * CRANK_POWER / 0.1 - leak).clamp(0.0, power_max);
        s.total_power += (s.power_level - before).max(0.0);

        let comp_gain = dt * t * COMP_RATE * comp_power * 100.0 / comp_cost;
        if s.comp_target == CompTarget::Heat {
            s.power_level -= comp_leak.min(s.power_level);
            s.comp_progress += comp_gain;
        } else if s.power_level >= comp_leak {
            s.power_level -= comp_leak;
            s.comp_progress += comp_gain;
        }

        let metal = s.metal.progress(now, t * METAL_RATE);
        if metal >= 100.0 {
            s.metal.stop();
            s.metal_count += 1;
            self.metal_progress = 0.0;
        } else {
            self.metal_progress = metal;
        }

        let battery = s.battery.progress(now, t * BATTERY_RATE);
        if battery >= 100.0 {
            s.battery.stop();
            s.battery_count += 1;
            self.battery_progress = 0.0;
        } else {
            self.battery_progress = battery;
        }

        if self.state.comp_progress >= 100.0 {
            self.finish_comp_upgrade();
        }
        self.run_queues(now);

        self.percent = 100.0 * (1.0 - self.state.total_power / self.base_strength());
        if self.state.total_power > self.base_strength() {
            return Some(Reward::tpoints(reward_scale(self.dist)));
        }
        self.state.last_update = now;
        None
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
    fn cranking_builds_momentum_and_power() {
        let mut crank = Crank::new(10);
        crank.command(CrankCommand::Grab, 0.0);
        let mut now = 0.0;
        for _ in 0..200 {
            now += 0.01;
            crank.update(now, &[spot(10.0)]);
        }
        assert!(crank.velocity > 0.0);
        assert!(crank.velocity <= crank.max_velocity());
        assert!(crank.state.total_power > 0.0);
        assert!(crank.state.power_level <= crank.power_max());
    }

    #[test]
    fn released_crank_slows_down() {
        let mut crank = Crank::new(10);
        crank.velocity = 0.05;
        crank.update(0.0, &[spot(1.0)]);
        assert!(crank.velocity < 0.05);
    }

    #[test]
    fn scrap_craft_costs_power_and_completes() {
        let mut crank = Crank::new(10);
        crank.update(0.0, &[spot(1.0)]);
        assert!(!crank.metal_click(0.0));
        crank.state.power_level = 6.0;
        assert!(crank.metal_click(0.0));
        assert_eq!(crank.state.power_level, 1.0);
        assert!(crank.metal_click(0.0));
        assert_eq!(crank.state.metal.previous_progress, BOOST_PERCENT);
        let rate = 0.95f64.powi(6) * METAL_RATE;
        crank.update(75.0 / rate + 0.01, &[spot(1.0)]);
        assert_eq!(crank.state.metal_count, 1);
        assert!(!crank.state.metal.is_running());
    }

    #[test]
    fn battery_needs_scrap() {
        let mut crank = Crank::new(10);
        crank.state.power_level = 50.0;
        assert!(!crank.battery_click(0.0));
        crank.state.metal_count = 10;
        assert!(crank.battery_click(0.0));
        assert_eq!(crank.state.metal_count, 0);
        assert_eq!(crank.state.power_level, 40.0);
    }

    #[test]
    fn cpu_upgrade_and_sliders_are_capped() {
        let mut crank = Crank::new(10);
        assert!(!crank.command(CrankCommand::SetCompPower(1), 0.0));
        crank.state.metal_count = 20;
        assert!(crank.cpu_click());
        assert_eq!(crank.state.metal_count, 5);
        assert_eq!(crank.cpu_upgrade_cost(), 20);
        assert!(crank.command(CrankCommand::SetCompPower(1), 0.0));
        assert!(!crank.command(CrankCommand::SetMetalQueue(4), 0.0));
        assert!(crank.command(CrankCommand::SetMetalQueue(3), 0.0));
    }

    #[test]
    fn heat_target_is_not_selectable() {
        let mut crank = Crank::new(10);
        assert!(!crank.set_comp_target(CompTarget::Heat));
        assert!(crank.set_comp_target(CompTarget::Scrap));
        assert_eq!(crank.comp_target_cost(), 100.0);
    }

    #[test]
    fn scrap_upgrade_raises_queue_cap() {
        let mut crank = Crank::new(10);
        crank.set_comp_target(CompTarget::Scrap);
        crank.state.comp_progress = 100.0;
        crank.update(0.0, &[]);
        assert_eq!(crank.state.scrap_levels, 1);
        assert_eq!(crank.state.metal_queue_max, 4);
    }

    #[test]
    fn queue_starts_crafts_automatically() {
        let mut crank = Crank::new(10);
        crank.state.metal_queue = 2;
        crank.state.power_level = 20.0;
        crank.update(0.0, &[]);
        assert!(crank.state.metal.is_running());
        assert_eq!(crank.state.metal_queue, 1);
        assert_eq!(crank.state.power_level, 15.0);
    }

    #[test]
    fn falls_once_enough_power_was_generated() {
        let mut crank = Crank::new(0);
        crank.state.total_power = crank.base_strength() + 1.0;
        assert!(crank.update(0.0, &[]).is_some());
    }
}
