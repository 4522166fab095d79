use pptop::cells::anti::{Anti, AntiCommand, BuySize, DIMENSIONS};
use pptop::cells::business::{Business, BusinessCommand, BusinessLine};
use pptop::cells::crank::{CompTarget, Crank, CrankButton, CrankCommand};
use pptop::cells::lawn::{FIELDS, Lawn, LawnCommand, LawnUpgrade};
use pptop::cells::prestige::{Prestige, TIER_COUNT, TIERS};
use pptop::cells::snail::{CellProgress, ROW_COUNT, Snail, SnailCommand};
use pptop::util::{RoundType, format_currency, format_hms, format_value};
use pptop::{CellCommand, GameAction};
use yew::prelude::*;

const BTN_STYLE: &str = "padding:2px 8px; font-size:12px;";

fn send(on_action: &Callback<GameAction>, at: usize, command: CellCommand) -> Callback<MouseEvent> {
    let cb = on_action.clone();
    Callback::from(move |_| cb.emit(GameAction::Command { at, command }))
}

fn button(label: String, enabled: bool, onclick: Callback<MouseEvent>) -> Html {
    html! { <button style={BTN_STYLE} disabled={!enabled} {onclick}>{ label }</button> }
}

fn bar(percent: f64, color: &str) -> Html {
    html! {
        <div style="flex:1; height:8px; background:#21262d; border-radius:4px; overflow:hidden;">
            <div style={format!("height:100%; width:{:.1}%; background:{};", percent.clamp(0.0, 100.0), color)}></div>
        </div>
    }
}

fn short(value: f64) -> String {
    format_value(value, RoundType::Floor, "", "")
}

pub fn business_view(b: &Business, at: usize, on_action: &Callback<GameAction>) -> Html {
    let rows = BusinessLine::ALL.iter().map(|&line| {
        let info = line.info();
        let level = b.level(line);
        let price = b.price_of_next(line);
        let i = line.index();
        let press_start = send(on_action, at, CellCommand::Business(BusinessCommand::PressStart(line)));
        let press_buy = send(on_action, at, CellCommand::Business(BusinessCommand::PressBuy(line)));
        let release_start = send(on_action, at, CellCommand::Business(BusinessCommand::ReleaseStart));
        let release_buy = send(on_action, at, CellCommand::Business(BusinessCommand::ReleaseBuy));
        html! {
            <div style="display:flex; align-items:center; gap:6px;">
                <button style={BTN_STYLE} disabled={!b.can_start(line)} onmousedown={press_start} onmouseup={release_start}>
                    { format!("{} x{}", info.name, level.count) }
                </button>
                { bar(b.line_percent[i], "#3fb950") }
                <span style="min-width:60px; text-align:right;">{ format_hms(b.line_time_remaining[i]) }</span>
                <button style={BTN_STYLE} disabled={price > b.state.cash} onmousedown={press_buy} onmouseup={release_buy}>
                    { format!("Buy {}", format_currency(price, RoundType::Ceil)) }
                </button>
            </div>
        }
    });
    html! {
        <div style="display:flex; flex-direction:column; gap:4px;">
            <div>{ format!("Cash: {}", format_currency(b.state.cash, RoundType::Floor)) }</div>
            { for rows }
        </div>
    }
}

pub fn prestige_view(p: &Prestige, at: usize, now: f64, on_action: &Callback<GameAction>) -> Html {
    let rows = (0..TIER_COUNT).map(|tier| {
        let (numeral, name) = TIERS[tier];
        let need = if tier == 0 {
            format!("{} coins", short(p.requirement(0)))
        } else {
            format!("{} x {}", short(p.requirement(tier)), TIERS[tier - 1].1)
        };
        html! {
            <div style="display:flex; align-items:center; gap:6px;">
                <span style="min-width:26px;">{ numeral }</span>
                { button(name.to_string(), p.can_activate(tier, now), send(on_action, at, CellCommand::Prestige(tier))) }
                <span style="flex:1; text-align:right;">{ format!("have {}, need {}", p.state.prestiges[tier], need) }</span>
            </div>
        }
    });
    html! {
        <div style="display:flex; flex-direction:column; gap:4px;">
            <div>{ format!("Coins: {}  (x{} gain)", short(p.coins_at(now)), short(p.gain())) }</div>
            { for rows }
        </div>
    }
}

pub fn crank_view(c: &Crank, at: usize, on_action: &Callback<GameAction>) -> Html {
    let s = &c.state;
    let crank = |command: CrankCommand| send(on_action, at, CellCommand::Crank(command));
    let held = |btn: CrankButton| {
        let press = crank(CrankCommand::Press(btn));
        let release = crank(CrankCommand::ReleaseButton);
        (press, release)
    };
    let (metal_down, metal_up) = held(CrankButton::Metal);
    let (battery_down, battery_up) = held(CrankButton::Battery);
    let (cpu_down, cpu_up) = held(CrankButton::Cpu);
    let stepper = |label: &str, value: u32, max: u32, make: fn(u32) -> CrankCommand| {
        html! {
            <div style="display:flex; align-items:center; gap:4px;">
                <span style="min-width:70px;">{ label }</span>
                { button("-".to_string(), value > 0, crank(make(value.saturating_sub(1)))) }
                <span>{ format!("{}/{}", value, max) }</span>
                { button("+".to_string(), value < max, crank(make(value + 1))) }
            </div>
        }
    };
    let targets = [CompTarget::Crank, CompTarget::Scrap, CompTarget::Battery].map(|target| {
        let label = format!("{:?}", target);
        let active = s.comp_target == target;
        html! {
            <button style={format!("{} {}", BTN_STYLE, if active { "border:1px solid #58a6ff;" } else { "" })}
                onclick={crank(CrankCommand::SetCompTarget(target))}>{ label }</button>
        }
    });
    html! {
        <div style="display:flex; flex-direction:column; gap:6px;">
            <div style="display:flex; align-items:center; gap:6px;">
                <button style={BTN_STYLE} onmousedown={crank(CrankCommand::Grab)} onmouseup={crank(CrankCommand::Release)}>{"Crank"}</button>
                { bar(100.0 * s.power_level / c.power_max().max(1.0), "#d29922") }
                <span>{ format!("{:.2} rpm", c.velocity) }</span>
            </div>
            <div style="display:flex; align-items:center; gap:6px;">
                <button style={BTN_STYLE} onmousedown={metal_down} onmouseup={metal_up}>{ format!("Scrap ({})", s.metal_count) }</button>
                { bar(c.metal_progress, "#8b949e") }
            </div>
            <div style="display:flex; align-items:center; gap:6px;">
                <button style={BTN_STYLE} onmousedown={battery_down} onmouseup={battery_up}>{ format!("Battery ({})", s.battery_count) }</button>
                { bar(c.battery_progress, "#3fb950") }
            </div>
            { stepper("Scrap queue", s.metal_queue, s.metal_queue_max, CrankCommand::SetMetalQueue) }
            { stepper("Battery queue", s.battery_queue, s.battery_queue_max, CrankCommand::SetBatteryQueue) }
            { stepper("CPU", s.comp_power, s.comp_power_max, CrankCommand::SetCompPower) }
            <div style="display:flex; align-items:center; gap:4px;">
                <button style={BTN_STYLE} onmousedown={cpu_down} onmouseup={cpu_up}>
                    { format!("CPU upgrade ({} scrap)", c.cpu_upgrade_cost()) }
                </button>
                { for targets }
            </div>
            <div>{ format!("Upgrade progress: {} / {}", short(s.comp_progress), short(c.comp_target_cost())) }</div>
        </div>
    }
}

fn upgrade_label(upgrade: LawnUpgrade) -> &'static str {
    match upgrade {
        LawnUpgrade::TickRate => "Tick rate",
        LawnUpgrade::GrowthRate => "Growth rate",
        LawnUpgrade::MachineSpeed => "Machine speed",
        LawnUpgrade::MachineSize => "Machine size",
        LawnUpgrade::TileSize => "Tile size",
    }
}

pub fn lawn_view(l: &Lawn, at: usize, on_action: &Callback<GameAction>) -> Html {
    let lawn = |command: LawnCommand| send(on_action, at, CellCommand::Lawn(command));
    let field = l.field();
    let info = l.field_info();
    let tiles = match &l.tiles {
        Some(tiles) => {
            let px = 160 / tiles.side.max(1);
            let cells = (0..tiles.side).flat_map(|y| (0..tiles.side).map(move |x| (x, y))).map(|(x, y)| {
                let (r, g, b) = l.tile_color(tiles.height(x, y));
                html! { <div style={format!("width:{px}px; height:{px}px; background:rgb({r},{g},{b});")}></div> }
            });
            html! {
                <div style={format!("display:grid; grid-template-columns:repeat({}, {}px); border:1px solid {};", tiles.side, px, info.machine_color)}>
                    { for cells }
                </div>
            }
        }
        None => html! {},
    };
    let upgrades = LawnUpgrade::ALL.iter().map(|&upgrade| {
        let price = l.upgrade_price(upgrade);
        button(
            format!("{} ({})", upgrade_label(upgrade), format_currency(price, RoundType::Ceil)),
            field.can_buy(upgrade) && price <= l.money,
            lawn(LawnCommand::BuyUpgrade(upgrade)),
        )
    });
    let next = l.state.highest_unlock + 1;
    let unlock = match FIELDS.get(next) {
        Some(next_info) => button(
            format!("Unlock {} ({})", next_info.name, format_currency(next_info.unlock_price, RoundType::Ceil)),
            next_info.unlock_price <= l.money,
            lawn(LawnCommand::UnlockField),
        ),
        None => html! {},
    };
    html! {
        <div style="display:flex; flex-direction:column; gap:6px;">
            <div style="display:flex; align-items:center; gap:6px;">
                { button("<".to_string(), l.state.display_field > 0, lawn(LawnCommand::PrevField)) }
                <span style="flex:1; text-align:center;">{ format!("{} ({})", info.name, info.machine_name) }</span>
                { button(">".to_string(), l.state.display_field < l.state.highest_unlock, lawn(LawnCommand::NextField)) }
            </div>
            { tiles }
            <div>{ format!("Money: {} (+{}/s)", format_currency(l.money, RoundType::Floor), format_currency(l.rate, RoundType::Floor)) }</div>
            <div style="display:flex; flex-wrap:wrap; gap:4px;">{ for upgrades }</div>
            <div style="display:flex; flex-wrap:wrap; gap:4px;">
                { unlock }
                { button(format!("Mulch +{}", short(l.next_mulch())), l.next_mulch() > 0.0, lawn(LawnCommand::Prestige)) }
            </div>
        </div>
    }
}

pub fn anti_view(a: &Anti, at: usize, on_action: &Callback<GameAction>) -> Html {
    let anti = |command: AntiCommand| send(on_action, at, CellCommand::Anti(command));
    let unlocked = (a.state.max_dim_unlocked + 1).min(DIMENSIONS);
    let rows = (0..unlocked).map(|i| {
        let cost = match a.buy_size {
            BuySize::One => a.dim_cost(i),
            BuySize::UntilTen => a.dim_cost(i) * a.until_10_size(i) as f64,
        };
        html! {
            <div style="display:flex; align-items:center; gap:6px;">
                <span style="min-width:34px;">{ format!("D{}", i + 1) }</span>
                <span style="flex:1;">{ format!("{} ({})", short(a.dims[i]), a.state.bought_dims[i]) }</span>
                { button(format!("Cost {}", short(cost)), cost <= a.anti, anti(AntiCommand::BuyDimension(i))) }
            </div>
        }
    });
    let boost = a.boost_req();
    let galaxy = a.galaxy_req();
    let size_label = match a.buy_size {
        BuySize::One => "Buy 1",
        BuySize::UntilTen => "Until 10",
    };
    let has = |dim: usize, count: f64| a.state.bought_dims.get(dim).is_some_and(|&n| n as f64 >= count);
    html! {
        <div style="display:flex; flex-direction:column; gap:4px;">
            <div>{ format!("Antimatter: {} (+{}/s)", short(a.anti), short(a.rate)) }</div>
            <div style="display:flex; align-items:center; gap:6px;">
                <span style="flex:1;">{ format!("Tickspeed: {:.3}", a.tickspeed()) }</span>
                { button(format!("Cost {}", short(a.tickspeed_cost())), a.tickspeed_cost() <= a.anti, anti(AntiCommand::BuyTickspeed)) }
            </div>
            { for rows }
            <div style="display:flex; flex-wrap:wrap; gap:4px;">
                { button(size_label.to_string(), true, anti(AntiCommand::ToggleBuySize)) }
                { button("Max all".to_string(), true, anti(AntiCommand::BuyMax)) }
                { button(format!("Boost ({} D{})", boost.count, boost.dim + 1), has(boost.dim, boost.count), anti(AntiCommand::Boost)) }
                { button(format!("Galaxy ({} D8)", galaxy), has(DIMENSIONS - 1, galaxy), anti(AntiCommand::Galaxy)) }
            </div>
            <div>{ format!("Boosts {}  Galaxies {}", a.state.boosts, a.state.galaxies) }</div>
        </div>
    }
}

pub fn snail_view(s: &Snail, at: usize, now: f64, on_action: &Callback<GameAction>) -> Html {
    let rows = (0..ROW_COUNT).map(|row| {
        let cells = (0..=row).map(|col| {
            let (color, percent, title) = match s.progress(row, col, now) {
                CellProgress::Complete => ("#3fb950", 100.0, "complete".to_string()),
                CellProgress::Forward { percent, remaining } => ("#d29922", percent, format!("{} left", format_hms(remaining))),
                CellProgress::Reverse { percent, remaining } => ("#a371f7", percent, format!("{} to undo", format_hms(remaining))),
                CellProgress::Empty => ("#21262d", 0.0, "empty".to_string()),
            };
            let command = if s.is_complete(row, col) || matches!(s.progress(row, col, now), CellProgress::Forward { .. }) {
                SnailCommand::Reverse { row, col }
            } else {
                SnailCommand::Advance { row, col }
            };
            html! {
                <div title={title} onclick={send(on_action, at, CellCommand::Snail(command))}
                    style="width:9px; height:9px; background:#0d1117; border:1px solid #30363d; position:relative; cursor:pointer;">
                    <div style={format!("position:absolute; left:0; bottom:0; width:100%; height:{:.0}%; background:{};", percent, color)}></div>
                </div>
            }
        });
        html! { <div style="display:flex; justify-content:center; gap:1px;">{ for cells }</div> }
    });
    html! { <div style="display:flex; flex-direction:column; gap:1px;">{ for rows }</div> }
}
