use pptop::cells::build::{boss_cost, spot_cost};
use pptop::cells::spawn::{SpawnCommand, calendar};
use pptop::util::{RoundType, format_value};
use pptop::{CellCommand, CellObject, GameAction};
use yew::prelude::*;

use super::app::{AppState, now_secs};
use super::info_panel::InfoPanel;
use super::minigames;

#[derive(Properties, PartialEq, Clone)]
pub struct CellPanelProps {
    pub state: UseReducerHandle<AppState>,
    pub on_action: Callback<GameAction>,
    pub on_open_settings: Callback<()>,
}

const BTN_STYLE: &str = "padding:4px 10px; font-size:12px;";

fn action_button(label: &str, enabled: bool, on_action: &Callback<GameAction>, action: GameAction) -> Html {
    let cb = on_action.clone();
    html! {
        <button style={BTN_STYLE} disabled={!enabled} onclick={Callback::from(move |_| cb.emit(action))}>{ label }</button>
    }
}

#[function_component]
pub fn CellPanel(props: &CellPanelProps) -> Html {
    let Some(at) = props.state.selected else {
        return html! {};
    };
    let game = &props.state.game;
    let Some(cell) = game.grid.get(at) else {
        return html! {};
    };
    let now = now_secs();
    let on_action = &props.on_action;
    let kind = cell.content.kind();
    let header = format!("({},{}) - {}", cell.pos.x, cell.pos.y, kind.tag());
    let details = cell.content.describe(now, cell.pos.dist(), &game.points);
    let percent = cell.content.percent().clamp(0.0, 100.0);

    let controls = match &cell.content {
        CellObject::Wall(_) => action_button("Click", true, on_action, GameAction::Command { at, command: CellCommand::Click }),
        CellObject::Cheese(_) => action_button("Milk", true, on_action, GameAction::Command { at, command: CellCommand::Milk }),
        CellObject::Merge(m) => html! {
            <div style="display:flex; gap:6px;">
                { action_button("Merge SPOTs", m.preview.t_merge > 0.0, on_action, GameAction::MergeSpots { at }) }
                { action_button("Merge BOSSes", m.preview.d_merge > 0.0, on_action, GameAction::MergeBosses { at }) }
            </div>
        },
        CellObject::Build(_) => {
            let room = game.grid.first_empty_neighbor(at).is_some();
            let spot = spot_cost(&game.points);
            let boss = boss_cost(&game.points);
            let label = |name: &str, power: Option<f64>| match power {
                Some(p) => format!("Build {} x {}", name, format_value(p, RoundType::Floor, "", "")),
                None => format!("Build {}", name),
            };
            html! {
                <div style="display:flex; flex-direction:column; gap:6px;">
                    <div style="display:flex; gap:6px;">
                        { action_button(&label("SPOT", spot.map(|c| c.power)), room && spot.is_some(), on_action, GameAction::BuildSpot { at }) }
                        { action_button(&label("BOSS", boss.map(|c| c.power)), room && boss.is_some(), on_action, GameAction::BuildBoss { at }) }
                    </div>
                    { if room { html!{} } else { html!{ <div style="font-size:11px; opacity:0.7;">{"No empty neighbor to build on."}</div> } } }
                </div>
            }
        }
        CellObject::Spawn(s) => {
            let (day, month) = calendar(now);
            html! {
                <div style="display:flex; flex-direction:column; gap:6px;">
                    <div style="font-size:12px;">{ format!("Sacrifice offer: {{T: {}, D: {}}}",
                        format_value(s.offer.t, RoundType::Floor, "", ""),
                        format_value(s.offer.d, RoundType::Floor, "", "")) }</div>
                    <div style="display:flex; gap:6px;">
                        { action_button("Sacrifice", s.offer.t > 0.0 || s.offer.d > 0.0, on_action, GameAction::Sacrifice { at }) }
                        { action_button("Harvest", s.pool.t > 0.0 || s.pool.d > 0.0, on_action,
                            GameAction::Command { at, command: CellCommand::Spawn(SpawnCommand::Harvest) }) }
                    </div>
                    <div style="font-size:11px; opacity:0.7;">{ format!("{} {}", day, month) }</div>
                </div>
            }
        }
        CellObject::Info(info) => html! {
            <InfoPanel
                at={at}
                info={info.state.clone()}
                log={game.log.clone()}
                lore_unlocks={game.lore_unlocks.clone()}
                on_action={on_action.clone()}
                on_open_settings={props.on_open_settings.clone()} />
        },
        CellObject::Spot(_) | CellObject::Boss(_) => html! {
            <div style="font-size:11px; opacity:0.7;">{"Click or drop on an empty reachable cell to move."}</div>
        },
        CellObject::Business(b) => minigames::business_view(b, at, on_action),
        CellObject::Prestige(p) => minigames::prestige_view(p, at, now, on_action),
        CellObject::Crank(c) => minigames::crank_view(c, at, on_action),
        CellObject::Lawn(l) => minigames::lawn_view(l, at, on_action),
        CellObject::Anti(a) => minigames::anti_view(a, at, on_action),
        CellObject::Snail(s) => minigames::snail_view(s, at, now, on_action),
        CellObject::Blank(_) | CellObject::Enemy(_) => html! {},
    };

    html! {
        <div style="position:absolute; top:12px; right:12px; width:360px; max-height:calc(100vh - 24px); overflow-y:auto; background:rgba(22,27,34,0.95); border:1px solid #30363d; border-radius:8px; padding:10px 14px; display:flex; flex-direction:column; gap:8px; font-size:13px; z-index:6;">
            <div style="font-weight:600;">{ header }</div>
            <pre style="margin:0; white-space:pre-wrap; font-size:12px;">{ details }</pre>
            { if kind.is_obstacle() {
                html!{ <div style="height:6px; background:#21262d; border-radius:3px; overflow:hidden;">
                    <div style={format!("height:100%; width:{:.1}%; background:#f85149;", percent)}></div>
                </div> }
            } else { html!{} } }
            { controls }
        </div>
    }
}
