use pptop::cells::info::{InfoCommand, InfoState, InfoTab};
use pptop::model::LogEntry;
use pptop::world::LORE_COUNT;
use pptop::{CellCommand, GameAction};
use wasm_bindgen::JsValue;
use yew::prelude::*;

use super::intro_overlay::TUTORIAL;

#[derive(Properties, PartialEq, Clone)]
pub struct InfoPanelProps {
    pub at: usize,
    pub info: InfoState,
    pub log: Vec<LogEntry>,
    pub lore_unlocks: Vec<bool>,
    pub on_action: Callback<GameAction>,
    pub on_open_settings: Callback<()>,
}

fn clock(ms: f64) -> String {
    String::from(js_sys::Date::new(&JsValue::from_f64(ms)).to_locale_time_string("en-US"))
}

#[function_component]
pub fn InfoPanel(props: &InfoPanelProps) -> Html {
    let at = props.at;
    let command = |command: InfoCommand| {
        let cb = props.on_action.clone();
        Callback::from(move |_: MouseEvent| cb.emit(GameAction::Command { at, command: CellCommand::Info(command) }))
    };
    let tabs = InfoTab::ALL.iter().map(|&tab| {
        let active = props.info.last_tab == tab;
        html! {
            <button style={format!("padding:2px 8px; font-size:12px; {}", if active { "border:1px solid #58a6ff;" } else { "" })}
                onclick={command(InfoCommand::SelectTab(tab))}>{ tab.label() }</button>
        }
    });

    let body = match props.info.last_tab {
        InfoTab::Tutorial => html! {
            <ul style="margin:0 0 0 16px; padding:0;">
                { for TUTORIAL.iter().map(|line| html!{ <li>{ *line }</li> }) }
            </ul>
        },
        // newest first
        InfoTab::Log => html! {
            <div style="max-height:220px; overflow-y:auto; font-family:monospace; font-size:11px;">
                { for props.log.iter().rev().map(|entry| html!{
                    <div>{ format!("{} {}", clock(entry.date), entry.msg) }</div>
                }) }
            </div>
        },
        InfoTab::Lore => {
            let rows = (0..LORE_COUNT).map(|lore| {
                let unlocked = props.lore_unlocks.get(lore).copied().unwrap_or(false);
                let viewed = props.info.viewed_lore.get(lore).copied().unwrap_or(false);
                let (label, color) = match (unlocked, viewed) {
                    (false, _) => ("locked", "#484f58"),
                    (true, false) => ("new", "#d29922"),
                    (true, true) => ("read", "#8b949e"),
                };
                html! {
                    <button style={format!("padding:2px 6px; font-size:11px; color:{};", color)} disabled={!unlocked}
                        onclick={command(InfoCommand::SetLoreViewed(lore))}>
                        { format!("#{} {}", lore, label) }
                    </button>
                }
            });
            html! { <div style="display:flex; flex-wrap:wrap; gap:4px;">{ for rows }</div> }
        }
        InfoTab::Settings => {
            let cb = props.on_open_settings.clone();
            html! {
                <div style="display:flex; flex-direction:column; gap:6px;">
                    <button style="padding:2px 8px; font-size:12px;" onclick={Callback::from(move |_| cb.emit(()))}>{"Open settings"}</button>
                    <div style="font-size:11px; opacity:0.7;">{ format!("{} log entries", props.log.len()) }</div>
                </div>
            }
        }
    };

    html! {
        <div style="display:flex; flex-direction:column; gap:8px;">
            <div style="display:flex; gap:4px; flex-wrap:wrap;">{ for tabs }</div>
            { body }
        </div>
    }
}
