use pptop::game::Counters;
use pptop::model::Points;
use pptop::util::{RoundType, format_time, format_value};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub points: Points,
    pub counters: Counters,
    /// Seconds since the first session started.
    pub played: u64,
    pub on_open_settings: Callback<()>,
}

fn stat_row(icon: &str, label: &str, value: String, color: &str) -> Html {
    html! {
        <div style={format!("display:flex; align-items:center; gap:8px; color:{};", color)}>
            <span style="width:20px; text-align:center; flex-shrink:0;">{ icon.to_string() }</span>
            <span style="flex:1; font-weight:500;">{ label.to_string() }</span>
            <span style="min-width:90px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;">{ value }</span>
        </div>
    }
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let c = &props.counters;
    let points = |v: f64| format_value(v, RoundType::Floor, "", "");
    let open_settings = {
        let cb = props.on_open_settings.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:10px 14px; min-width:230px; display:flex; flex-direction:column; gap:10px; font-size:14px; z-index:5;">
            { stat_row("T", "Tick points", points(props.points.tpoints), "#58a6ff") }
            { stat_row("D", "Disassembly points", points(props.points.dpoints), "#a371f7") }
            { stat_row("▦", "Walls", format!("{} / {}", c.walls_done(), c.total_walls), "#8b949e") }
            { stat_row("⚔", "Enemies", format!("{} / {}", c.enemies_done(), c.total_enemies), "#f85149") }
            <div style="display:flex; align-items:center; gap:8px; border-top:1px solid #30363d; padding-top:8px;">
                <span style="flex:1; font-variant-numeric:tabular-nums;">{ format!("Played {}", format_time(props.played)) }</span>
                <button onclick={open_settings} style="padding:2px 8px; font-size:12px;">{ "Settings" }</button>
            </div>
        </div>
    }
}
