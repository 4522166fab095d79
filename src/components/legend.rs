use pptop::CellKind;
use yew::prelude::*;

/// Fill colour of a cell of `kind`.
pub fn kind_color(kind: CellKind) -> &'static str {
    match kind {
        CellKind::None => "#0d1117",
        CellKind::Spot => "#1f6feb",
        CellKind::Boss => "#8957e5",
        CellKind::Enemy => "#6e7681",
        CellKind::Wall => "#2a2f38",
        CellKind::Cheese => "#d29922",
        CellKind::Business => "#2ea043",
        CellKind::Merge => "#1b4b72",
        CellKind::Build => "#3b3f1f",
        CellKind::Info => "#58a6ff",
        CellKind::Prestige => "#db61a2",
        CellKind::Crank => "#b08800",
        CellKind::Lawn => "#3fb950",
        CellKind::Anti => "#a371f7",
        CellKind::Snail => "#f0883e",
        CellKind::Spawn => "#b62324",
    }
}

pub fn kind_glyph(kind: CellKind) -> &'static str {
    match kind {
        CellKind::None => "",
        CellKind::Spot => "S",
        CellKind::Boss => "B",
        CellKind::Enemy => "e",
        CellKind::Wall => "",
        CellKind::Cheese => "🧀",
        CellKind::Business => "$",
        CellKind::Merge => "⊕",
        CellKind::Build => "⚒",
        CellKind::Info => "?",
        CellKind::Prestige => "P",
        CellKind::Crank => "⚙",
        CellKind::Lawn => "🌱",
        CellKind::Anti => "∞",
        CellKind::Snail => "🐌",
        CellKind::Spawn => "☉",
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct LegendRowProps {
    pub kind: CellKind,
}

#[function_component(LegendRow)]
pub fn legend_row(props: &LegendRowProps) -> Html {
    let color = kind_color(props.kind);
    html! { <div style="display:flex; align-items:center; gap:8px; margin:3px 0;"> <span style={format!("display:inline-flex; justify-content:center; width:14px; height:14px; font-size:10px; background:{}; border:1px solid #30363d; border-radius:2px;", color)}>{ kind_glyph(props.kind) }</span> <span>{ props.kind.label() }</span> </div> }
}
