use super::legend::LegendRow;
use pptop::CellKind;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct LegendPanelProps {
    /// Kinds currently visible on the selectable part of the grid.
    pub kinds: Vec<CellKind>,
    pub show: bool,
}

#[function_component]
pub fn LegendPanel(props: &LegendPanelProps) -> Html {
    if !props.show {
        return html! {};
    }
    html! {<div style="position:absolute; right:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; min-width:150px;">
        <div style="font-weight:600; margin-bottom:4px;">{"Legend"}</div>
        { for props.kinds.iter().map(|k| html!{ <LegendRow kind={*k} /> }) }
    </div>}
}
