use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct IntroOverlayProps {
    pub show: bool,
    pub hide_intro: Callback<()>,
}

pub const TUTORIAL: [&str; 8] = [
    "Click a highlighted cell to select it and see its details.",
    "SPOTs give tick power (T) and BOSSes give disassembly power (D) to all 8 neighbors.",
    "Drag a SPOT or BOSS onto an empty reachable cell to move it, or select it and click the target.",
    "Walls fall to D power. Enemies each play their own little game fed by your T power.",
    "A D power neighbor cannot disassemble while another live enemy is adjacent.",
    "Clearing obstacles earns T and D points; spend them at BUILD and combine units at MERGE.",
    "Hold Ctrl and drag to pan the grid.",
    "Progress saves every 10 seconds.",
];

#[function_component(IntroOverlay)]
pub fn intro_overlay(props: &IntroOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let hide_cb = props.hide_intro.clone();
    let hide_btn = Callback::from(move |_| hide_cb.emit(()));
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.87); border:2px solid #30363d; padding:28px 36px; border-radius:14px; max-width:520px; width:90%; box-shadow:0 0 0 1px #1a1f24, 0 6px 18px rgba(0,0,0,0.6); font-size:14px; line-height:1.4; z-index:40;">
            <h2 style="margin:0 0 12px 0; font-size:22px; color:#58a6ff; text-align:center;">{"PPTOP"}</h2>
            <ul style="margin:0 0 12px 18px; padding:0; list-style:disc; display:flex; flex-direction:column; gap:4px;">
                { for TUTORIAL.iter().map(|line| html!{ <li>{ *line }</li> }) }
            </ul>
            <div style="display:flex; gap:12px; justify-content:center; margin-top:8px;">
                <button onclick={hide_btn}>{"Start"}</button>
            </div>
        </div>
    }
}
