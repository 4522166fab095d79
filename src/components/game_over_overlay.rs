use pptop::util::format_time;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct GameOverOverlayProps {
    pub show: bool,
    pub played: u64,
    pub walls: usize,
    pub enemies: usize,
    pub close: Callback<()>,
}

/// Shown once the triangle at the far corner has been reversed.
#[function_component]
pub fn GameOverOverlay(props: &GameOverOverlayProps) -> Html {
    if !props.show {
        return html! {};
    }
    let close_cb = props.close.clone();
    let close_btn = Callback::from(move |_| close_cb.emit(()));
    html! {
        <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid #d29922; padding:24px 32px; border-radius:12px; text-align:center; min-width:320px; z-index:40;">
            <h2 style="margin:0 0 12px 0; color:#d29922;">{"The Triangle Is Undone"}</h2>
            <p style="margin:4px 0;">{ format!("Time Played: {}", format_time(props.played)) }</p>
            <p style="margin:4px 0;">{ format!("Walls Cleared: {}", props.walls) }</p>
            <p style="margin:4px 0;">{ format!("Enemies Defeated: {}", props.enemies) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={close_btn}>{"Keep Playing"}</button>
            </div>
        </div>
    }
}
