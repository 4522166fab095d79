use pptop::state::camera::{MAX_ZOOM, MIN_ZOOM};
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct CameraControlsProps {
    pub zoom: f64,
    pub on_zoom_in: Callback<()>,
    pub on_zoom_out: Callback<()>,
    /// Whole pan steps in x and y.
    pub on_pan: Callback<(i32, i32)>,
    pub on_center: Callback<()>,
}

fn emit_unit(cb: &Callback<()>) -> Callback<MouseEvent> {
    let cb = cb.clone();
    Callback::from(move |_| cb.emit(()))
}

#[function_component(CameraControls)]
pub fn camera_controls(props: &CameraControlsProps) -> Html {
    let pan = |dx: i32, dy: i32, glyph: &'static str| {
        let cb = props.on_pan.clone();
        html! { <button style="width:28px;" onclick={Callback::from(move |_| cb.emit((dx, dy)))}>{ glyph }</button> }
    };
    html! {
        <div style="position:absolute; left:12px; bottom:12px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px; display:grid; grid-template-columns:repeat(3, 28px) 12px auto; gap:4px; align-items:center; z-index:5;">
            <span></span>{ pan(0, 1, "↑") }<span></span>
            <span></span>
            <button disabled={props.zoom >= MAX_ZOOM} onclick={emit_unit(&props.on_zoom_in)}>{"+"}</button>
            { pan(1, 0, "←") }
            <button style="width:28px; font-size:10px;" onclick={emit_unit(&props.on_center)}>{"◎"}</button>
            { pan(-1, 0, "→") }
            <span></span>
            <span style="font-size:11px; text-align:center; font-variant-numeric:tabular-nums;">{ format!("{:.0}%", props.zoom * 100.0) }</span>
            <span></span>{ pan(0, -1, "↓") }<span></span>
            <span></span>
            <button disabled={props.zoom <= MIN_ZOOM} onclick={emit_unit(&props.on_zoom_out)}>{"-"}</button>
        </div>
    }
}
