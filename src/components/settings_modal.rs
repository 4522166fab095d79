use pptop::game::SAVE_INTERVAL_MS;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct SettingsModalProps {
    pub show: bool,
    pub on_close: Callback<()>,
    pub show_legend: bool,
    pub on_toggle_legend: Callback<()>,
    /// Off after a failed load.
    pub autosave: bool,
    pub on_save_now: Callback<()>,
    pub on_hard_reset: Callback<()>,
}

const WIPE_PROMPT: &str = "This will WIPE all progress and start a new grid. Are you sure?";

fn relay(cb: &Callback<()>) -> Callback<MouseEvent> {
    let cb = cb.clone();
    Callback::from(move |_| cb.emit(()))
}

#[function_component]
pub fn SettingsModal(props: &SettingsModalProps) -> Html {
    if !props.show {
        return html! {};
    }

    let hard_reset_cb = {
        let cb = props.on_hard_reset.clone();
        Callback::from(move |_| {
            let confirmed = web_sys::window()
                .map(|win| win.confirm_with_message(WIPE_PROMPT).unwrap_or(false))
                .unwrap_or(true);
            if confirmed {
                cb.emit(());
            }
        })
    };
    let save_status = if props.autosave {
        format!("Autosave every {} seconds.", SAVE_INTERVAL_MS / 1000)
    } else {
        "Autosave is off because the stored save could not be read. Saving now overwrites it.".to_string()
    };
    let section = "margin:0; font-size:13px; opacity:0.8; text-transform:uppercase; letter-spacing:0.05em;";

    html! {
        <div style="position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.55); z-index:50;">
            <div style="background:#161b22; border:1px solid #30363d; border-radius:12px; padding:16px 20px; width:360px; display:flex; flex-direction:column; gap:12px;">
                <div style="display:flex; justify-content:space-between; align-items:center;">
                    <h3 style="margin:0; font-size:18px;">{"Settings"}</h3>
                    <button onclick={relay(&props.on_close)} style="padding:4px 8px;">{"✕"}</button>
                </div>
                <h4 style={section}>{"Display"}</h4>
                <label style="display:flex; align-items:center; gap:8px; cursor:pointer;">
                    <input type="checkbox" checked={props.show_legend} onclick={relay(&props.on_toggle_legend)} />
                    <span>{"Legend of visible cell kinds"}</span>
                </label>
                <h4 style={section}>{"Save data"}</h4>
                <div style="font-size:12px; line-height:1.4;">{ save_status }</div>
                <div style="display:flex; gap:8px;">
                    <button onclick={relay(&props.on_save_now)} style="flex:1;">{"Save Now"}</button>
                    <button onclick={hard_reset_cb} style="background:#f85149; border:1px solid #b62324; color:#fff; flex:1;">{"Hard Reset"}</button>
                </div>
            </div>
        </div>
    }
}
