use pptop::state::Camera;
use pptop::world::lore_for_cell;
use yew::prelude::*;

use super::app::AppState;
use super::legend::{kind_color, kind_glyph};

pub const CELL_PX: u32 = 26;

#[derive(Properties, PartialEq, Clone)]
pub struct GridViewProps {
    pub state: UseReducerHandle<AppState>,
    pub camera: Camera,
    pub on_click: Callback<usize>,
    pub on_move: Callback<(usize, usize)>,
    pub on_pan: Callback<(f64, f64)>,
}

#[function_component]
pub fn GridView(props: &GridViewProps) -> Html {
    let drag_src = use_mut_ref(|| None::<usize>);
    let game = &props.state.game;
    let width = game.grid.size.width;

    let onmousemove = {
        let on_pan = props.on_pan.clone();
        Callback::from(move |e: MouseEvent| {
            if e.ctrl_key() && e.buttons() == 1 {
                on_pan.emit((e.movement_x() as f64, e.movement_y() as f64));
            }
        })
    };

    let cells = game.grid.cells.iter().enumerate().map(|(index, cell)| {
        let kind = cell.content.kind();
        let selected = props.state.selected == Some(index);
        let background = match cell.content.producer() {
            Some(p) if cell.selectable => {
                let (h, s, l) = p.hsl();
                format!("hsl({:.0}, {:.0}%, {:.0}%)", h, s, l)
            }
            _ if cell.selectable => kind_color(kind).to_string(),
            _ => "#000".to_string(),
        };
        let percent = cell.content.percent().clamp(0.0, 100.0);
        let show_bar = cell.selectable && kind.is_obstacle();
        let lore_mark = cell.selectable
            && lore_for_cell(index).is_some_and(|lore| !game.is_lore_unlocked(lore));
        let style = format!(
            "position:relative; width:{px}px; height:{px}px; box-sizing:border-box; background:{bg}; \
             border:1px solid {border}; font-size:13px; display:flex; align-items:center; justify-content:center; \
             cursor:{cursor}; opacity:{opacity}; user-select:none;",
            px = CELL_PX,
            bg = background,
            border = if selected { "#f0f6fc" } else { "#161b22" },
            cursor = if cell.content.is_draggable() { "grab" } else if cell.selectable { "pointer" } else { "default" },
            opacity = if cell.reachable || kind.is_obstacle() { "1" } else { "0.6" },
        );

        let onclick = {
            let cb = props.on_click.clone();
            Callback::from(move |e: MouseEvent| {
                if !e.ctrl_key() {
                    cb.emit(index);
                }
            })
        };
        let ondragstart = {
            let drag_src = drag_src.clone();
            let draggable = cell.content.is_draggable();
            Callback::from(move |e: DragEvent| {
                if !draggable || e.ctrl_key() {
                    e.prevent_default();
                    return;
                }
                *drag_src.borrow_mut() = Some(index);
            })
        };
        let ondragover = {
            let drag_src = drag_src.clone();
            let state = props.state.clone();
            Callback::from(move |e: DragEvent| {
                let Some(src) = *drag_src.borrow() else { return };
                if state.game.can_move(src, index) {
                    e.prevent_default();
                    if let Some(dt) = e.data_transfer() {
                        dt.set_drop_effect("move");
                    }
                }
            })
        };
        let ondrop = {
            let drag_src = drag_src.clone();
            let on_move = props.on_move.clone();
            Callback::from(move |e: DragEvent| {
                e.prevent_default();
                if let Some(src) = drag_src.borrow_mut().take() {
                    on_move.emit((src, index));
                }
            })
        };

        html! {
            <div key={index.to_string()} style={style} draggable={cell.content.is_draggable().to_string()}
                {onclick} {ondragstart} {ondragover} {ondrop}>
                { if cell.selectable { kind_glyph(kind) } else { "" } }
                { if lore_mark { html!{ <span style="position:absolute; top:0; right:1px; font-size:8px; color:#d29922;">{"✦"}</span> } } else { html!{} } }
                { if show_bar {
                    html!{ <div style="position:absolute; left:0; bottom:0; height:3px; width:100%; background:#21262d;">
                        <div style={format!("height:100%; width:{:.1}%; background:#f85149;", percent)}></div>
                    </div> }
                } else { html!{} } }
            </div>
        }
    });

    let grid_style = format!(
        "display:grid; grid-template-columns:repeat({}, {}px); transform:{}; transform-origin:0 0; position:absolute; top:160px; left:280px;",
        width,
        CELL_PX,
        props.camera.transform()
    );
    html! {
        <div style="position:absolute; inset:0;" {onmousemove}>
            <div style={grid_style}>{ for cells }</div>
        </div>
    }
}

