use std::rc::Rc;

use pptop::cells::lawn::LawnCommand;
use pptop::cells::snail::SnailCommand;
use pptop::game::{SAVE_INTERVAL_MS, TICK_MS};
use pptop::persistence::{self, STORAGE_KEY};
use pptop::state::Camera;
use pptop::state::camera::PAN_STEP;
use pptop::util::{clog, cwarn};
use pptop::world::LORE_COUNT;
use pptop::{CellCommand, CellKind, CellObject, Game, GameAction};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use yew::prelude::*;

use super::camera_controls::CameraControls;
use super::cell_panel::CellPanel;
use super::game_over_overlay::GameOverOverlay;
use super::grid_view::GridView;
use super::intro_overlay::IntroOverlay;
use super::legend_panel::LegendPanel;
use super::settings_modal::SettingsModal;
use super::stats_panel::StatsPanel;

/// Wall clock in seconds, the time base of every cell.
pub fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

#[derive(Clone)]
pub struct AppState {
    pub game: Game,
    pub selected: Option<usize>,
    /// Set when the stored save could not be read. Autosave stays off so
    /// the broken save is not overwritten.
    pub load_error: Option<String>,
    revision: u64,
}

impl PartialEq for AppState {
    fn eq(&self, other: &Self) -> bool {
        self.revision == other.revision && self.selected == other.selected
    }
}

pub enum AppAction {
    Tick { now: f64 },
    Apply { action: GameAction, now: f64 },
    /// Click on a cell: moves the selected producer there when allowed,
    /// otherwise selects it.
    Click { index: usize, now: f64 },
    Deselect { now: f64 },
    HardReset { now: f64 },
}

impl AppState {
    fn load_or_start(now: f64) -> Self {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten());
        let (game, load_error) = match stored {
            Some(raw) => match persistence::load_from_str(&raw) {
                Ok(game) => {
                    clog("Loaded saved game");
                    (game, None)
                }
                Err(e) => {
                    cwarn(&format!("Failed to load save: {}", e));
                    (Game::start(now), Some(e.to_string()))
                }
            },
            None => (Game::start(now), None),
        };
        Self { game, selected: None, load_error, revision: 0 }
    }

    fn release_selected(&mut self, now: f64) {
        if let Some(prev) = self.selected {
            self.game.apply(GameAction::Release { at: prev }, now);
        }
    }

    fn select(&mut self, index: usize, now: f64) -> bool {
        if self.selected == Some(index) || !self.game.grid.get(index).is_some_and(|c| c.selectable) {
            return false;
        }
        self.release_selected(now);
        self.selected = Some(index);
        if matches!(self.game.grid.cells[index].content, CellObject::Snail(_)) {
            self.game.apply(GameAction::Command { at: index, command: CellCommand::Snail(SnailCommand::Open) }, now);
        }
        true
    }
}

impl Reducible for AppState {
    type Action = AppAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        match action {
            AppAction::Tick { now } => {
                if let Some(at) = new.selected {
                    if new.game.grid.cells[at].content.kind() == CellKind::Lawn {
                        new.game.apply(
                            GameAction::Command { at, command: CellCommand::Lawn(LawnCommand::MarkViewed) },
                            now,
                        );
                    }
                }
                new.game.tick(now);
            }
            AppAction::Apply { action, now } => {
                if !new.game.apply(action, now) {
                    return self;
                }
            }
            AppAction::Click { index, now } => {
                let moved = match new.selected {
                    Some(from) if new.game.can_move(from, index) => new.game.move_content(from, index),
                    _ => false,
                };
                if moved {
                    new.selected = Some(index);
                } else if !new.select(index, now) {
                    return self;
                }
            }
            AppAction::Deselect { now } => {
                new.release_selected(now);
                new.selected = None;
            }
            AppAction::HardReset { now } => {
                new = AppState { game: Game::start(now), selected: None, load_error: None, revision: new.revision };
            }
        }
        new.revision = new.revision.wrapping_add(1);
        Rc::new(new)
    }
}

fn save(state: &AppState) {
    let Some(store) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
        return;
    };
    match persistence::save_to_string(&state.game) {
        Ok(s) => {
            if store.set_item(STORAGE_KEY, &s).is_err() {
                cwarn("Saving to local storage failed");
            }
        }
        Err(e) => cwarn(&format!("Failed to serialize save: {}", e)),
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer(|| AppState::load_or_start(now_secs()));
    let camera = use_state(Camera::default);
    let show_intro = use_state(|| state.game.log.len() <= 1);
    let show_settings = use_state(|| false);
    let show_legend = use_state(|| true);
    let victory_closed = use_state(|| false);
    // Latest handle for the timer closures.
    let state_ref = use_mut_ref(|| state.clone());
    *state_ref.borrow_mut() = state.clone();

    {
        let state_ref = state_ref.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window();
            let tick = {
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move || {
                    let handle = state_ref.borrow().clone();
                    handle.dispatch(AppAction::Tick { now: now_secs() });
                }) as Box<dyn FnMut()>)
            };
            let autosave = {
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move || {
                    let handle = state_ref.borrow().clone();
                    if handle.load_error.is_none() {
                        save(&handle);
                    }
                }) as Box<dyn FnMut()>)
            };
            let keydown = {
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move |e: web_sys::KeyboardEvent| {
                    if e.key() == "Escape" {
                        let handle = state_ref.borrow().clone();
                        handle.dispatch(AppAction::Deselect { now: now_secs() });
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let mouseup = {
                let state_ref = state_ref.clone();
                Closure::wrap(Box::new(move |_e: web_sys::MouseEvent| {
                    let handle = state_ref.borrow().clone();
                    if let Some(at) = handle.selected {
                        handle.dispatch(AppAction::Apply { action: GameAction::Release { at }, now: now_secs() });
                    }
                }) as Box<dyn FnMut(_)>)
            };
            let mut tick_id = None;
            let mut save_id = None;
            if let Some(w) = &window {
                tick_id = w
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        tick.as_ref().unchecked_ref(),
                        TICK_MS.round() as i32,
                    )
                    .ok();
                save_id = w
                    .set_interval_with_callback_and_timeout_and_arguments_0(
                        autosave.as_ref().unchecked_ref(),
                        SAVE_INTERVAL_MS as i32,
                    )
                    .ok();
                let _ = w.add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
                let _ = w.add_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref());
            }
            move || {
                if let Some(w) = &window {
                    if let Some(id) = tick_id {
                        w.clear_interval_with_handle(id);
                    }
                    if let Some(id) = save_id {
                        w.clear_interval_with_handle(id);
                    }
                    let _ = w.remove_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
                    let _ = w.remove_event_listener_with_callback("mouseup", mouseup.as_ref().unchecked_ref());
                }
                drop(tick);
                drop(autosave);
            }
        });
    }

    let on_action = {
        let state = state.clone();
        Callback::from(move |action: GameAction| state.dispatch(AppAction::Apply { action, now: now_secs() }))
    };
    let on_click = {
        let state = state.clone();
        Callback::from(move |index: usize| state.dispatch(AppAction::Click { index, now: now_secs() }))
    };
    let on_pan = {
        let camera = camera.clone();
        Callback::from(move |(dx, dy): (f64, f64)| {
            let mut cam = (*camera).clone();
            cam.pan_by(dx, dy);
            camera.set(cam);
        })
    };
    let camera_cb = |f: fn(&mut Camera)| {
        let camera = camera.clone();
        Callback::from(move |_| {
            let mut cam = (*camera).clone();
            f(&mut cam);
            camera.set(cam);
        })
    };
    let on_pan_step = {
        let camera = camera.clone();
        Callback::from(move |(x, y): (i32, i32)| {
            let mut cam = (*camera).clone();
            cam.pan_by(x as f64 * PAN_STEP, y as f64 * PAN_STEP);
            camera.set(cam);
        })
    };
    let toggle = |flag: UseStateHandle<bool>| Callback::from(move |_| flag.set(!*flag));
    let on_save_now = {
        let state = state.clone();
        Callback::from(move |_| save(&state))
    };
    let on_hard_reset = {
        let state = state.clone();
        let show_settings = show_settings.clone();
        let show_intro = show_intro.clone();
        Callback::from(move |_| {
            if let Some(store) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
                let _ = store.remove_item(STORAGE_KEY);
            }
            state.dispatch(AppAction::HardReset { now: now_secs() });
            show_settings.set(false);
            show_intro.set(true);
        })
    };

    let game = &state.game;
    let played = ((js_sys::Date::now() - game.game_start) / 1000.0).max(0.0) as u64;
    let mut legend_kinds: Vec<CellKind> = Vec::new();
    for cell in game.grid.cells.iter().filter(|c| c.selectable) {
        let kind = cell.content.kind();
        if !legend_kinds.contains(&kind) {
            legend_kinds.push(kind);
        }
    }
    let won = game.is_lore_unlocked(LORE_COUNT - 1);

    html! {
        <div style="position:relative; width:100vw; height:100vh; overflow:hidden; background:#010409; color:#c9d1d9; font-family:sans-serif;">
            <GridView state={state.clone()} camera={(*camera).clone()} on_click={on_click} on_move={{
                let on_action = on_action.clone();
                Callback::from(move |(from, to): (usize, usize)| on_action.emit(GameAction::Move { from, to }))
            }} on_pan={on_pan} />
            <StatsPanel points={game.points} counters={game.counters} played={played} on_open_settings={toggle(show_settings.clone())} />
            <CellPanel state={state.clone()} on_action={on_action} on_open_settings={toggle(show_settings.clone())} />
            <CameraControls
                zoom={camera.zoom}
                on_zoom_in={camera_cb(Camera::zoom_in)}
                on_zoom_out={camera_cb(Camera::zoom_out)}
                on_pan={on_pan_step}
                on_center={camera_cb(Camera::center)} />
            <LegendPanel kinds={legend_kinds} show={*show_legend} />
            { if let Some(err) = &state.load_error {
                html!{ <div style="position:absolute; bottom:60px; left:50%; transform:translateX(-50%); background:#5a1e02; border:1px solid #f85149; padding:6px 12px; border-radius:6px; font-size:12px; z-index:30;">
                    { format!("Save could not be loaded, autosave is off: {}", err) }
                </div> }
            } else { html!{} } }
            <SettingsModal
                show={*show_settings}
                on_close={toggle(show_settings.clone())}
                show_legend={*show_legend}
                on_toggle_legend={toggle(show_legend.clone())}
                autosave={state.load_error.is_none()}
                on_save_now={on_save_now}
                on_hard_reset={on_hard_reset} />
            <IntroOverlay show={*show_intro} hide_intro={toggle(show_intro.clone())} />
            <GameOverOverlay
                show={won && !*victory_closed}
                played={played}
                walls={game.counters.walls_done()}
                enemies={game.counters.enemies_done()}
                close={toggle(victory_closed.clone())} />
        </div>
    }
}
