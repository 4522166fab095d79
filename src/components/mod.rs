pub mod app;
pub mod camera_controls;
pub mod cell_panel;
pub mod game_over_overlay;
pub mod grid_view;
pub mod info_panel;
pub mod intro_overlay;
pub mod legend;
pub mod legend_panel;
pub mod minigames;
pub mod settings_modal;
pub mod stats_panel;
