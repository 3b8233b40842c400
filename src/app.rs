use crate::state::app_settings::AppSettings;
use crate::state::selection::SelectionState;
use chrono::Local;
use log::debug;
use mlb_api::{Game, RosterPlayer, StatRow};

pub struct AppState {
    pub show_help: bool,
    pub show_logs: bool,
    pub selection: SelectionState,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            show_help: false,
            show_logs: false,
            selection: SelectionState::new(Local::now().date_naive()),
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers — called from main_ui_loop. Each delegates to
    // the state machine, which drops responses from a superseded selection.
    // -----------------------------------------------------------------------

    pub fn on_schedule_loaded(&mut self, generation: u64, result: Result<Vec<Game>, String>) {
        if !self.state.selection.on_schedule(generation, result) {
            debug!("dropped stale schedule response (generation {generation})");
        }
    }

    pub fn on_roster_loaded(&mut self, generation: u64, result: Result<Vec<RosterPlayer>, String>) {
        if !self.state.selection.on_roster(generation, result) {
            debug!("dropped stale roster response (generation {generation})");
        }
    }

    pub fn on_logs_loaded(&mut self, generation: u64, result: Result<Vec<StatRow>, String>) {
        if !self.state.selection.on_logs(generation, result) {
            debug!("dropped stale game-log response (generation {generation})");
        }
    }

    // -----------------------------------------------------------------------
    // View toggles
    // -----------------------------------------------------------------------

    pub fn toggle_help(&mut self) {
        self.state.show_help = !self.state.show_help;
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}
