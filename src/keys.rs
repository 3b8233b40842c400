use crate::app::App;
use crate::state::messages::NetworkRequest;
use crate::state::selection::{FetchCommand, View};
use chrono::Local;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if guard.state.show_help {
        match (key_event.code, key_event.modifiers) {
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            (KeyCode::Esc | Char('?'), _) => guard.toggle_help(),
            _ => {}
        }
        return;
    }

    let season = guard.settings.season;
    let command = match (guard.state.selection.view(), key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Global toggles
        (_, Char('?'), _) => {
            guard.toggle_help();
            None
        }
        (_, Char('f'), _) => {
            guard.toggle_full_screen();
            None
        }
        (_, Char('"'), _) => {
            guard.toggle_show_logs();
            None
        }

        // Schedule: date axis
        (View::Schedule, Char('h') | KeyCode::Left, _) => Some(guard.state.selection.shift_date(-1)),
        (View::Schedule, Char('l') | KeyCode::Right, _) => Some(guard.state.selection.shift_date(1)),
        (View::Schedule, Char('H'), _) => Some(guard.state.selection.shift_date(-7)),
        (View::Schedule, Char('L'), _) => Some(guard.state.selection.shift_date(7)),
        (View::Schedule, Char('t'), _) => {
            Some(guard.state.selection.set_date(Local::now().date_naive()))
        }
        (View::Schedule, Char('r'), _) => {
            if guard.state.selection.schedule.is_loading() {
                None
            } else {
                Some(guard.state.selection.refresh_schedule())
            }
        }

        // Schedule: game list
        (View::Schedule, Char('j') | KeyCode::Down, _) => {
            guard.state.selection.schedule_down();
            None
        }
        (View::Schedule, Char('k') | KeyCode::Up, _) => {
            guard.state.selection.schedule_up();
            None
        }
        (View::Schedule, KeyCode::Enter, _) => guard.state.selection.select_game(),

        // Matchup: roster + player
        (View::Matchup, Char('j') | KeyCode::Down, _) => {
            guard.state.selection.roster_down();
            None
        }
        (View::Matchup, Char('k') | KeyCode::Up, _) => {
            guard.state.selection.roster_up();
            None
        }
        (View::Matchup, KeyCode::Enter, _) => guard.state.selection.select_player(),
        (View::Matchup, KeyCode::Esc, _) => {
            guard.state.selection.clear_game();
            None
        }

        _ => None,
    };

    if let Some(command) = command {
        drop(guard);
        let _ = network_requests.send(to_request(command, season)).await;
    }
}

fn to_request(command: FetchCommand, season: u16) -> NetworkRequest {
    match command {
        FetchCommand::Schedule { date, generation } => {
            NetworkRequest::LoadSchedule { date, generation }
        }
        FetchCommand::Rosters { home, away, generation } => {
            NetworkRequest::LoadRosters { home, away, generation }
        }
        FetchCommand::PlayerLog { player_id, generation } => {
            NetworkRequest::LoadPlayerLog { player_id, season, generation }
        }
    }
}
