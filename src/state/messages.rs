use crate::state::network::LoadingState;
use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use mlb_api::{Game, RosterPlayer, StatRow, TeamRef};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSchedule { date: NaiveDate, generation: u64 },
    /// Both sides of one matchup; answered by a single atomic RosterLoaded.
    LoadRosters { home: TeamRef, away: TeamRef, generation: u64 },
    LoadPlayerLog { player_id: u64, season: u16, generation: u64 },
}

/// Every data response carries the generation of the request that produced
/// it; the state machine drops responses whose generation is stale.
#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScheduleLoaded { generation: u64, result: Result<Vec<Game>, String> },
    RosterLoaded { generation: u64, result: Result<Vec<RosterPlayer>, String> },
    PlayerLogLoaded { generation: u64, result: Result<Vec<StatRow>, String> },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Periodic nudge to re-query the current date's slate.
    RefreshTick,
}
