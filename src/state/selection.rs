use chrono::NaiveDate;
use mlb_api::{Game, RosterPlayer, StatRow, TeamRef};

/// At most this many log rows are ever shown, however many the source returns.
pub const MAX_LOG_ROWS: usize = 12;

// ---------------------------------------------------------------------------
// Per-level load state
// ---------------------------------------------------------------------------

/// Load state of one navigation level's data. A failure is local to its
/// level: prior levels keep their data and a new selection retries.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

// ---------------------------------------------------------------------------
// Selection — the tagged navigation union
// ---------------------------------------------------------------------------

/// Navigation below the date, as a tagged union so invalid combinations
/// (a player without a game, logs without a player) cannot be represented.
#[derive(Debug, Default)]
pub enum Selection {
    #[default]
    Browsing,
    GameSelected {
        game: Game,
        roster: LoadState<Vec<RosterPlayer>>,
        cursor: usize,
    },
    PlayerSelected {
        game: Game,
        roster: LoadState<Vec<RosterPlayer>>,
        cursor: usize,
        player: RosterPlayer,
        logs: LoadState<Vec<StatRow>>,
    },
}

/// Which of the two screens the renderer should derive.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum View {
    Schedule,
    Matchup,
}

/// Fetch to issue as the side effect of a transition. Carries the generation
/// current at issue time; the appliers below discard any response whose
/// generation is no longer current, which is the whole race-condition story:
/// a late schedule payload for an abandoned date, or roster/log payloads for
/// a superseded selection, can never overwrite newer state.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchCommand {
    Schedule { date: NaiveDate, generation: u64 },
    Rosters { home: TeamRef, away: TeamRef, generation: u64 },
    PlayerLog { player_id: u64, generation: u64 },
}

// ---------------------------------------------------------------------------
// SelectionState — date + schedule + selection, one generation counter
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct SelectionState {
    pub date: NaiveDate,
    pub schedule: LoadState<Vec<Game>>,
    pub schedule_cursor: usize,
    pub focus: Selection,
    generation: u64,
}

impl SelectionState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            schedule: LoadState::Idle,
            schedule_cursor: 0,
            focus: Selection::Browsing,
            generation: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn view(&self) -> View {
        match self.focus {
            Selection::Browsing => View::Schedule,
            _ => View::Matchup,
        }
    }

    // -----------------------------------------------------------------------
    // Transitions — each returns the fetch to issue, if any
    // -----------------------------------------------------------------------

    /// Safe from any state: discards any game/player selection and queries
    /// the new date.
    pub fn set_date(&mut self, date: NaiveDate) -> FetchCommand {
        self.date = date;
        self.schedule = LoadState::Loading;
        self.schedule_cursor = 0;
        self.focus = Selection::Browsing;
        FetchCommand::Schedule { date, generation: self.bump() }
    }

    pub fn shift_date(&mut self, days: i64) -> FetchCommand {
        self.set_date(self.date + chrono::Duration::days(days))
    }

    /// Re-query the current date without touching the selection or bumping
    /// the generation. An in-flight roster or log fetch stays valid, while
    /// the refresh itself becomes stale the moment any real transition runs.
    pub fn refresh_schedule(&mut self) -> FetchCommand {
        if matches!(self.schedule, LoadState::Idle | LoadState::Failed(_)) {
            self.schedule = LoadState::Loading;
        }
        FetchCommand::Schedule { date: self.date, generation: self.generation }
    }

    /// Enter `GameSelected` for the game under the schedule cursor. Always
    /// invalidates any previous player selection; the two roster fetches are
    /// issued as a single atomic command.
    pub fn select_game(&mut self) -> Option<FetchCommand> {
        let game = self.selected_game()?.clone();
        let generation = self.bump();
        let command = FetchCommand::Rosters {
            home: game.home.clone(),
            away: game.away.clone(),
            generation,
        };
        self.focus = Selection::GameSelected { game, roster: LoadState::Loading, cursor: 0 };
        Some(command)
    }

    /// Enter `PlayerSelected` for the player under the roster cursor. Old
    /// log rows are gone before the fetch resolves; the pane shows Loading,
    /// never a stale table. Requires a loaded roster and a player with an id.
    pub fn select_player(&mut self) -> Option<FetchCommand> {
        let (game, roster, cursor) = match &self.focus {
            Selection::GameSelected { game, roster, cursor }
            | Selection::PlayerSelected { game, roster, cursor, .. } => (game, roster, *cursor),
            Selection::Browsing => return None,
        };
        let player = roster.loaded()?.get(cursor)?.clone();
        let player_id = player.id?;
        let game = game.clone();
        let roster = roster.clone();
        let generation = self.bump();
        self.focus = Selection::PlayerSelected {
            game,
            roster,
            cursor,
            player,
            logs: LoadState::Loading,
        };
        Some(FetchCommand::PlayerLog { player_id, generation })
    }

    /// Back to `Browsing`, discarding game, roster, player, and logs. Bumps
    /// the generation so in-flight roster/log responses are dropped.
    pub fn clear_game(&mut self) {
        self.focus = Selection::Browsing;
        self.bump();
    }

    // -----------------------------------------------------------------------
    // Cursor movement — clamped, no wrap
    // -----------------------------------------------------------------------

    pub fn schedule_down(&mut self) {
        if let LoadState::Loaded(games) = &self.schedule {
            let max = games.len().saturating_sub(1);
            if self.schedule_cursor < max {
                self.schedule_cursor += 1;
            }
        }
    }

    pub fn schedule_up(&mut self) {
        self.schedule_cursor = self.schedule_cursor.saturating_sub(1);
    }

    pub fn roster_down(&mut self) {
        let (roster, cursor) = match &mut self.focus {
            Selection::GameSelected { roster, cursor, .. }
            | Selection::PlayerSelected { roster, cursor, .. } => (roster, cursor),
            Selection::Browsing => return,
        };
        if let LoadState::Loaded(players) = roster {
            let max = players.len().saturating_sub(1);
            if *cursor < max {
                *cursor += 1;
            }
        }
    }

    pub fn roster_up(&mut self) {
        match &mut self.focus {
            Selection::GameSelected { cursor, .. }
            | Selection::PlayerSelected { cursor, .. } => *cursor = cursor.saturating_sub(1),
            Selection::Browsing => {}
        }
    }

    // -----------------------------------------------------------------------
    // Response appliers — return false when the response was stale
    // -----------------------------------------------------------------------

    pub fn on_schedule(&mut self, generation: u64, result: Result<Vec<Game>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        match result {
            Ok(games) => {
                self.schedule_cursor = self.schedule_cursor.min(games.len().saturating_sub(1));
                self.schedule = LoadState::Loaded(games);
            }
            Err(message) => self.schedule = LoadState::Failed(message),
        }
        true
    }

    pub fn on_roster(
        &mut self,
        generation: u64,
        result: Result<Vec<RosterPlayer>, String>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        let Selection::GameSelected { roster, cursor, .. } = &mut self.focus else {
            return false;
        };
        *cursor = 0;
        *roster = match result {
            Ok(players) => LoadState::Loaded(players),
            Err(message) => LoadState::Failed(message),
        };
        true
    }

    pub fn on_logs(&mut self, generation: u64, result: Result<Vec<StatRow>, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        let Selection::PlayerSelected { logs, .. } = &mut self.focus else {
            return false;
        };
        *logs = match result {
            Ok(rows) => LoadState::Loaded(rows),
            Err(message) => LoadState::Failed(message),
        };
        true
    }

    // -----------------------------------------------------------------------
    // Read accessors for the renderer
    // -----------------------------------------------------------------------

    /// Game under the schedule cursor, if the schedule is loaded.
    pub fn selected_game(&self) -> Option<&Game> {
        self.schedule.loaded()?.get(self.schedule_cursor)
    }

    /// The game currently entered (GameSelected or PlayerSelected).
    pub fn current_game(&self) -> Option<&Game> {
        match &self.focus {
            Selection::Browsing => None,
            Selection::GameSelected { game, .. }
            | Selection::PlayerSelected { game, .. } => Some(game),
        }
    }

    pub fn roster(&self) -> Option<(&LoadState<Vec<RosterPlayer>>, usize)> {
        match &self.focus {
            Selection::Browsing => None,
            Selection::GameSelected { roster, cursor, .. }
            | Selection::PlayerSelected { roster, cursor, .. } => Some((roster, *cursor)),
        }
    }

    pub fn selected_player(&self) -> Option<&RosterPlayer> {
        match &self.focus {
            Selection::PlayerSelected { player, .. } => Some(player),
            _ => None,
        }
    }

    pub fn logs(&self) -> Option<&LoadState<Vec<StatRow>>> {
        match &self.focus {
            Selection::PlayerSelected { logs, .. } => Some(logs),
            _ => None,
        }
    }

    /// Log rows to render: the first `MAX_LOG_ROWS` in source order.
    pub fn visible_log_rows(&self) -> &[StatRow] {
        match self.logs() {
            Some(LoadState::Loaded(rows)) => &rows[..rows.len().min(MAX_LOG_ROWS)],
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: u32, abbr: &str) -> TeamRef {
        TeamRef {
            id: Some(id),
            name: format!("{abbr} club"),
            abbr: abbr.to_owned(),
            probable_pitcher: "TBA".to_owned(),
        }
    }

    fn game(id: u64, home: u32, away: u32) -> Game {
        Game {
            id,
            time: None,
            venue: "TBD".to_owned(),
            home: team(home, "HOM"),
            away: team(away, "AWY"),
        }
    }

    fn player(id: u64, name: &str) -> RosterPlayer {
        RosterPlayer {
            id: Some(id),
            name: name.to_owned(),
            pos: "1B".to_owned(),
            team_abbr: "HOM".to_owned(),
            team_id: Some(147),
        }
    }

    fn row(date: &str) -> StatRow {
        StatRow { date: date.to_owned(), ..StatRow::default() }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, day).unwrap()
    }

    /// State with a loaded two-game schedule for 2025-04-10.
    fn loaded_state() -> SelectionState {
        let mut state = SelectionState::new(date(10));
        let generation = match state.set_date(date(10)) {
            FetchCommand::Schedule { generation, .. } => generation,
            other => panic!("unexpected command {other:?}"),
        };
        assert!(state.on_schedule(generation, Ok(vec![game(1, 147, 121), game(2, 111, 110)])));
        state
    }

    /// Drive the state to GameSelected with a loaded roster.
    fn with_roster(state: &mut SelectionState, players: Vec<RosterPlayer>) {
        let Some(FetchCommand::Rosters { generation, .. }) = state.select_game() else {
            panic!("select_game should issue a roster fetch");
        };
        assert!(state.on_roster(generation, Ok(players)));
    }

    #[test]
    fn select_game_issues_one_command_with_both_sides() {
        let mut state = loaded_state();
        let command = state.select_game().expect("game under cursor");
        let FetchCommand::Rosters { home, away, .. } = command else {
            panic!("expected a roster command, got {command:?}");
        };
        assert_eq!(home.id, Some(147));
        assert_eq!(away.id, Some(121));
        assert_eq!(state.view(), View::Matchup);
        assert!(state.roster().unwrap().0.is_loading());
    }

    #[test]
    fn selecting_game_b_discards_game_a_roster_entirely() {
        let mut state = loaded_state();
        with_roster(&mut state, vec![player(10, "A Home"), player(11, "A Away")]);

        state.schedule_down();
        let Some(FetchCommand::Rosters { generation, .. }) = state.select_game() else {
            panic!("reselection should issue a roster fetch");
        };
        assert!(
            state.roster().unwrap().0.is_loading(),
            "old roster must be gone before the new one resolves"
        );

        assert!(state.on_roster(generation, Ok(vec![player(20, "B Home")])));
        let (roster, _) = state.roster().unwrap();
        let names: Vec<&str> = roster.loaded().unwrap().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["B Home"]);
    }

    #[test]
    fn selecting_a_player_clears_prior_logs_before_the_fetch_resolves() {
        let mut state = loaded_state();
        with_roster(&mut state, vec![player(10, "First"), player(11, "Second")]);

        let Some(FetchCommand::PlayerLog { generation, .. }) = state.select_player() else {
            panic!("player under cursor should be selectable");
        };
        assert!(state.on_logs(generation, Ok(vec![row("2025-04-01"), row("2025-04-02")])));
        assert_eq!(state.visible_log_rows().len(), 2);

        state.roster_down();
        state.select_player().expect("second player selectable");
        assert!(state.logs().unwrap().is_loading());
        assert!(state.visible_log_rows().is_empty(), "no stale rows, even transiently");
    }

    #[test]
    fn log_display_is_capped_at_twelve_rows_in_source_order() {
        let mut state = loaded_state();
        with_roster(&mut state, vec![player(10, "Batter")]);
        let Some(FetchCommand::PlayerLog { generation, .. }) = state.select_player() else {
            panic!("player should be selectable");
        };
        let rows: Vec<StatRow> = (0..40).map(|i| row(&format!("2025-04-{i:02}"))).collect();
        assert!(state.on_logs(generation, Ok(rows)));

        let visible = state.visible_log_rows();
        assert_eq!(visible.len(), MAX_LOG_ROWS);
        assert_eq!(visible[0].date, "2025-04-00");
        assert_eq!(visible[11].date, "2025-04-11");
    }

    #[test]
    fn set_date_from_player_selected_lands_in_browsing() {
        let mut state = loaded_state();
        with_roster(&mut state, vec![player(10, "Batter")]);
        state.select_player().unwrap();

        let command = state.set_date(date(11));
        assert!(matches!(command, FetchCommand::Schedule { .. }));
        assert_eq!(state.view(), View::Schedule);
        assert!(state.current_game().is_none());
        assert!(state.selected_player().is_none());
        assert!(state.schedule.is_loading());
    }

    #[test]
    fn stale_schedule_response_for_an_abandoned_date_is_ignored() {
        let mut state = SelectionState::new(date(10));
        let FetchCommand::Schedule { generation: first, .. } = state.set_date(date(10)) else {
            unreachable!()
        };
        let FetchCommand::Schedule { generation: second, .. } = state.set_date(date(11)) else {
            unreachable!()
        };

        assert!(!state.on_schedule(first, Ok(vec![game(1, 147, 121)])));
        assert!(state.schedule.is_loading(), "stale payload must not render");
        assert!(state.on_schedule(second, Ok(vec![])));
        assert_eq!(state.schedule.loaded().map(Vec::len), Some(0));
    }

    #[test]
    fn late_roster_after_clear_game_is_dropped() {
        let mut state = loaded_state();
        let Some(FetchCommand::Rosters { generation, .. }) = state.select_game() else {
            unreachable!()
        };
        state.clear_game();
        assert!(!state.on_roster(generation, Ok(vec![player(10, "Late")])));
        assert_eq!(state.view(), View::Schedule);
    }

    #[test]
    fn late_logs_after_reselecting_a_game_are_dropped() {
        let mut state = loaded_state();
        with_roster(&mut state, vec![player(10, "Batter")]);
        let Some(FetchCommand::PlayerLog { generation: log_generation, .. }) =
            state.select_player()
        else {
            unreachable!()
        };

        state.select_game().unwrap();
        assert!(!state.on_logs(log_generation, Ok(vec![row("2025-04-01")])));
        assert!(state.selected_player().is_none(), "player selection was invalidated");
    }

    #[test]
    fn refresh_does_not_invalidate_an_inflight_roster_fetch() {
        let mut state = loaded_state();
        let Some(FetchCommand::Rosters { generation: roster_generation, .. }) =
            state.select_game()
        else {
            unreachable!()
        };

        let FetchCommand::Schedule { generation: refresh_generation, .. } =
            state.refresh_schedule()
        else {
            unreachable!()
        };
        assert_eq!(refresh_generation, roster_generation);

        assert!(state.on_schedule(refresh_generation, Ok(vec![game(1, 147, 121)])));
        assert!(state.on_roster(roster_generation, Ok(vec![player(10, "Batter")])));
        assert!(state.roster().unwrap().0.loaded().is_some());
    }

    #[test]
    fn zero_game_date_loads_as_an_empty_slate() {
        let mut state = SelectionState::new(date(10));
        let FetchCommand::Schedule { generation, .. } = state.set_date(date(10)) else {
            unreachable!()
        };
        assert!(state.on_schedule(generation, Ok(vec![])));
        assert_eq!(state.schedule.loaded().map(Vec::len), Some(0));
        assert!(state.selected_game().is_none());
        assert!(state.select_game().is_none(), "nothing to select on an empty slate");
    }

    #[test]
    fn failures_are_local_to_their_level() {
        let mut state = loaded_state();
        let Some(FetchCommand::Rosters { generation, .. }) = state.select_game() else {
            unreachable!()
        };
        assert!(state.on_roster(generation, Err("API error for /api/roster: 503".into())));

        let (roster, _) = state.roster().unwrap();
        assert!(matches!(roster, LoadState::Failed(_)));
        assert!(state.schedule.loaded().is_some(), "schedule keeps its data");
        assert!(state.current_game().is_some(), "game stays entered for a retry");
    }

    #[test]
    fn select_player_requires_a_loaded_roster() {
        let mut state = loaded_state();
        state.select_game().unwrap();
        assert!(state.select_player().is_none(), "roster still loading");
    }

    #[test]
    fn cursors_clamp_at_both_ends() {
        let mut state = loaded_state();
        state.schedule_up();
        assert_eq!(state.schedule_cursor, 0);
        state.schedule_down();
        state.schedule_down();
        state.schedule_down();
        assert_eq!(state.schedule_cursor, 1, "two games, cursor stops at the last");

        let FetchCommand::Schedule { generation, .. } = state.refresh_schedule() else {
            unreachable!()
        };
        assert!(state.on_schedule(generation, Ok(vec![game(1, 147, 121)])));
        assert_eq!(state.schedule_cursor, 0, "cursor clamps when the slate shrinks");
    }

    #[test]
    fn shift_date_moves_the_date_axis() {
        let mut state = SelectionState::new(date(10));
        let FetchCommand::Schedule { date: d, .. } = state.shift_date(-1) else {
            unreachable!()
        };
        assert_eq!(d, date(9));
        let FetchCommand::Schedule { date: d, .. } = state.shift_date(7) else {
            unreachable!()
        };
        assert_eq!(d, date(16));
    }
}
