use crate::statsapi::{
    GameLogResponse, RawGame, RawGameSide, RawRosterEntry, RawSplit, RosterResponse,
    ScheduleResponse,
};
use crate::{Game, RosterPlayer, StatRow, TeamRef};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

/// Default base URL of the stats proxy exposing the three /api routes.
/// Deployments point `DUGOUT_API_BASE` at their own host.
const DEFAULT_BASE: &str = "http://127.0.0.1:3000";

/// MLB stats client backed by the schedule / roster / game-log proxy routes.
#[derive(Debug, Clone)]
pub struct MlbApi {
    client: Client,
    base: String,
    timeout: Duration,
}

impl Default for MlbApi {
    fn default() -> Self {
        let base = std::env::var("DUGOUT_API_BASE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE.to_owned());
        Self::with_base(base)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl MlbApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("dugout/0.1 (terminal matchup viewer)")
                .build()
                .unwrap_or_default(),
            base: base.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Fetch the slate of games scheduled for a date.
    /// A date with no games is an empty Vec, not an error.
    pub async fn fetch_schedule(&self, date: NaiveDate) -> ApiResult<Vec<Game>> {
        let url = format!("{}/api/schedule?date={}", self.base, date.format("%Y-%m-%d"));
        let raw: ScheduleResponse = self.get(&url).await?;
        Ok(raw
            .dates
            .unwrap_or_default()
            .into_iter()
            .flat_map(|d| d.games.unwrap_or_default())
            .map(|g| map_game(&g))
            .collect())
    }

    /// Fetch both rosters for a matchup concurrently and merge them
    /// home-first. The result is atomic: callers never observe one side
    /// without the other. A side with no team id contributes no request and
    /// no players.
    pub async fn fetch_rosters(
        &self,
        home: &TeamRef,
        away: &TeamRef,
    ) -> ApiResult<Vec<RosterPlayer>> {
        let (home_entries, away_entries) =
            tokio::join!(self.fetch_roster_entries(home), self.fetch_roster_entries(away));
        Ok(merge_rosters(&home_entries?, home, &away_entries?, away))
    }

    async fn fetch_roster_entries(&self, team: &TeamRef) -> ApiResult<Vec<RawRosterEntry>> {
        let Some(id) = team.id else {
            return Ok(Vec::new());
        };
        let url = format!("{}/api/roster?teamId={id}", self.base);
        let raw: RosterResponse = self.get(&url).await?;
        Ok(raw.roster.unwrap_or_default())
    }

    /// Fetch a player's game-by-game batting log for one season.
    /// Only the first stat group in the response is read; rows keep source
    /// order (reverse-chronological by convention, not enforced here).
    pub async fn fetch_player_log(&self, player_id: u64, season: u16) -> ApiResult<Vec<StatRow>> {
        let url = format!("{}/api/logs?playerId={player_id}&season={season}", self.base);
        let raw: GameLogResponse = self.get(&url).await?;
        Ok(raw
            .stats
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|group| group.splits)
            .unwrap_or_default()
            .iter()
            .map(map_stat_row)
            .collect())
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: StatsAPI wire types → clean domain types
// ---------------------------------------------------------------------------
// Pure and total: absent optional fields become defaults, never a panic.

fn map_game(raw: &RawGame) -> Game {
    let teams = raw.teams.as_ref();
    Game {
        id: raw.game_pk.unwrap_or_default(),
        time: raw
            .game_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|dt| dt.with_timezone(&Utc)),
        venue: raw
            .venue
            .as_ref()
            .and_then(|v| v.name.clone())
            .unwrap_or_else(|| "TBD".to_owned()),
        home: map_side(teams.and_then(|t| t.home.as_ref())),
        away: map_side(teams.and_then(|t| t.away.as_ref())),
    }
}

fn map_side(side: Option<&RawGameSide>) -> TeamRef {
    let team = side.and_then(|s| s.team.as_ref());
    TeamRef {
        id: team.and_then(|t| t.id),
        name: team.and_then(|t| t.name.clone()).unwrap_or_default(),
        abbr: team.and_then(|t| t.abbreviation.clone()).unwrap_or_default(),
        probable_pitcher: side
            .and_then(|s| s.probable_pitcher.as_ref())
            .and_then(|p| p.full_name.clone())
            .unwrap_or_else(|| "TBA".to_owned()),
    }
}

/// Tag a roster entry with the team context of the enclosing fetch; the
/// wire entry itself does not say which club it belongs to.
fn map_player(raw: &RawRosterEntry, team: &TeamRef) -> RosterPlayer {
    let person = raw.person.as_ref();
    RosterPlayer {
        id: person.and_then(|p| p.id),
        name: person.and_then(|p| p.full_name.clone()).unwrap_or_default(),
        pos: raw
            .position
            .as_ref()
            .and_then(|p| p.abbreviation.clone())
            .unwrap_or_default(),
        team_abbr: team.abbr.clone(),
        team_id: team.id,
    }
}

fn map_stat_row(raw: &RawSplit) -> StatRow {
    let stat = raw.stat.as_ref();
    StatRow {
        date: raw.date.clone().unwrap_or_default(),
        opp: raw
            .opponent
            .as_ref()
            .and_then(|t| t.name.clone())
            .unwrap_or_default(),
        ab: coerce_count(stat.and_then(|s| s.at_bats.as_ref())),
        h: coerce_count(stat.and_then(|s| s.hits.as_ref())),
        hr: coerce_count(stat.and_then(|s| s.home_runs.as_ref())),
        bb: coerce_count(stat.and_then(|s| s.base_on_balls.as_ref())),
        tb: coerce_count(stat.and_then(|s| s.total_bases.as_ref())),
    }
}

/// Counting stats arrive as numbers or strings depending on the deployment.
/// Anything that is not a non-negative integer coerces to 0.
fn coerce_count(value: Option<&Value>) -> u32 {
    match value {
        Some(Value::Number(n)) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or_default(),
        Some(Value::String(s)) => s.trim().parse::<u32>().unwrap_or_default(),
        _ => 0,
    }
}

/// Concatenate both sides home-first, preserving insertion order within each
/// side. No cross-team sorting.
fn merge_rosters(
    home_entries: &[RawRosterEntry],
    home: &TeamRef,
    away_entries: &[RawRosterEntry],
    away: &TeamRef,
) -> Vec<RosterPlayer> {
    let mut roster = Vec::with_capacity(home_entries.len() + away_entries.len());
    roster.extend(home_entries.iter().map(|e| map_player(e, home)));
    roster.extend(away_entries.iter().map(|e| map_player(e, away)));
    roster
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statsapi::{RawBattingLine, RawGameTeams, RawPerson, RawPosition, RawTeam, RawVenue};
    use serde_json::json;

    fn team_ref(id: u32, abbr: &str) -> TeamRef {
        TeamRef {
            id: Some(id),
            name: format!("{abbr} club"),
            abbr: abbr.to_owned(),
            probable_pitcher: "TBA".to_owned(),
        }
    }

    // -----------------------------------------------------------------------
    // Mapper tests
    // -----------------------------------------------------------------------

    #[test]
    fn game_with_no_teams_maps_to_absent_ids() {
        let game = map_game(&RawGame::default());
        assert_eq!(game.id, 0);
        assert!(game.time.is_none());
        assert_eq!(game.venue, "TBD");
        assert!(game.home.id.is_none());
        assert!(game.away.id.is_none());
        assert_eq!(game.home.probable_pitcher, "TBA");
        assert_eq!(game.away.probable_pitcher, "TBA");
    }

    #[test]
    fn game_maps_venue_teams_and_pitchers() {
        let raw = RawGame {
            game_pk: Some(745804),
            game_date: Some("2025-04-10T23:05:00Z".to_owned()),
            venue: Some(RawVenue { name: Some("Fenway Park".to_owned()) }),
            teams: Some(RawGameTeams {
                home: Some(RawGameSide {
                    team: Some(RawTeam {
                        id: Some(111),
                        name: Some("Boston Red Sox".to_owned()),
                        abbreviation: Some("BOS".to_owned()),
                    }),
                    probable_pitcher: Some(RawPerson {
                        id: Some(676710),
                        full_name: Some("Garrett Crochet".to_owned()),
                    }),
                }),
                away: Some(RawGameSide {
                    team: Some(RawTeam {
                        id: Some(147),
                        name: Some("New York Yankees".to_owned()),
                        abbreviation: Some("NYY".to_owned()),
                    }),
                    probable_pitcher: None,
                }),
            }),
        };
        let game = map_game(&raw);
        assert_eq!(game.id, 745804);
        assert!(game.time.is_some());
        assert_eq!(game.venue, "Fenway Park");
        assert_eq!(game.home.id, Some(111));
        assert_eq!(game.home.probable_pitcher, "Garrett Crochet");
        assert_eq!(game.away.abbr, "NYY");
        assert_eq!(game.away.probable_pitcher, "TBA", "missing pitcher falls back to TBA");
        assert_eq!(game.matchup_label(), "New York Yankees @ Boston Red Sox");
    }

    #[test]
    fn player_without_position_maps_to_empty_pos() {
        let raw = RawRosterEntry {
            person: Some(RawPerson { id: Some(665742), full_name: Some("Juan Soto".to_owned()) }),
            position: None,
        };
        let player = map_player(&raw, &team_ref(121, "NYM"));
        assert_eq!(player.id, Some(665742));
        assert_eq!(player.name, "Juan Soto");
        assert_eq!(player.pos, "");
    }

    #[test]
    fn player_is_tagged_with_fetch_context_not_entry_fields() {
        let raw = RawRosterEntry {
            person: Some(RawPerson { id: Some(1), full_name: Some("Somebody".to_owned()) }),
            position: Some(RawPosition { abbreviation: Some("C".to_owned()) }),
        };
        let player = map_player(&raw, &team_ref(147, "NYY"));
        assert_eq!(player.team_id, Some(147));
        assert_eq!(player.team_abbr, "NYY");
        assert_eq!(player.pos, "C");
    }

    #[test]
    fn empty_roster_entry_yields_defaults_without_panicking() {
        let player = map_player(&RawRosterEntry::default(), &team_ref(147, "NYY"));
        assert!(player.id.is_none());
        assert_eq!(player.name, "");
        assert_eq!(player.pos, "");
    }

    #[test]
    fn stat_row_coerces_strings_and_defaults_missing_to_zero() {
        let raw = RawSplit {
            date: Some("2025-04-01".to_owned()),
            opponent: None,
            stat: Some(RawBattingLine {
                at_bats: Some(json!("4")),
                hits: Some(json!("2")),
                home_runs: None,
                base_on_balls: None,
                total_bases: None,
            }),
        };
        let row = map_stat_row(&raw);
        assert_eq!(row.date, "2025-04-01");
        assert_eq!(row.opp, "");
        assert_eq!((row.ab, row.h, row.hr, row.bb, row.tb), (4, 2, 0, 0, 0));
    }

    #[test]
    fn stat_row_with_no_stat_object_is_all_zeroes() {
        let row = map_stat_row(&RawSplit::default());
        assert_eq!((row.ab, row.h, row.hr, row.bb, row.tb), (0, 0, 0, 0, 0));
    }

    #[test]
    fn coerce_count_rejects_negatives_floats_and_junk() {
        assert_eq!(coerce_count(Some(&json!(3))), 3);
        assert_eq!(coerce_count(Some(&json!("17"))), 17);
        assert_eq!(coerce_count(Some(&json!(-2))), 0);
        assert_eq!(coerce_count(Some(&json!(1.5))), 0);
        assert_eq!(coerce_count(Some(&json!("n/a"))), 0);
        assert_eq!(coerce_count(Some(&json!(null))), 0);
        assert_eq!(coerce_count(None), 0);
    }

    #[test]
    fn merge_preserves_home_then_away_order() {
        let entry = |name: &str| RawRosterEntry {
            person: Some(RawPerson { id: Some(1), full_name: Some(name.to_owned()) }),
            position: None,
        };
        let home = team_ref(111, "BOS");
        let away = team_ref(147, "NYY");
        let merged = merge_rosters(
            &[entry("H1"), entry("H2")],
            &home,
            &[entry("A1")],
            &away,
        );
        let names: Vec<&str> = merged.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["H1", "H2", "A1"]);
        assert_eq!(merged[0].team_abbr, "BOS");
        assert_eq!(merged[2].team_abbr, "NYY");
    }

    // -----------------------------------------------------------------------
    // Gateway tests (mock server)
    // -----------------------------------------------------------------------

    fn april_tenth() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    #[tokio::test]
    async fn schedule_fetch_maps_games() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "dates": [{ "games": [{
                "gamePk": 745804,
                "gameDate": "2025-04-10T23:05:00Z",
                "venue": { "name": "Fenway Park" },
                "teams": {
                    "home": { "team": { "id": 111, "name": "Boston Red Sox", "abbreviation": "BOS" } },
                    "away": { "team": { "id": 147, "name": "New York Yankees", "abbreviation": "NYY" } }
                }
            }]}]
        });
        let mock = server
            .mock("GET", "/api/schedule?date=2025-04-10")
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let games = api.fetch_schedule(april_tenth()).await.unwrap();
        mock.assert_async().await;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, 745804);
        assert_eq!(games[0].home.id, Some(111));
        assert_eq!(games[0].away.id, Some(147));
    }

    #[tokio::test]
    async fn schedule_with_no_dates_is_empty_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/schedule?date=2025-04-10")
            .with_body("{}")
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let games = api.fetch_schedule(april_tenth()).await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn client_error_degrades_to_empty_collection() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/schedule?date=2025-04-10")
            .with_status(404)
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let games = api.fetch_schedule(april_tenth()).await.unwrap();
        assert!(games.is_empty());
    }

    #[tokio::test]
    async fn server_error_surfaces_as_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/schedule?date=2025-04-10")
            .with_status(503)
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let err = api.fetch_schedule(april_tenth()).await.unwrap_err();
        assert!(matches!(err, ApiError::Api(..)), "got {err}");
    }

    #[tokio::test]
    async fn malformed_body_surfaces_as_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/schedule?date=2025-04-10")
            .with_body("<html>gateway timeout</html>")
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let err = api.fetch_schedule(april_tenth()).await.unwrap_err();
        assert!(matches!(err, ApiError::Parsing(..)), "got {err}");
    }

    #[tokio::test]
    async fn roster_pair_issues_one_call_per_side_and_merges_home_first() {
        let mut server = mockito::Server::new_async().await;
        let roster = |name: &str| {
            json!({ "roster": [{
                "person": { "id": 1, "fullName": name },
                "position": { "abbreviation": "1B" }
            }]})
            .to_string()
        };
        let home_mock = server
            .mock("GET", "/api/roster?teamId=147")
            .with_body(roster("Home Guy"))
            .expect(1)
            .create_async()
            .await;
        let away_mock = server
            .mock("GET", "/api/roster?teamId=121")
            .with_body(roster("Away Guy"))
            .expect(1)
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let merged = api
            .fetch_rosters(&team_ref(147, "NYY"), &team_ref(121, "NYM"))
            .await
            .unwrap();
        home_mock.assert_async().await;
        away_mock.assert_async().await;
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Home Guy");
        assert_eq!(merged[0].team_abbr, "NYY");
        assert_eq!(merged[1].name, "Away Guy");
        assert_eq!(merged[1].team_abbr, "NYM");
    }

    #[tokio::test]
    async fn side_without_team_id_gets_no_request() {
        let mut server = mockito::Server::new_async().await;
        let away_mock = server
            .mock("GET", "/api/roster?teamId=121")
            .with_body(json!({ "roster": [] }).to_string())
            .expect(1)
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let merged = api
            .fetch_rosters(&TeamRef::default(), &team_ref(121, "NYM"))
            .await
            .unwrap();
        away_mock.assert_async().await;
        assert!(merged.is_empty());
    }

    #[tokio::test]
    async fn player_log_reads_first_stat_group_and_coerces() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "stats": [
                { "splits": [{
                    "date": "2025-04-01",
                    "opponent": { "name": "Baltimore Orioles" },
                    "stat": { "atBats": "4", "hits": "2" }
                }]},
                { "splits": [{ "date": "ignored-second-group" }]}
            ]
        });
        let _mock = server
            .mock("GET", "/api/logs?playerId=665742&season=2025")
            .with_body(body.to_string())
            .create_async()
            .await;

        let api = MlbApi::with_base(server.url());
        let rows = api.fetch_player_log(665742, 2025).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "2025-04-01");
        assert_eq!(rows[0].opp, "Baltimore Orioles");
        assert_eq!((rows[0].ab, rows[0].h, rows[0].hr, rows[0].bb, rows[0].tb), (4, 2, 0, 0, 0));
    }
}
