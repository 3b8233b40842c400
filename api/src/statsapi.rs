//! StatsAPI raw wire types — serde shapes for deserializing the schedule,
//! roster, and player-log responses. Every field is optional; the mapping
//! functions in client.rs supply defaults so absence never panics.
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Schedule  (GET /api/schedule?date=YYYY-MM-DD)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    pub dates: Option<Vec<ScheduleDate>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    pub games: Option<Vec<RawGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawGame {
    #[serde(rename = "gamePk")]
    pub game_pk: Option<u64>,
    #[serde(rename = "gameDate")]
    pub game_date: Option<String>, // ISO 8601
    pub venue: Option<RawVenue>,
    pub teams: Option<RawGameTeams>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawVenue {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawGameTeams {
    pub home: Option<RawGameSide>,
    pub away: Option<RawGameSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawGameSide {
    pub team: Option<RawTeam>,
    #[serde(rename = "probablePitcher")]
    pub probable_pitcher: Option<RawPerson>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawTeam {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub abbreviation: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawPerson {
    pub id: Option<u64>,
    #[serde(rename = "fullName")]
    pub full_name: Option<String>,
}

// ---------------------------------------------------------------------------
// Roster  (GET /api/roster?teamId=<id>)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RosterResponse {
    pub roster: Option<Vec<RawRosterEntry>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawRosterEntry {
    pub person: Option<RawPerson>,
    pub position: Option<RawPosition>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawPosition {
    pub abbreviation: Option<String>,
}

// ---------------------------------------------------------------------------
// Player game log  (GET /api/logs?playerId=<id>&season=<year>)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameLogResponse {
    pub stats: Option<Vec<RawStatGroup>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawStatGroup {
    pub splits: Option<Vec<RawSplit>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawSplit {
    pub date: Option<String>,
    pub opponent: Option<RawTeam>,
    pub stat: Option<RawBattingLine>,
}

/// Counting stats arrive as JSON numbers on some deployments and as strings
/// on others, so each field is held as a raw Value and coerced by the mapper.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RawBattingLine {
    #[serde(rename = "atBats")]
    pub at_bats: Option<Value>,
    pub hits: Option<Value>,
    #[serde(rename = "homeRuns")]
    pub home_runs: Option<Value>,
    #[serde(rename = "baseOnBalls")]
    pub base_on_balls: Option<Value>,
    #[serde(rename = "totalBases")]
    pub total_bases: Option<Value>,
}
