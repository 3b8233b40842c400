pub mod client;
pub mod statsapi;

use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the StatsAPI wire format
// ---------------------------------------------------------------------------

/// One side of a scheduled matchup.
///
/// `id` is `None` when the schedule payload carried no team for this side.
/// That is accepted rather than treated as an error; no roster request is
/// ever issued for a side without an id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRef {
    pub id: Option<u32>,
    pub name: String,
    pub abbr: String,
    /// Probable starting pitcher; "TBA" until the club announces one.
    pub probable_pitcher: String,
}

impl TeamRef {
    /// Abbreviation for compact display, with a dash placeholder when the
    /// schedule carried no team.
    pub fn badge(&self) -> &str {
        if self.abbr.is_empty() { "---" } else { &self.abbr }
    }
}

/// One scheduled game. Built fresh on every schedule fetch; the list for a
/// date is replaced wholesale, never merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Game {
    pub id: u64,
    pub time: Option<DateTime<Utc>>,
    pub venue: String,
    pub home: TeamRef,
    pub away: TeamRef,
}

impl Game {
    /// "Away @ Home" line for lists and headers.
    pub fn matchup_label(&self) -> String {
        format!("{} @ {}", self.away.name, self.home.name)
    }

    /// "P: away / home" probable-pitcher line.
    pub fn pitchers_label(&self) -> String {
        format!(
            "P: {} / {}",
            self.away.probable_pitcher, self.home.probable_pitcher
        )
    }
}

/// A roster entry tagged with the team context (home or away) of the fetch it
/// came from — the context is not part of the wire entry itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterPlayer {
    pub id: Option<u64>,
    pub name: String,
    pub pos: String,
    pub team_abbr: String,
    pub team_id: Option<u32>,
}

/// One game's batting line from the player log endpoint.
///
/// Counting stats are always populated, coerced to non-negative integers;
/// missing or non-numeric source fields become 0 so display and downstream
/// arithmetic never see an absent value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRow {
    pub date: String,
    pub opp: String,
    pub ab: u32,
    pub h: u32,
    pub hr: u32,
    pub bb: u32,
    pub tb: u32,
}
