use mlb_api::RosterPlayer;

/// Headshot URL scheme on the MLB media CDN; `{id}` is the player id.
const HEADSHOT_BASE: &str =
    "https://img.mlbstatic.com/mlb-photos/image/upload/w_96,q_auto:best/v1/people";

/// Visual identity for one roster entry, decided once when the record is
/// rendered into a row rather than patched at display time: a headshot link
/// when the player id is known, otherwise a textual initials badge. The
/// initials are always available; terminals draw the badge either way, and
/// the link rides along in the player header when there is one.
#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    Headshot { url: String, initials: String },
    Initials(String),
}

impl Avatar {
    pub fn resolve(player: &RosterPlayer) -> Self {
        let initials = initials(&player.name);
        match player.id {
            Some(id) => Avatar::Headshot {
                url: format!("{HEADSHOT_BASE}/{id}/headshot/67/current"),
                initials,
            },
            None => Avatar::Initials(initials),
        }
    }

    /// Two-letter badge drawn next to the player name.
    pub fn label(&self) -> &str {
        match self {
            Avatar::Headshot { initials, .. } => initials,
            Avatar::Initials(initials) => initials,
        }
    }

    /// Headshot URL, when one exists for this player.
    pub fn link(&self) -> Option<&str> {
        match self {
            Avatar::Headshot { url, .. } => Some(url),
            Avatar::Initials(_) => None,
        }
    }
}

fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() { "??".to_owned() } else { letters }
}
