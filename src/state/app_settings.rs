use log::LevelFilter;
use std::str::FromStr;

/// Batting logs are queried for this season unless DUGOUT_SEASON overrides it.
pub const DEFAULT_SEASON: u16 = 2025;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Season the player-log endpoint is queried for. A configuration
    /// constant, not user-selectable at runtime.
    pub season: u16,
}

impl AppSettings {
    pub fn load() -> Self {
        let season = std::env::var("DUGOUT_SEASON")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_SEASON);
        let log_level = std::env::var("DUGOUT_LOG")
            .ok()
            .and_then(|s| LevelFilter::from_str(s.trim()).ok());
        Self { full_screen: false, log_level, season }
    }
}
