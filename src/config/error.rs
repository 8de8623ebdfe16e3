use crate::tiles::TileSet;

/// Reasons a room configuration is refused before any session exists.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    Parse(String),
    Players(usize),
    Rounds,
    TileShortage { set: TileSet, needed: usize },
    PatternUnavailable { pattern: &'static str, set: TileSet },
    Scoring { field: &'static str, reason: &'static str },
    Timing { field: &'static str },
    Threshold { threshold: usize, players: usize },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(s) => write!(f, "unreadable configuration: {}", s),
            Self::Players(n) => write!(
                f,
                "player count {} outside {}..={}",
                n,
                crate::MIN_SEATS,
                crate::MAX_SEATS
            ),
            Self::Rounds => write!(f, "round count must be at least 1"),
            Self::TileShortage { set, needed } => {
                write!(f, "{} tile set cannot supply {} tiles", set, needed)
            }
            Self::PatternUnavailable { pattern, set } => {
                write!(f, "pattern {} is impossible with the {} tile set", pattern, set)
            }
            Self::Scoring { field, reason } => write!(f, "scoring.{} {}", field, reason),
            Self::Timing { field } => write!(f, "timing.{} must be positive", field),
            Self::Threshold { threshold, players } => write!(
                f,
                "dismiss threshold {} outside 1..={}",
                threshold, players
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
