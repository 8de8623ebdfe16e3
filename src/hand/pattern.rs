use crate::Fan;
use crate::config::Fans;
use crate::config::Patterns;
use serde::Deserialize;
use serde::Serialize;

/// Special hand patterns that earn fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    SevenPairs,
    AllPungs,
    AllHonors,
    /// Winning tile completed 1-2-3 as the 3, or 7-8-9 as the 7.
    EdgeWait,
    /// Winning tile completed the pair.
    PairWait,
}

impl Pattern {
    pub fn enabled(&self, toggles: &Patterns) -> bool {
        match self {
            Pattern::SevenPairs => toggles.seven_pairs,
            Pattern::AllPungs => toggles.all_pungs,
            Pattern::AllHonors => toggles.all_honors,
            Pattern::EdgeWait => toggles.edge_wait,
            Pattern::PairWait => toggles.pair_wait,
        }
    }
    pub fn fan(&self, fans: &Fans) -> Fan {
        match self {
            Pattern::SevenPairs => fans.seven_pairs,
            Pattern::AllPungs => fans.all_pungs,
            Pattern::AllHonors => fans.all_honors,
            Pattern::EdgeWait => fans.edge_wait,
            Pattern::PairWait => fans.pair_wait,
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Pattern::SevenPairs => write!(f, "seven pairs"),
            Pattern::AllPungs => write!(f, "all pungs"),
            Pattern::AllHonors => write!(f, "all honors"),
            Pattern::EdgeWait => write!(f, "edge wait"),
            Pattern::PairWait => write!(f, "pair wait"),
        }
    }
}
