use crate::Position;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    WaitingForDraw,
    AwaitingDiscard,
    ClaimWindowOpen,
    ResolvingClaims,
    RoundEnd,
    MatchEnd,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Whose turn it is and where the turn stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub active: Position,
    pub phase: Phase,
    /// Zero-based hand number within the match.
    pub round: usize,
    pub dealer: Position,
}

impl TurnState {
    pub fn new(dealer: Position, round: usize) -> Self {
        Self {
            active: dealer,
            phase: Phase::WaitingForDraw,
            round,
            dealer,
        }
    }
    pub fn is_awaiting(&self, seat: Position) -> bool {
        self.active == seat && self.phase == Phase::AwaitingDiscard
    }
}
