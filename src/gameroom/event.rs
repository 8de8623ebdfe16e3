use crate::Points;
use crate::Position;
use crate::claims::ClaimKind;
use crate::dismiss::Ballot;
use crate::dismiss::Outcome;
use crate::hand::Meld;
use crate::scoring::MatchResult;
use crate::scoring::Payment;
use crate::tiles::Tile;
use serde::Deserialize;
use serde::Serialize;

/// Everything a session announces. Serialized as `{cmd, data}` so the
/// variant name becomes the envelope command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "data")]
pub enum Event {
    RoundStarted {
        round: usize,
        dealer: Position,
        wall: usize,
    },
    /// Private to the seat.
    HandDealt { seat: Position, tiles: Vec<Tile> },
    /// The tile is only shown to the drawer.
    TileDrawn {
        seat: Position,
        tile: Option<Tile>,
        remaining: usize,
    },
    TileDiscarded {
        seat: Position,
        tile: Tile,
        forced: bool,
    },
    ClaimWindowOpened {
        window: u32,
        discarder: Position,
        tile: Tile,
        eligible: Vec<Position>,
        closes_in_ms: u64,
    },
    ClaimResolved {
        window: u32,
        tile: Tile,
        kind: Option<ClaimKind>,
        seats: Vec<Position>,
    },
    MeldDeclared { seat: Position, meld: Meld },
    KongBonus { seat: Position, payments: Vec<Payment> },
    RoundEnded(MatchResult),
    DealerRotated { from: Position, to: Position },
    TrusteeEngaged { seat: Position },
    TrusteeReleased { seat: Position },
    DismissVoteUpdated {
        outcome: Outcome,
        ballots: Vec<Ballot>,
    },
    MatchDissolved { reason: String },
    MatchEnded { standings: Vec<Points> },
    MatchAborted { reason: String },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::RoundStarted { .. } => "RoundStarted",
            Event::HandDealt { .. } => "HandDealt",
            Event::TileDrawn { .. } => "TileDrawn",
            Event::TileDiscarded { .. } => "TileDiscarded",
            Event::ClaimWindowOpened { .. } => "ClaimWindowOpened",
            Event::ClaimResolved { .. } => "ClaimResolved",
            Event::MeldDeclared { .. } => "MeldDeclared",
            Event::KongBonus { .. } => "KongBonus",
            Event::RoundEnded(_) => "RoundEnded",
            Event::DealerRotated { .. } => "DealerRotated",
            Event::TrusteeEngaged { .. } => "TrusteeEngaged",
            Event::TrusteeReleased { .. } => "TrusteeReleased",
            Event::DismissVoteUpdated { .. } => "DismissVoteUpdated",
            Event::MatchDissolved { .. } => "MatchDissolved",
            Event::MatchEnded { .. } => "MatchEnded",
            Event::MatchAborted { .. } => "MatchAborted",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Event::TileDiscarded { seat, tile, .. } => write!(f, "P{} discards {}", seat, tile),
            Event::MeldDeclared { seat, meld } => write!(f, "P{} declares {}", seat, meld),
            Event::DealerRotated { from, to } => write!(f, "dealer P{} -> P{}", from, to),
            e => write!(f, "{}", e.name()),
        }
    }
}

/// Who receives an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    All,
    Seat(Position),
    /// Everyone but the seat.
    Others(Position),
}

impl Audience {
    pub fn includes(&self, seat: Position) -> bool {
        match self {
            Audience::All => true,
            Audience::Seat(s) => *s == seat,
            Audience::Others(s) => *s != seat,
        }
    }
}

/// An event addressed to its audience.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub audience: Audience,
    pub event: Event,
}
