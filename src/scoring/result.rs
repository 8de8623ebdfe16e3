use crate::Fan;
use crate::ID;
use crate::Points;
use crate::Position;
use crate::gameroom::Room;
use crate::hand::Pattern;
use crate::tiles::Tile;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WinType {
    SelfDrawn,
    /// Won on a discard; `from` is the seat that shot it.
    Discard { from: Position },
    ExhaustiveDraw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Hu,
    Kong,
}

/// One transfer of points between two seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub from: Position,
    pub to: Position,
    pub amount: Points,
    pub reason: Reason,
}

/// How one winner's fan was reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub seat: Position,
    pub tile: Tile,
    pub hand: String,
    pub patterns: Vec<(Pattern, Fan)>,
    pub fan: Fan,
}

/// Immutable record of one finished round.
///
/// `deltas` is indexed by seat and always sums to zero: it is the net of
/// every hu and kong payment booked during the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub room: ID<Room>,
    pub round: usize,
    pub dealer: Position,
    pub win: WinType,
    pub winners: Vec<Position>,
    pub breakdowns: Vec<Breakdown>,
    pub payments: Vec<Payment>,
    pub deltas: Vec<Points>,
}

impl MatchResult {
    pub fn delta(&self, seat: Position) -> Points {
        self.deltas.get(seat).copied().unwrap_or_default()
    }
    pub fn is_draw(&self) -> bool {
        self.win == WinType::ExhaustiveDraw
    }
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
