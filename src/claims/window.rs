use super::*;
use crate::Position;
use crate::gameroom::ActionError;
use crate::tiles::Tile;
use std::collections::BTreeMap;
use std::time::Duration;

/// A seat's single answer to a claim window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Pass,
    Claim(ClaimRequest),
}

/// Bounded collection buffer for one discard.
///
/// Only seats holding a legal claim are eligible; everyone else is
/// treated as having passed. Each eligible seat decides exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimWindow {
    seq: u32,
    discarder: Position,
    tile: Tile,
    opened: Duration,
    closes: Duration,
    options: BTreeMap<Position, Options>,
    decisions: BTreeMap<Position, Decision>,
}

impl ClaimWindow {
    pub fn new(
        seq: u32,
        discarder: Position,
        tile: Tile,
        opened: Duration,
        closes: Duration,
        options: BTreeMap<Position, Options>,
    ) -> Self {
        Self {
            seq,
            discarder,
            tile,
            opened,
            closes,
            options: options
                .into_iter()
                .filter(|(seat, o)| *seat != discarder && !o.is_empty())
                .collect(),
            decisions: BTreeMap::new(),
        }
    }
}

/// Window accessors.
impl ClaimWindow {
    pub fn seq(&self) -> u32 {
        self.seq
    }
    pub fn discarder(&self) -> Position {
        self.discarder
    }
    pub fn tile(&self) -> Tile {
        self.tile
    }
    pub fn opened(&self) -> Duration {
        self.opened
    }
    pub fn closes(&self) -> Duration {
        self.closes
    }
    pub fn options(&self, seat: Position) -> Option<&Options> {
        self.options.get(&seat)
    }
    pub fn eligible(&self) -> Vec<Position> {
        self.options.keys().copied().collect()
    }
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
    pub fn pending(&self) -> Vec<Position> {
        self.options
            .keys()
            .filter(|s| !self.decisions.contains_key(s))
            .copied()
            .collect()
    }
    pub fn is_settled(&self) -> bool {
        self.options.keys().all(|s| self.decisions.contains_key(s))
    }
    pub fn claims(&self) -> impl Iterator<Item = &ClaimRequest> {
        self.decisions.values().filter_map(|d| match d {
            Decision::Claim(request) => Some(request),
            Decision::Pass => None,
        })
    }
}

/// Buffering decisions.
impl ClaimWindow {
    pub fn decide(&mut self, seat: Position, decision: Decision) -> Result<(), ActionError> {
        let options = self
            .options
            .get(&seat)
            .ok_or_else(|| ActionError::invalid(format!("P{} has no claim on {}", seat, self.tile)))?;
        if self.decisions.contains_key(&seat) {
            return Err(ActionError::invalid(format!(
                "P{} already decided on window {}",
                seat, self.seq
            )));
        }
        if let Decision::Claim(ref request) = decision {
            if request.seat != seat || request.tile != self.tile || !options.allows(request) {
                return Err(ActionError::invalid(format!("illegal claim {}", request)));
            }
        }
        self.decisions.insert(seat, decision);
        Ok(())
    }
}
