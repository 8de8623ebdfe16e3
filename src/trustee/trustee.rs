use crate::Position;
use crate::hand::Hand;
use crate::tiles::Tile;

/// Which seats are under automatic control.
///
/// A seat becomes engaged after a forced action is followed by a full
/// trustee timeout of silence, and is released by its next manual action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trustee {
    engaged: Vec<bool>,
}

impl Trustee {
    pub fn new(players: usize) -> Self {
        Self {
            engaged: vec![false; players],
        }
    }
    pub fn is_engaged(&self, seat: Position) -> bool {
        self.engaged.get(seat).copied().unwrap_or(false)
    }
    /// True if the seat was not already engaged.
    pub fn engage(&mut self, seat: Position) -> bool {
        match self.engaged.get_mut(seat) {
            Some(flag) if !*flag => {
                *flag = true;
                true
            }
            _ => false,
        }
    }
    /// True if the seat had been engaged.
    pub fn release(&mut self, seat: Position) -> bool {
        match self.engaged.get_mut(seat) {
            Some(flag) if *flag => {
                *flag = false;
                true
            }
            _ => false,
        }
    }
    pub fn engaged(&self) -> Vec<Position> {
        self.engaged
            .iter()
            .enumerate()
            .filter(|(_, e)| **e)
            .map(|(i, _)| i)
            .collect()
    }
    /// The discard substituted for a seat that did not act.
    pub fn discard(&self, hand: &Hand) -> Option<Tile> {
        super::heuristic(hand)
    }
}
