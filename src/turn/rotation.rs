use crate::Position;
use crate::config::Rotation;
use serde::Deserialize;
use serde::Serialize;

/// What happens to the dealer seat after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rotate {
    Keep,
    /// Next seat downstream.
    Advance,
    /// First winner in downstream order. Same as Keep on draws.
    Winner,
}

impl Rotation {
    /// Dealer for the next round, given this round's winners in
    /// downstream order.
    pub fn next_dealer(&self, dealer: Position, winners: &[Position], players: usize) -> Position {
        let rule = match winners {
            [] => self.on_draw,
            w if w.contains(&dealer) => self.on_win,
            _ => self.on_lose,
        };
        match rule {
            Rotate::Keep => dealer,
            Rotate::Advance => (dealer + 1) % players,
            Rotate::Winner => winners.first().copied().unwrap_or(dealer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn rotation(on_win: Rotate, on_lose: Rotate, on_draw: Rotate) -> Rotation {
        Rotation {
            on_win,
            on_lose,
            on_draw,
        }
    }
    #[test]
    fn house_rules() {
        let r = Rotation::default();
        assert_eq!(r.next_dealer(0, &[0], 3), 0);
        assert_eq!(r.next_dealer(0, &[2], 3), 1);
        assert_eq!(r.next_dealer(2, &[1], 3), 0);
        assert_eq!(r.next_dealer(1, &[], 3), 1);
    }
    #[test]
    fn winner_takes_the_deal() {
        let r = rotation(Rotate::Keep, Rotate::Winner, Rotate::Winner);
        assert_eq!(r.next_dealer(0, &[2, 1], 3), 2);
        assert_eq!(r.next_dealer(0, &[], 3), 0);
    }
    #[test]
    fn advance_on_every_outcome() {
        let r = rotation(Rotate::Advance, Rotate::Advance, Rotate::Advance);
        assert_eq!(r.next_dealer(0, &[0], 3), 1);
        assert_eq!(r.next_dealer(1, &[0], 3), 2);
        assert_eq!(r.next_dealer(2, &[], 3), 0);
        assert_eq!(r.next_dealer(1, &[], 2), 0);
    }
}
