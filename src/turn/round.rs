use crate::DEAL;
use crate::Position;
use crate::gameroom::ActionError;
use crate::gameroom::InvariantViolation;
use crate::hand::*;
use crate::tiles::*;

/// Tile flow for one hand: the wall, every seat's hand, and every
/// seat's discard pile.
///
/// Every mutation moves whole tiles between these places, so the union
/// of all of them always equals the configured tile set. [`Round::audit`]
/// checks exactly that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    set: TileSet,
    wall: Wall,
    hands: Vec<Hand>,
    discards: Vec<Vec<Tile>>,
}

impl Round {
    /// Deals thirteen tiles to each seat in consecutive blocks,
    /// starting with the dealer.
    pub fn deal(
        set: TileSet,
        mut wall: Wall,
        players: usize,
        dealer: Position,
    ) -> Result<Self, InvariantViolation> {
        let mut hands = vec![Hand::default(); players];
        for i in 0..players {
            let seat = (dealer + i) % players;
            for _ in 0..DEAL {
                let tile = wall
                    .draw()
                    .ok_or_else(|| InvariantViolation(format!("wall too short to deal P{}", seat)))?;
                hands[seat].add(tile);
            }
        }
        let round = Self {
            set,
            wall,
            hands,
            discards: vec![Vec::new(); players],
        };
        round.audit()?;
        Ok(round)
    }
}

impl Round {
    /// Undealt table: every tile still in the wall.
    pub fn idle(set: TileSet, players: usize) -> Self {
        Self {
            set,
            wall: Wall::from(set),
            hands: vec![Hand::default(); players],
            discards: vec![Vec::new(); players],
        }
    }
}

/// Read-only views.
impl Round {
    pub fn hand(&self, seat: Position) -> &Hand {
        &self.hands[seat]
    }
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }
    pub fn discards(&self, seat: Position) -> &[Tile] {
        &self.discards[seat]
    }
    pub fn remaining(&self) -> usize {
        self.wall.len()
    }
    pub fn set(&self) -> TileSet {
        self.set
    }
}

/// Own-turn moves.
impl Round {
    pub fn draw(&mut self, seat: Position) -> Option<Tile> {
        let tile = self.wall.draw()?;
        let hand = &mut self.hands[seat];
        hand.add(tile);
        hand.mark_drawn(tile);
        Some(tile)
    }
    pub fn discard(&mut self, seat: Position, tile: Tile) -> Result<(), ActionError> {
        let hand = &mut self.hands[seat];
        if !hand.remove(tile) {
            return Err(ActionError::invalid(format!("P{} does not hold {}", seat, tile)));
        }
        hand.clear_drawn();
        self.discards[seat].push(tile);
        Ok(())
    }
    pub fn concealed_kong(&mut self, seat: Position, tile: Tile) -> Result<Meld, ActionError> {
        let hand = &mut self.hands[seat];
        if !hand.take(tile, 4) {
            return Err(ActionError::invalid(format!("P{} lacks four {}", seat, tile)));
        }
        let meld = Meld::Kong {
            tile,
            source: Provenance::Concealed,
        };
        hand.expose(meld);
        hand.clear_drawn();
        Ok(meld)
    }
    pub fn added_kong(&mut self, seat: Position, tile: Tile) -> Result<Meld, ActionError> {
        let hand = &mut self.hands[seat];
        let exposed = hand
            .melds()
            .iter()
            .any(|m| matches!(m, Meld::Pung { tile: t, .. } if *t == tile));
        if !exposed || !hand.contains(tile) {
            return Err(ActionError::invalid(format!("P{} cannot promote {}", seat, tile)));
        }
        hand.remove(tile);
        hand.promote(tile);
        hand.clear_drawn();
        hand.melds()
            .iter()
            .find(|m| m.is_kong() && m.tile() == tile)
            .copied()
            .ok_or_else(|| ActionError::invalid(format!("P{} cannot promote {}", seat, tile)))
    }
}

/// Claims on the most recent discard.
impl Round {
    /// Checks the claimed discard and the claimant's tiles, then moves
    /// them all. Nothing moves unless everything is present.
    fn take_claim(
        &mut self,
        seat: Position,
        from: Position,
        tile: Tile,
        concealed: &[Tile],
    ) -> Result<(), InvariantViolation> {
        if self.discards[from].last() != Some(&tile) {
            return Err(InvariantViolation(format!(
                "P{} pile ends in {:?}, expected {}",
                from,
                self.discards[from].last(),
                tile
            )));
        }
        let hand = &self.hands[seat];
        if let Some(missing) = concealed
            .iter()
            .find(|t| hand.count(**t) < concealed.iter().filter(|c| c == t).count() as u8)
        {
            return Err(InvariantViolation(format!("P{} lacks {} to claim {}", seat, missing, tile)));
        }
        for t in concealed {
            self.hands[seat].remove(*t);
        }
        self.discards[from].pop();
        Ok(())
    }
    pub fn claim_pung(&mut self, seat: Position, from: Position, tile: Tile) -> Result<Meld, InvariantViolation> {
        self.take_claim(seat, from, tile, &[tile; 2])?;
        let meld = Meld::Pung {
            tile,
            source: Provenance::Claimed { from },
        };
        self.hands[seat].expose(meld);
        Ok(meld)
    }
    pub fn claim_kong(&mut self, seat: Position, from: Position, tile: Tile) -> Result<Meld, InvariantViolation> {
        self.take_claim(seat, from, tile, &[tile; 3])?;
        let meld = Meld::Kong {
            tile,
            source: Provenance::Claimed { from },
        };
        self.hands[seat].expose(meld);
        Ok(meld)
    }
    pub fn claim_chow(
        &mut self,
        seat: Position,
        from: Position,
        tile: Tile,
        start: Tile,
    ) -> Result<Meld, InvariantViolation> {
        let others = (0..3)
            .filter_map(|i| start.step(i))
            .filter(|t| *t != tile)
            .collect::<Vec<_>>();
        if others.len() != 2 {
            return Err(InvariantViolation(format!("{} is not in a chow from {}", tile, start)));
        }
        self.take_claim(seat, from, tile, &others)?;
        let meld = Meld::Chow {
            start,
            source: Provenance::Claimed { from },
        };
        self.hands[seat].expose(meld);
        Ok(meld)
    }
}

/// Conservation audit.
impl Round {
    /// Wall, hands, melds and discard piles together must hold exactly
    /// four copies of every kind in the tile set.
    pub fn audit(&self) -> Result<(), InvariantViolation> {
        let mut counts = [0usize; Tile::KINDS];
        let held = self.hands.iter().flat_map(|h| h.all_tiles());
        let piled = self.discards.iter().flatten().copied();
        for tile in self.wall.tiles().copied().chain(held).chain(piled) {
            counts[tile.index()] += 1;
        }
        let mut expected = [0usize; Tile::KINDS];
        for tile in self.set.tiles() {
            expected[tile.index()] += 1;
        }
        match counts == expected {
            true => Ok(()),
            false => {
                let (total, fixed) = (counts.iter().sum::<usize>(), self.set.total());
                let kinds = Tile::kinds()
                    .filter(|t| counts[t.index()] != expected[t.index()])
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>();
                Err(InvariantViolation(format!(
                    "{} tiles accounted for, {} expected; mismatched kinds {}",
                    total,
                    fixed,
                    kinds.join(",")
                )))
            }
        }
    }
    #[cfg(test)]
    pub(crate) fn hand_mut(&mut self, seat: Position) -> &mut Hand {
        &mut self.hands[seat]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn t(s: &str) -> Tile {
        Tile::try_from(s).unwrap()
    }
    /// P0 nine gates in pin, P1 honors, P2 nine gates in sou; `extra`
    /// are the next tiles off the wall.
    fn round(extra: &[&str]) -> Round {
        let mut head = Vec::new();
        head.extend(Hand::try_from("1112345678999p").unwrap().concealed());
        head.extend(Hand::try_from("1122334455667z").unwrap().concealed().into_iter().take(13));
        head.extend(Hand::try_from("1112345678999s").unwrap().concealed());
        head.extend(extra.iter().map(|s| t(s)));
        let wall = Wall::arranged(TileSet::Sanma, &head).unwrap();
        Round::deal(TileSet::Sanma, wall, 3, 0).unwrap()
    }
    #[test]
    fn deals_thirteen_in_blocks() {
        let round = round(&[]);
        assert_eq!(round.hand(0).count(t("1p")), 3);
        assert_eq!(round.hand(1).count(t("1z")), 2);
        assert_eq!(round.hand(2).count(t("9s")), 3);
        assert!(round.hands().iter().all(|h| h.concealed_len() == 13));
        assert_eq!(round.remaining(), 108 - 39);
        assert!(round.audit().is_ok());
    }
    #[test]
    fn deal_starts_with_dealer() {
        let head = Hand::try_from("1111222233334z").unwrap().concealed();
        let wall = Wall::arranged(TileSet::Sanma, &head).unwrap();
        let round = Round::deal(TileSet::Sanma, wall, 3, 2).unwrap();
        assert_eq!(round.hand(2).count(t("1z")), 4);
        assert_eq!(round.hand(0).count(t("1z")), 0);
    }
    #[test]
    fn short_wall_cannot_deal() {
        let mut wall = Wall::shuffled(TileSet::Sanma, 0);
        wall.by_ref().take(80).for_each(drop);
        assert!(Round::deal(TileSet::Sanma, wall, 3, 0).is_err());
    }
    #[test]
    fn draw_and_discard() {
        let mut round = round(&["7z"]);
        assert_eq!(round.draw(0), Some(t("7z")));
        assert_eq!(round.hand(0).drawn(), Some(t("7z")));
        assert!(round.discard(0, t("1s")).is_err());
        round.discard(0, t("7z")).unwrap();
        assert_eq!(round.discards(0), &[t("7z")]);
        assert_eq!(round.hand(0).drawn(), None);
        assert!(round.audit().is_ok());
    }
    #[test]
    fn claims_move_the_discard_into_a_meld() {
        let mut round = round(&["1z", "9p"]);
        round.draw(0);
        round.discard(0, t("1z")).unwrap();
        assert!(round.claim_pung(2, 0, t("1z")).is_err());
        let meld = round.claim_pung(1, 0, t("1z")).unwrap();
        assert_eq!(meld.source().from(), Some(0));
        assert!(round.discards(0).is_empty());
        round.discard(1, t("7z")).unwrap();
        round.draw(2);
        round.discard(2, t("9p")).unwrap();
        assert!(round.claim_kong(0, 1, t("9p")).is_err());
        assert!(round.claim_kong(0, 2, t("9p")).unwrap().is_kong());
        assert_eq!(round.hand(0).concealed_len(), 10);
        assert!(round.audit().is_ok());
    }
    #[test]
    fn chow_takes_the_two_neighbours() {
        let mut round = round(&["7z", "4p"]);
        round.draw(0);
        round.discard(0, t("7z")).unwrap();
        round.draw(1);
        round.discard(1, t("4p")).unwrap();
        assert!(round.claim_chow(0, 1, t("4p"), t("5p")).is_err());
        let meld = round.claim_chow(0, 1, t("4p"), t("2p")).unwrap();
        assert_eq!(meld.tiles(), vec![t("2p"), t("3p"), t("4p")]);
        assert!(!round.hand(0).contains(t("2p")));
        assert!(round.audit().is_ok());
    }
    #[test]
    fn own_turn_kongs() {
        let mut round = round(&["1p"]);
        assert!(round.concealed_kong(0, t("1p")).is_err());
        round.draw(0);
        round.concealed_kong(0, t("1p")).unwrap();
        assert_eq!(round.hand(0).melds().len(), 1);
        assert!(round.audit().is_ok());
        let mut round = self::round(&["1z", "1z"]);
        round.draw(0);
        round.discard(0, t("1z")).unwrap();
        round.claim_pung(1, 0, t("1z")).unwrap();
        round.discard(1, t("7z")).unwrap();
        assert!(round.added_kong(1, t("1z")).is_err());
        round.draw(1);
        let meld = round.added_kong(1, t("1z")).unwrap();
        assert_eq!(meld.source(), Provenance::Promoted { from: 0 });
        assert!(round.audit().is_ok());
    }
    #[test]
    fn idle_table_conserves() {
        let round = Round::idle(TileSet::Full, 3);
        assert_eq!(round.remaining(), 136);
        assert!(round.audit().is_ok());
    }
    #[test]
    fn audit_catches_phantom_tiles() {
        let mut round = round(&[]);
        round.hand_mut(1).add(t("5z"));
        assert!(round.audit().is_err());
    }
}
