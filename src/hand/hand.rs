use super::*;
use crate::SETS;
use crate::tiles::*;

/// One seat's tiles for the current round.
///
/// # Fields
///
/// - `counts` — concealed tiles, indexed by tile kind
/// - `melds` — exposed melds in the order they were declared
/// - `drawn` — the most recently drawn tile, while it is still undiscarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    counts: [u8; Tile::KINDS],
    melds: Vec<Meld>,
    drawn: Option<Tile>,
}

impl Default for Hand {
    fn default() -> Self {
        Self {
            counts: [0; Tile::KINDS],
            melds: Vec::new(),
            drawn: None,
        }
    }
}

impl From<Vec<Tile>> for Hand {
    fn from(tiles: Vec<Tile>) -> Self {
        let mut hand = Self::default();
        tiles.into_iter().for_each(|t| hand.add(t));
        hand
    }
}

/// grouped notation
/// digits accumulate until a suit letter closes the group
/// 123m55z
impl TryFrom<&str> for Hand {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut tiles = Vec::new();
        let mut ranks = Vec::new();
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            match c {
                '0'..='9' => ranks.push(c),
                'm' | 'p' | 's' | 'z' => {
                    for r in ranks.drain(..) {
                        tiles.push(Tile::try_from(format!("{}{}", r, c).as_str())?);
                    }
                }
                _ => return Err(anyhow::anyhow!("unexpected {:?} in hand {:?}", c, s)),
            }
        }
        if !ranks.is_empty() {
            return Err(anyhow::anyhow!("dangling ranks in hand {:?}", s));
        }
        Ok(Self::from(tiles))
    }
}

/// Concealed tile access and mutation.
impl Hand {
    pub fn count(&self, tile: Tile) -> u8 {
        self.counts[tile.index()]
    }
    pub fn counts(&self) -> &[u8; Tile::KINDS] {
        &self.counts
    }
    pub fn contains(&self, tile: Tile) -> bool {
        self.count(tile) > 0
    }
    pub fn add(&mut self, tile: Tile) {
        self.counts[tile.index()] += 1;
    }
    /// Removes `n` copies, all or nothing.
    pub fn take(&mut self, tile: Tile, n: u8) -> bool {
        match self.counts[tile.index()] >= n {
            true => {
                self.counts[tile.index()] -= n;
                true
            }
            false => false,
        }
    }
    pub fn remove(&mut self, tile: Tile) -> bool {
        self.take(tile, 1)
    }
    /// Concealed tiles in index order, one entry per copy.
    pub fn concealed(&self) -> Vec<Tile> {
        Tile::kinds()
            .flat_map(|t| std::iter::repeat_n(t, self.count(t) as usize))
            .collect()
    }
    /// Distinct concealed kinds in index order.
    pub fn kinds(&self) -> Vec<Tile> {
        Tile::kinds().filter(|t| self.contains(*t)).collect()
    }
    pub fn concealed_len(&self) -> usize {
        self.counts.iter().map(|c| *c as usize).sum()
    }
}

/// Exposed melds and draw marker.
impl Hand {
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }
    pub fn expose(&mut self, meld: Meld) {
        self.melds.push(meld);
    }
    /// Replaces an exposed pung of `tile` with a promoted kong.
    pub fn promote(&mut self, tile: Tile) -> bool {
        match self
            .melds
            .iter_mut()
            .find(|m| matches!(m, Meld::Pung { tile: t, .. } if *t == tile))
        {
            Some(meld) => {
                let from = meld.source().from().unwrap_or_default();
                *meld = Meld::Kong {
                    tile,
                    source: Provenance::Promoted { from },
                };
                true
            }
            None => false,
        }
    }
    pub fn drawn(&self) -> Option<Tile> {
        self.drawn
    }
    pub fn mark_drawn(&mut self, tile: Tile) {
        self.drawn = Some(tile);
    }
    pub fn clear_drawn(&mut self) {
        self.drawn = None;
    }
    /// Tiles held in any form: concealed plus every exposed meld tile.
    pub fn size(&self) -> usize {
        self.concealed_len() + self.meld_tiles()
    }
    pub fn meld_tiles(&self) -> usize {
        self.melds.iter().map(|m| m.size()).sum()
    }
    /// Concealed sets still required for a standard winning shape.
    pub fn sets_needed(&self) -> usize {
        SETS.saturating_sub(self.melds.len())
    }
    /// One tile short of a complete shape (waiting for a draw or claim).
    pub fn is_waiting_size(&self) -> bool {
        self.concealed_len() == 3 * self.sets_needed() + 1
    }
    /// Holding a full shape (must discard or declare hu).
    pub fn is_complete_size(&self) -> bool {
        self.concealed_len() == 3 * self.sets_needed() + 2
    }
    /// Every tile in the hand, concealed and exposed.
    pub fn all_tiles(&self) -> Vec<Tile> {
        self.concealed()
            .into_iter()
            .chain(self.melds.iter().flat_map(|m| m.tiles()))
            .collect()
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut out = String::new();
        for suit in Suit::all() {
            let ranks = self
                .concealed()
                .into_iter()
                .filter(|t| t.suit() == suit)
                .map(|t| t.to_string().chars().next().unwrap_or('?'))
                .collect::<String>();
            if !ranks.is_empty() {
                out.push_str(&ranks);
                out.push_str(&suit.to_string());
            }
        }
        for meld in self.melds.iter() {
            out.push(' ');
            out.push_str(&meld.to_string());
        }
        write!(f, "{}", out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parses_grouped_notation() {
        let hand = Hand::try_from("123m 55z").unwrap();
        assert_eq!(hand.concealed_len(), 5);
        assert_eq!(hand.count(Tile::try_from("5z").unwrap()), 2);
        assert!(Hand::try_from("12").is_err());
        assert!(Hand::try_from("12x").is_err());
    }
    #[test]
    fn take_is_all_or_nothing() {
        let mut hand = Hand::try_from("11p").unwrap();
        let one = Tile::try_from("1p").unwrap();
        assert!(!hand.take(one, 3));
        assert_eq!(hand.count(one), 2);
        assert!(hand.take(one, 2));
        assert_eq!(hand.concealed_len(), 0);
    }
    #[test]
    fn shape_sizes_account_for_melds() {
        let mut hand = Hand::try_from("11123456789999p").unwrap();
        assert_eq!(hand.concealed_len(), 14);
        assert!(hand.is_complete_size());
        hand.remove(Tile::try_from("9p").unwrap());
        assert!(hand.is_waiting_size());
        let tile = Tile::try_from("1p").unwrap();
        hand.take(tile, 3);
        hand.expose(Meld::Pung {
            tile,
            source: Provenance::Claimed { from: 1 },
        });
        assert!(hand.is_waiting_size());
        assert_eq!(hand.size(), 13);
    }
    #[test]
    fn promotes_pung_to_kong() {
        let tile = Tile::try_from("3s").unwrap();
        let mut hand = Hand::default();
        hand.expose(Meld::Pung {
            tile,
            source: Provenance::Claimed { from: 2 },
        });
        assert!(hand.promote(tile));
        assert_eq!(
            hand.melds()[0],
            Meld::Kong {
                tile,
                source: Provenance::Promoted { from: 2 }
            }
        );
        assert!(!hand.promote(Tile::try_from("4s").unwrap()));
    }
    #[test]
    fn displays_grouped() {
        let hand = Hand::try_from("3s1m2m77z").unwrap();
        assert_eq!(hand.to_string(), "12m3s77z");
    }
}
