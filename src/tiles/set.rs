use super::*;
use crate::COPIES;
use serde::Deserialize;
use serde::Serialize;

/// Which tiles make up the deck for a room.
///
/// - `Suited` — man, pin, sou only (108 tiles)
/// - `Sanma` — 1m and 9m, all pin and sou, all honors (108 tiles)
/// - `Full` — every suit and honor (136 tiles)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSet {
    Suited,
    #[default]
    Sanma,
    Full,
}

impl TileSet {
    pub fn contains(&self, tile: Tile) -> bool {
        match self {
            TileSet::Suited => !tile.is_honor(),
            TileSet::Sanma => tile.suit() != Suit::Man || tile.is_terminal(),
            TileSet::Full => true,
        }
    }
    /// Distinct kinds in this set, in index order.
    pub fn kinds(&self) -> Vec<Tile> {
        Tile::kinds().filter(|t| self.contains(*t)).collect()
    }
    /// Every physical tile, four copies per kind.
    pub fn tiles(&self) -> Vec<Tile> {
        self.kinds()
            .into_iter()
            .flat_map(|t| std::iter::repeat_n(t, COPIES as usize))
            .collect()
    }
    /// Fixed tile count for this set.
    pub fn total(&self) -> usize {
        self.kinds().len() * COPIES as usize
    }
    pub fn has_honors(&self) -> bool {
        !matches!(self, TileSet::Suited)
    }
}

impl std::fmt::Display for TileSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TileSet::Suited => write!(f, "suited"),
            TileSet::Sanma => write!(f, "sanma"),
            TileSet::Full => write!(f, "full"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn totals() {
        assert_eq!(TileSet::Suited.total(), 108);
        assert_eq!(TileSet::Sanma.total(), 108);
        assert_eq!(TileSet::Full.total(), 136);
    }
    #[test]
    fn sanma_drops_middle_characters() {
        assert!(!TileSet::Sanma.contains(Tile::try_from("5m").unwrap()));
        assert!(TileSet::Sanma.contains(Tile::try_from("9m").unwrap()));
        assert!(TileSet::Sanma.contains(Tile::try_from("7z").unwrap()));
        assert!(!TileSet::Suited.contains(Tile::try_from("1z").unwrap()));
    }
}
