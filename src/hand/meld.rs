use crate::Position;
use crate::tiles::*;
use serde::Deserialize;
use serde::Serialize;

/// Where a meld's tiles came from. Needed for "discarder pays" scoring
/// and for telling concealed kongs from exposed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Provenance {
    /// Formed entirely from the owner's own draws.
    Concealed,
    /// Completed with a discard from another seat.
    Claimed { from: Position },
    /// Exposed pung upgraded with a self-drawn fourth tile.
    Promoted { from: Position },
}

impl Provenance {
    pub fn from(&self) -> Option<Position> {
        match self {
            Provenance::Concealed => None,
            Provenance::Claimed { from } | Provenance::Promoted { from } => Some(*from),
        }
    }
}

/// A group of tiles within a hand.
///
/// Exposed melds live on [`Hand::melds`]; concealed groups only exist
/// inside a [`Decomposition`](super::Decomposition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Meld {
    Pung { tile: Tile, source: Provenance },
    Kong { tile: Tile, source: Provenance },
    /// Sequence of three, identified by its lowest tile.
    Chow { start: Tile, source: Provenance },
    Pair { tile: Tile },
}

impl Meld {
    pub fn tiles(&self) -> Vec<Tile> {
        match *self {
            Meld::Pung { tile, .. } => vec![tile; 3],
            Meld::Kong { tile, .. } => vec![tile; 4],
            Meld::Pair { tile } => vec![tile; 2],
            Meld::Chow { start, .. } => (0..3).filter_map(|i| start.step(i)).collect(),
        }
    }
    pub fn size(&self) -> usize {
        match self {
            Meld::Pair { .. } => 2,
            Meld::Pung { .. } | Meld::Chow { .. } => 3,
            Meld::Kong { .. } => 4,
        }
    }
    /// Lead tile: the repeated tile, or the lowest of a chow.
    pub fn tile(&self) -> Tile {
        match *self {
            Meld::Pung { tile, .. } | Meld::Kong { tile, .. } | Meld::Pair { tile } => tile,
            Meld::Chow { start, .. } => start,
        }
    }
    pub fn source(&self) -> Provenance {
        match *self {
            Meld::Pung { source, .. } | Meld::Kong { source, .. } | Meld::Chow { source, .. } => {
                source
            }
            Meld::Pair { .. } => Provenance::Concealed,
        }
    }
    pub fn contains(&self, tile: Tile) -> bool {
        self.tiles().contains(&tile)
    }
    /// Pungs and kongs; the building blocks of all-pungs.
    pub fn is_triplet(&self) -> bool {
        matches!(self, Meld::Pung { .. } | Meld::Kong { .. })
    }
    pub fn is_kong(&self) -> bool {
        matches!(self, Meld::Kong { .. })
    }
}

impl std::fmt::Display for Meld {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let tiles = self
            .tiles()
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join("");
        match self.source() {
            Provenance::Concealed => write!(f, "[{}]", tiles),
            Provenance::Claimed { from } | Provenance::Promoted { from } => {
                write!(f, "[{}<P{}]", tiles, from)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn t(s: &str) -> Tile {
        Tile::try_from(s).unwrap()
    }
    #[test]
    fn chow_tiles_ascend() {
        let chow = Meld::Chow {
            start: t("7s"),
            source: Provenance::Concealed,
        };
        assert_eq!(chow.tiles(), vec![t("7s"), t("8s"), t("9s")]);
        assert!(chow.contains(t("8s")));
        assert!(!chow.is_triplet());
    }
    #[test]
    fn sizes() {
        let source = Provenance::Claimed { from: 2 };
        assert_eq!(Meld::Kong { tile: t("1z"), source }.size(), 4);
        assert_eq!(Meld::Kong { tile: t("1z"), source }.tiles().len(), 4);
        assert_eq!(Meld::Pair { tile: t("1z") }.size(), 2);
        assert_eq!(Meld::Pung { tile: t("1z"), source }.source().from(), Some(2));
    }
    #[test]
    fn serializes_with_provenance() {
        let meld = Meld::Pung {
            tile: t("5p"),
            source: Provenance::Claimed { from: 1 },
        };
        let json = serde_json::to_string(&meld).unwrap();
        assert_eq!(serde_json::from_str::<Meld>(&json).unwrap(), meld);
    }
}
