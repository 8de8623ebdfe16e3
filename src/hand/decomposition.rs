use super::*;
use crate::tiles::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Sets plus one pair.
    Standard,
    SevenPairs,
}

/// One way of reading a complete hand as a winning shape.
///
/// `groups` are the concealed groups (pairs included), `melds` the
/// exposed melds carried over from the hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    shape: Shape,
    groups: Vec<Meld>,
    melds: Vec<Meld>,
}

impl Decomposition {
    pub fn new(shape: Shape, groups: Vec<Meld>, melds: Vec<Meld>) -> Self {
        Self {
            shape,
            groups,
            melds,
        }
    }
    pub fn shape(&self) -> Shape {
        self.shape
    }
    pub fn groups(&self) -> &[Meld] {
        &self.groups
    }
    pub fn melds(&self) -> &[Meld] {
        &self.melds
    }
    /// Every non-pair group, concealed and exposed.
    pub fn sets(&self) -> impl Iterator<Item = &Meld> {
        self.groups
            .iter()
            .chain(self.melds.iter())
            .filter(|m| !matches!(m, Meld::Pair { .. }))
    }
    pub fn tiles(&self) -> Vec<Tile> {
        self.groups
            .iter()
            .chain(self.melds.iter())
            .flat_map(|m| m.tiles())
            .collect()
    }
    pub fn is_all_pungs(&self) -> bool {
        self.shape == Shape::Standard && self.sets().all(|m| m.is_triplet())
    }
    pub fn is_all_honors(&self) -> bool {
        self.tiles().iter().all(|t| t.is_honor())
    }
    /// Wait patterns the winning tile could have completed, one entry per
    /// concealed group containing it. `None` marks a role with no wait fan.
    pub fn waits(&self, winning: Tile) -> Vec<Option<Pattern>> {
        if self.shape == Shape::SevenPairs {
            return vec![None];
        }
        self.groups
            .iter()
            .filter(|g| g.contains(winning))
            .map(|g| match *g {
                Meld::Pair { .. } => Some(Pattern::PairWait),
                Meld::Chow { start, .. } if start.rank() == 1 && winning.rank() == 3 => {
                    Some(Pattern::EdgeWait)
                }
                Meld::Chow { start, .. } if start.rank() == 7 && winning.rank() == 7 => {
                    Some(Pattern::EdgeWait)
                }
                _ => None,
            })
            .collect()
    }
}

impl std::fmt::Display for Decomposition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = self
            .groups
            .iter()
            .chain(self.melds.iter())
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn t(s: &str) -> Tile {
        Tile::try_from(s).unwrap()
    }
    fn chow(s: &str) -> Meld {
        Meld::Chow {
            start: t(s),
            source: Provenance::Concealed,
        }
    }
    #[test]
    fn edge_waits() {
        let d = Decomposition::new(
            Shape::Standard,
            vec![Meld::Pair { tile: t("5z") }, chow("1p"), chow("7s")],
            vec![],
        );
        assert_eq!(d.waits(t("3p")), vec![Some(Pattern::EdgeWait)]);
        assert_eq!(d.waits(t("7s")), vec![Some(Pattern::EdgeWait)]);
        assert_eq!(d.waits(t("2p")), vec![None]);
        assert_eq!(d.waits(t("5z")), vec![Some(Pattern::PairWait)]);
    }
    #[test]
    fn all_pungs_counts_exposed_melds() {
        let d = Decomposition::new(
            Shape::Standard,
            vec![Meld::Pair { tile: t("1z") }],
            vec![chow("1s")],
        );
        assert!(!d.is_all_pungs());
    }
}
