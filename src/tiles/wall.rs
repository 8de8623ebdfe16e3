use super::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// Remaining undealt tile stock. Tiles are drawn from one end only.
///
/// Stored in reverse draw order so drawing is a pop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wall(Vec<Tile>);

impl Wall {
    /// Full set shuffled deterministically from a seed.
    pub fn shuffled(set: TileSet, seed: u64) -> Self {
        let mut tiles = set.tiles();
        tiles.shuffle(&mut SmallRng::seed_from_u64(seed));
        Self(tiles)
    }
    /// Full set where `head` is drawn first, in order, followed by the
    /// rest of the set in index order. Used for replays and rigged deals.
    pub fn arranged(set: TileSet, head: &[Tile]) -> anyhow::Result<Self> {
        let mut rest = set.tiles();
        for tile in head {
            let i = rest
                .iter()
                .position(|t| t == tile)
                .ok_or_else(|| anyhow::anyhow!("{} exhausted or absent from {} set", tile, set))?;
            rest.remove(i);
        }
        let order = head.iter().copied().chain(rest).collect::<Vec<_>>();
        Ok(Self(order.into_iter().rev().collect()))
    }
    /// Removes the next tile, or None when the wall is exhausted.
    pub fn draw(&mut self) -> Option<Tile> {
        self.0.pop()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.0.iter()
    }
}

/// Unshuffled, in index order.
impl From<TileSet> for Wall {
    fn from(set: TileSet) -> Self {
        Self(set.tiles().into_iter().rev().collect())
    }
}

impl Iterator for Wall {
    type Item = Tile;
    fn next(&mut self) -> Option<Self::Item> {
        self.draw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn shuffled_is_deterministic() {
        let a = Wall::shuffled(TileSet::Sanma, 7);
        let b = Wall::shuffled(TileSet::Sanma, 7);
        let c = Wall::shuffled(TileSet::Sanma, 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 108);
    }
    #[test]
    fn arranged_draws_head_first() {
        let head = ["7z", "7z", "1p"].map(|s| Tile::try_from(s).unwrap());
        let mut wall = Wall::arranged(TileSet::Full, &head).unwrap();
        assert_eq!(wall.len(), 136);
        assert_eq!(wall.draw(), Some(head[0]));
        assert_eq!(wall.draw(), Some(head[1]));
        assert_eq!(wall.draw(), Some(head[2]));
        assert_eq!(wall.len(), 133);
    }
    #[test]
    fn arranged_rejects_fifth_copy() {
        let head = [Tile::try_from("1s").unwrap(); 5];
        assert!(Wall::arranged(TileSet::Sanma, &head).is_err());
        assert!(Wall::arranged(TileSet::Suited, &[Tile::try_from("1z").unwrap()]).is_err());
    }
    #[test]
    fn exhausts() {
        let mut wall = Wall::shuffled(TileSet::Suited, 1);
        assert_eq!(wall.by_ref().count(), 108);
        assert!(wall.is_empty());
        assert_eq!(wall.draw(), None);
    }
}
