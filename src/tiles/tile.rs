use super::suit::Suit;
use serde::Deserialize;
use serde::Serialize;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;

/// A tile kind. Copies of the same kind are indistinguishable,
/// so tiles compare by value.
///
/// Ordering follows the 34-kind index: 1m..9m, 1p..9p, 1s..9s, E S W N, white green red.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tile {
    suit: Suit,
    rank: u8,
}

impl Tile {
    /// Number of distinct tile kinds.
    pub const KINDS: usize = 34;

    pub fn new(suit: Suit, rank: u8) -> Option<Self> {
        (1..=suit.ranks())
            .contains(&rank)
            .then_some(Self { suit, rank })
    }
    pub fn suit(&self) -> Suit {
        self.suit
    }
    pub fn rank(&self) -> u8 {
        self.rank
    }
    pub fn index(&self) -> usize {
        u8::from(*self) as usize
    }
    pub fn is_honor(&self) -> bool {
        self.suit.is_honor()
    }
    pub fn is_terminal(&self) -> bool {
        !self.is_honor() && (self.rank == 1 || self.rank == 9)
    }
    pub fn is_simple(&self) -> bool {
        !self.is_honor() && !self.is_terminal()
    }
    /// Same-suit neighbour `delta` ranks away, for numbered suits only.
    pub fn step(&self, delta: i8) -> Option<Self> {
        if self.is_honor() {
            return None;
        }
        let rank = self.rank as i8 + delta;
        u8::try_from(rank)
            .ok()
            .and_then(|r| Self::new(self.suit, r))
    }
    /// Every tile kind in index order.
    pub fn kinds() -> impl Iterator<Item = Tile> {
        (0..Self::KINDS as u8).map(|i| Tile::try_from(i).expect("kind index in range"))
    }
}

/// u8 isomorphism
/// each kind maps to its position in the 34-kind ordering
/// 5p
/// 13
impl From<Tile> for u8 {
    fn from(t: Tile) -> u8 {
        t.suit.offset() + t.rank - 1
    }
}
impl TryFrom<u8> for Tile {
    type Error = anyhow::Error;
    fn try_from(n: u8) -> std::result::Result<Self, Self::Error> {
        Suit::all()
            .into_iter()
            .rev()
            .find(|s| n >= s.offset())
            .filter(|_| (n as usize) < Self::KINDS)
            .map(|suit| Self {
                suit,
                rank: n - suit.offset() + 1,
            })
            .ok_or_else(|| anyhow::anyhow!("invalid tile index {}", n))
    }
}

/// string isomorphism
/// numbered tiles are `<rank><m|p|s>`, honors are `1z`..`4z` winds and `5z`..`7z` dragons
impl TryFrom<&str> for Tile {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> std::result::Result<Self, Self::Error> {
        let s = s.trim();
        let mut chars = s.chars();
        let rank = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .ok_or_else(|| anyhow::anyhow!("invalid tile rank in {:?}", s))? as u8;
        let tile = match (chars.next(), chars.next()) {
            (Some('m'), None) => Tile::new(Suit::Man, rank),
            (Some('p'), None) => Tile::new(Suit::Pin, rank),
            (Some('s'), None) => Tile::new(Suit::Sou, rank),
            (Some('z'), None) if rank <= 4 => Tile::new(Suit::Wind, rank),
            (Some('z'), None) => Tile::new(Suit::Dragon, rank.saturating_sub(4)),
            _ => None,
        };
        tile.ok_or_else(|| anyhow::anyhow!("invalid tile {:?}", s))
    }
}
impl TryFrom<String> for Tile {
    type Error = anyhow::Error;
    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        Tile::try_from(s.as_str())
    }
}
impl From<Tile> for String {
    fn from(t: Tile) -> String {
        t.to_string()
    }
}

impl Display for Tile {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self.suit {
            Suit::Dragon => write!(f, "{}{}", self.rank + 4, self.suit),
            _ => write!(f, "{}{}", self.rank, self.suit),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn index_covers_all_kinds() {
        let kinds = Tile::kinds().collect::<Vec<_>>();
        assert_eq!(kinds.len(), Tile::KINDS);
        assert!(kinds.windows(2).all(|w| w[0] < w[1]));
        assert!(Tile::try_from(34u8).is_err());
    }
    #[test]
    fn notation() {
        assert_eq!(Tile::try_from("5p").unwrap(), Tile::new(Suit::Pin, 5).unwrap());
        assert_eq!(Tile::try_from("2z").unwrap(), Tile::new(Suit::Wind, 2).unwrap());
        assert_eq!(Tile::try_from("7z").unwrap(), Tile::new(Suit::Dragon, 3).unwrap());
        assert_eq!(Tile::new(Suit::Dragon, 1).unwrap().to_string(), "5z");
        assert!(Tile::try_from("0m").is_err());
        assert!(Tile::try_from("8z").is_err());
        assert!(Tile::try_from("5x").is_err());
    }
    #[test]
    fn classes() {
        assert!(Tile::try_from("1m").unwrap().is_terminal());
        assert!(Tile::try_from("5s").unwrap().is_simple());
        assert!(Tile::try_from("6z").unwrap().is_honor());
    }
    #[test]
    fn steps_stay_in_suit() {
        let nine = Tile::try_from("9m").unwrap();
        assert_eq!(nine.step(1), None);
        assert_eq!(nine.step(-2), Some(Tile::try_from("7m").unwrap()));
        assert_eq!(Tile::try_from("1z").unwrap().step(1), None);
    }
    #[test]
    fn serializes_as_notation() {
        let tile = Tile::try_from("3s").unwrap();
        assert_eq!(serde_json::to_string(&tile).unwrap(), "\"3s\"");
        assert_eq!(serde_json::from_str::<Tile>("\"3s\"").unwrap(), tile);
    }
}
