use serde::Deserialize;
use serde::Serialize;

/// Tile families. Numbered suits run 1-9, winds 1-4 (E S W N),
/// dragons 1-3 (white, green, red).
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Man = 0,
    Pin = 1,
    Sou = 2,
    Wind = 3,
    Dragon = 4,
}

impl Suit {
    pub const fn all() -> [Suit; 5] {
        [Suit::Man, Suit::Pin, Suit::Sou, Suit::Wind, Suit::Dragon]
    }
    /// Highest rank in this family.
    pub const fn ranks(&self) -> u8 {
        match self {
            Suit::Man | Suit::Pin | Suit::Sou => 9,
            Suit::Wind => 4,
            Suit::Dragon => 3,
        }
    }
    /// Index of rank 1 of this family in the 34-kind ordering.
    pub const fn offset(&self) -> u8 {
        match self {
            Suit::Man => 0,
            Suit::Pin => 9,
            Suit::Sou => 18,
            Suit::Wind => 27,
            Suit::Dragon => 31,
        }
    }
    pub const fn is_honor(&self) -> bool {
        matches!(self, Suit::Wind | Suit::Dragon)
    }
}

impl From<Suit> for u8 {
    fn from(s: Suit) -> u8 {
        s as u8
    }
}

impl TryFrom<u8> for Suit {
    type Error = anyhow::Error;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Suit::all()
            .into_iter()
            .find(|s| *s as u8 == n)
            .ok_or_else(|| anyhow::anyhow!("invalid suit {}", n))
    }
}

impl std::fmt::Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Suit::Man => "m",
                Suit::Pin => "p",
                Suit::Sou => "s",
                Suit::Wind | Suit::Dragon => "z",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn offsets_tile_the_kind_space() {
        let total = Suit::all().iter().map(|s| s.ranks() as usize).sum::<usize>();
        assert_eq!(total, 34);
        assert_eq!(Suit::Dragon.offset() + Suit::Dragon.ranks(), 34);
    }
    #[test]
    fn honors() {
        assert!(Suit::Wind.is_honor());
        assert!(Suit::Dragon.is_honor());
        assert!(!Suit::Sou.is_honor());
    }
}
