use crate::Position;
use crate::tiles::Tile;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimKind {
    Hu,
    Gang,
    Peng,
    Chi,
}

impl ClaimKind {
    /// Higher wins.
    pub const fn priority(&self) -> u8 {
        match self {
            ClaimKind::Hu => 3,
            ClaimKind::Gang => 2,
            ClaimKind::Peng => 1,
            ClaimKind::Chi => 0,
        }
    }
}

impl std::fmt::Display for ClaimKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ClaimKind::Hu => write!(f, "hu"),
            ClaimKind::Gang => write!(f, "gang"),
            ClaimKind::Peng => write!(f, "peng"),
            ClaimKind::Chi => write!(f, "chi"),
        }
    }
}

/// A buffered claim on the window's discard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimRequest {
    pub seat: Position,
    pub tile: Tile,
    pub kind: ClaimKind,
    /// Lowest tile of the sequence, for chi.
    pub chow: Option<Tile>,
    /// Session time of arrival. Logged, never used for ordering.
    pub at: Duration,
}

impl std::fmt::Display for ClaimRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.chow {
            Some(start) => write!(f, "P{} {} {} from {}", self.seat, self.kind, self.tile, start),
            None => write!(f, "P{} {} {}", self.seat, self.kind, self.tile),
        }
    }
}

/// Claims one seat may legally make on one discard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    pub hu: bool,
    pub gang: bool,
    pub peng: bool,
    pub chows: Vec<Tile>,
}

impl Options {
    pub fn is_empty(&self) -> bool {
        !self.hu && !self.gang && !self.peng && self.chows.is_empty()
    }
    pub fn allows(&self, request: &ClaimRequest) -> bool {
        match request.kind {
            ClaimKind::Hu => self.hu,
            ClaimKind::Gang => self.gang,
            ClaimKind::Peng => self.peng,
            ClaimKind::Chi => request.chow.is_some_and(|c| self.chows.contains(&c)),
        }
    }
    /// Highest-priority claim available.
    pub fn best(&self) -> Option<ClaimKind> {
        [
            (ClaimKind::Hu, self.hu),
            (ClaimKind::Gang, self.gang),
            (ClaimKind::Peng, self.peng),
            (ClaimKind::Chi, !self.chows.is_empty()),
        ]
        .into_iter()
        .find(|(_, ok)| *ok)
        .map(|(k, _)| k)
    }
    pub fn kinds(&self) -> Vec<ClaimKind> {
        [
            (ClaimKind::Hu, self.hu),
            (ClaimKind::Gang, self.gang),
            (ClaimKind::Peng, self.peng),
            (ClaimKind::Chi, !self.chows.is_empty()),
        ]
        .into_iter()
        .filter(|(_, ok)| *ok)
        .map(|(k, _)| k)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn priority_order() {
        assert!(ClaimKind::Hu.priority() > ClaimKind::Gang.priority());
        assert!(ClaimKind::Gang.priority() > ClaimKind::Peng.priority());
        assert!(ClaimKind::Peng.priority() > ClaimKind::Chi.priority());
    }
    #[test]
    fn best_option() {
        let options = Options {
            peng: true,
            gang: true,
            ..Options::default()
        };
        assert_eq!(options.best(), Some(ClaimKind::Gang));
        assert_eq!(Options::default().best(), None);
        assert!(Options::default().is_empty());
    }
    #[test]
    fn chi_must_name_a_legal_sequence() {
        let tile = Tile::try_from("4p").unwrap();
        let options = Options {
            chows: vec![Tile::try_from("2p").unwrap()],
            ..Options::default()
        };
        let mut request = ClaimRequest {
            seat: 1,
            tile,
            kind: ClaimKind::Chi,
            chow: Some(Tile::try_from("3p").unwrap()),
            at: Duration::ZERO,
        };
        assert!(!options.allows(&request));
        request.chow = Some(Tile::try_from("2p").unwrap());
        assert!(options.allows(&request));
    }
}
