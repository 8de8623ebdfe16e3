use super::*;
use crate::Fan;
use crate::config::Config;
use crate::tiles::Tile;

/// Result of validating a winning hand: the best-scoring decomposition
/// and the fan it earns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    decomposition: Decomposition,
    patterns: Vec<(Pattern, Fan)>,
    fan: Fan,
}

impl Verdict {
    pub fn decomposition(&self) -> &Decomposition {
        &self.decomposition
    }
    pub fn patterns(&self) -> &[(Pattern, Fan)] {
        &self.patterns
    }
    pub fn fan(&self) -> Fan {
        self.fan
    }
}

/// Pure hand evaluation under one rule configuration.
///
/// Holds no state beyond the borrowed configuration, so identical
/// inputs always produce identical outputs.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'c> {
    config: &'c Config,
}

impl<'c> Evaluator<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }
}

/// Winning shapes.
impl Evaluator<'_> {
    /// Every reading of a complete hand as a winning shape.
    /// Standard decompositions come first, in tile order of their pair.
    pub fn decompositions(&self, hand: &Hand) -> Vec<Decomposition> {
        if !hand.is_complete_size() {
            return Vec::new();
        }
        let mut found = Vec::new();
        let mut counts = *hand.counts();
        for pair in hand.kinds() {
            if counts[pair.index()] < 2 {
                continue;
            }
            counts[pair.index()] -= 2;
            let mut acc = vec![Meld::Pair { tile: pair }];
            let mut sets = Vec::new();
            Self::search(&mut counts, &mut acc, &mut sets);
            counts[pair.index()] += 2;
            found.extend(sets.into_iter().map(|groups| {
                Decomposition::new(Shape::Standard, groups, hand.melds().to_vec())
            }));
        }
        if self.config.patterns.seven_pairs {
            found.extend(Self::seven_pairs(hand));
        }
        found
    }
    /// Whether adding `tile` to a waiting hand makes it complete.
    pub fn completes(&self, hand: &Hand, tile: Tile) -> bool {
        self.verdict(hand, tile).is_some()
    }
    /// Best decomposition of `hand` plus the winning `tile`, or None if
    /// the tile does not complete the hand.
    pub fn verdict(&self, hand: &Hand, tile: Tile) -> Option<Verdict> {
        if !hand.is_waiting_size() {
            return None;
        }
        let mut full = hand.clone();
        full.add(tile);
        self.decompositions(&full)
            .into_iter()
            .map(|d| {
                let patterns = self.patterns(&d, tile);
                let fan = self.combine(&patterns);
                Verdict {
                    decomposition: d,
                    patterns,
                    fan,
                }
            })
            .reduce(|best, next| if next.fan > best.fan { next } else { best })
    }
    /// Enabled patterns matched by a decomposition, choosing the winning
    /// tile's role to maximize fan.
    pub fn patterns(&self, d: &Decomposition, winning: Tile) -> Vec<(Pattern, Fan)> {
        let toggles = &self.config.patterns;
        let fans = &self.config.scoring.fans;
        let base = [
            (Pattern::SevenPairs, d.shape() == Shape::SevenPairs),
            (Pattern::AllPungs, d.is_all_pungs()),
            (Pattern::AllHonors, d.is_all_honors()),
        ]
        .into_iter()
        .filter(|(p, hit)| *hit && p.enabled(toggles))
        .map(|(p, _)| (p, p.fan(fans)))
        .collect::<Vec<_>>();
        d.waits(winning)
            .into_iter()
            .map(|wait| {
                let mut patterns = base.clone();
                if let Some(p) = wait.filter(|p| p.enabled(toggles)) {
                    patterns.push((p, p.fan(fans)));
                }
                patterns
            })
            .reduce(|best, next| {
                if self.combine(&next) > self.combine(&best) {
                    next
                } else {
                    best
                }
            })
            .unwrap_or(base)
    }
    fn combine(&self, patterns: &[(Pattern, Fan)]) -> Fan {
        self.config
            .scoring
            .combination
            .combine(patterns.iter().map(|(_, f)| *f))
    }
    /// Depth-first set extraction. The lowest remaining tile must lead
    /// either a pung or a chow, so each reading is produced once.
    fn search(counts: &mut [u8; Tile::KINDS], acc: &mut Vec<Meld>, out: &mut Vec<Vec<Meld>>) {
        let Some(i) = counts.iter().position(|c| *c > 0) else {
            out.push(acc.clone());
            return;
        };
        let Ok(tile) = Tile::try_from(i as u8) else {
            return;
        };
        let source = Provenance::Concealed;
        if counts[i] >= 3 {
            counts[i] -= 3;
            acc.push(Meld::Pung { tile, source });
            Self::search(counts, acc, out);
            acc.pop();
            counts[i] += 3;
        }
        if let (Some(b), Some(c)) = (tile.step(1), tile.step(2)) {
            let (j, k) = (b.index(), c.index());
            if counts[j] > 0 && counts[k] > 0 {
                counts[i] -= 1;
                counts[j] -= 1;
                counts[k] -= 1;
                acc.push(Meld::Chow {
                    start: tile,
                    source,
                });
                Self::search(counts, acc, out);
                acc.pop();
                counts[i] += 1;
                counts[j] += 1;
                counts[k] += 1;
            }
        }
    }
    /// Seven pairs: fully concealed, four of a kind counts as two pairs.
    fn seven_pairs(hand: &Hand) -> Option<Decomposition> {
        if !hand.melds().is_empty() || hand.concealed_len() != 14 {
            return None;
        }
        hand.kinds()
            .into_iter()
            .all(|t| hand.count(t) % 2 == 0)
            .then(|| {
                hand.kinds()
                    .into_iter()
                    .flat_map(|t| std::iter::repeat_n(Meld::Pair { tile: t }, hand.count(t) as usize / 2))
                    .collect::<Vec<_>>()
            })
            .map(|pairs| Decomposition::new(Shape::SevenPairs, pairs, Vec::new()))
    }
}

/// Claims against a discard and own-turn declarations.
impl Evaluator<'_> {
    pub fn can_peng(&self, hand: &Hand, tile: Tile) -> bool {
        self.config.melds.allow_peng && hand.count(tile) >= 2 && hand.is_waiting_size()
    }
    /// Claimed kong from a discard: three matching tiles concealed.
    pub fn can_gang(&self, hand: &Hand, tile: Tile) -> bool {
        self.config.melds.allow_gang && hand.count(tile) >= 3 && hand.is_waiting_size()
    }
    /// Lowest tiles of every chow the discard could complete.
    pub fn chows(&self, hand: &Hand, tile: Tile) -> Vec<Tile> {
        if !self.config.melds.allow_chi || !hand.is_waiting_size() {
            return Vec::new();
        }
        [-2i8, -1, 0]
            .into_iter()
            .filter_map(|d| tile.step(d))
            .filter(|start| {
                let others = (0..3)
                    .filter_map(|i| start.step(i))
                    .filter(|t| *t != tile)
                    .collect::<Vec<_>>();
                others.len() == 2 && others.iter().all(|t| hand.contains(*t))
            })
            .collect()
    }
    /// Kinds held four times while the seat holds a full shape.
    pub fn concealed_kongs(&self, hand: &Hand) -> Vec<Tile> {
        if !self.config.melds.allow_gang || !hand.is_complete_size() {
            return Vec::new();
        }
        hand.kinds()
            .into_iter()
            .filter(|t| hand.count(*t) == 4)
            .collect()
    }
    /// Exposed pungs whose fourth tile is concealed.
    pub fn promotable(&self, hand: &Hand) -> Vec<Tile> {
        if !self.config.melds.allow_gang || !hand.is_complete_size() {
            return Vec::new();
        }
        hand.melds()
            .iter()
            .filter_map(|m| match m {
                Meld::Pung { tile, .. } if hand.contains(*tile) => Some(*tile),
                _ => None,
            })
            .collect()
    }
}
