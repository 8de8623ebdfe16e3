use super::*;
use crate::Position;
use crate::config::Config;
use serde::Deserialize;
use serde::Serialize;
use std::cmp::Reverse;

/// When a claim window may close before its action limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EarlyResolution {
    /// Wait out the action limit unless every non-discarding seat has
    /// decided. Seats with no legal claim count as having passed, and a
    /// claim counts as a decision just like a pass: once the last seat
    /// has spoken nothing can arrive that would change the ruling.
    #[default]
    Never,
    /// As soon as no undecided seat could change the ruling.
    Decisive,
}

/// Outcome of a claim window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ruling {
    /// Play moves to the seat after the discarder.
    Nothing,
    /// One seat takes the tile into a meld.
    Meld(ClaimRequest),
    /// One or more seats win on the tile, nearest first.
    Hu(Vec<ClaimRequest>),
}

/// Resolves buffered claims by priority, then by downstream distance
/// from the discarder. Arrival order never matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arbiter {
    players: usize,
    multiple_winners: bool,
    policy: EarlyResolution,
}

impl From<&Config> for Arbiter {
    fn from(config: &Config) -> Self {
        Self {
            players: config.players,
            multiple_winners: config.scoring.multiple_winners,
            policy: config.claims.early_resolution,
        }
    }
}

impl Arbiter {
    pub fn new(players: usize, multiple_winners: bool, policy: EarlyResolution) -> Self {
        Self {
            players,
            multiple_winners,
            policy,
        }
    }
    /// Seats downstream from the discarder, 1 being the next to play.
    pub fn distance(&self, discarder: Position, seat: Position) -> usize {
        (seat + self.players - discarder) % self.players
    }
    fn key(&self, window: &ClaimWindow, request: &ClaimRequest) -> (Reverse<u8>, usize) {
        (
            Reverse(request.kind.priority()),
            self.distance(window.discarder(), request.seat),
        )
    }
    fn best<'w>(&self, window: &'w ClaimWindow) -> Option<&'w ClaimRequest> {
        window.claims().min_by_key(|r| self.key(window, r))
    }
    pub fn rule(&self, window: &ClaimWindow) -> Ruling {
        let Some(best) = self.best(window) else {
            return Ruling::Nothing;
        };
        match best.kind {
            ClaimKind::Hu if self.multiple_winners => {
                let mut winners = window
                    .claims()
                    .filter(|r| r.kind == ClaimKind::Hu)
                    .copied()
                    .collect::<Vec<_>>();
                winners.sort_by_key(|r| self.distance(window.discarder(), r.seat));
                Ruling::Hu(winners)
            }
            ClaimKind::Hu => Ruling::Hu(vec![*best]),
            _ => Ruling::Meld(*best),
        }
    }
    /// Whether the window can be ruled on now without changing the
    /// ruling it would get at its deadline.
    pub fn decisive(&self, window: &ClaimWindow) -> bool {
        if window.is_settled() {
            return true;
        }
        if self.policy == EarlyResolution::Never {
            return false;
        }
        let Some(best) = self.best(window) else {
            return false;
        };
        let held = self.key(window, best);
        window
            .pending()
            .into_iter()
            .filter_map(|seat| window.options(seat).and_then(Options::best).map(|k| (seat, k)))
            .all(|(seat, kind)| {
                let could = (Reverse(kind.priority()), self.distance(window.discarder(), seat));
                let joins = kind == ClaimKind::Hu && best.kind == ClaimKind::Hu && self.multiple_winners;
                could > held && !joins
            })
    }
}
