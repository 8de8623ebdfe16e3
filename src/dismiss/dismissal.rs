use super::*;
use crate::Position;
use crate::config::Dismiss;
use crate::gameroom::ActionError;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// What a ballot or deadline did to the vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Opened,
    Recorded,
    Dissolved,
    /// Dissolution can no longer pass; back to idle.
    Rejected,
    /// Deadline passed without a decision; back to idle.
    Expired,
}

/// A vote change and the ballots as they stood when it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub outcome: Outcome,
    pub ballots: Vec<Ballot>,
}

/// Dismiss vote coordinator: Idle, VotePending, Resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dismissal {
    Idle,
    Pending(Vote),
    Resolved,
}

impl Default for Dismissal {
    fn default() -> Self {
        Self::Idle
    }
}

impl Dismissal {
    pub fn vote(&self) -> Option<&Vote> {
        match self {
            Self::Pending(vote) => Some(vote),
            _ => None,
        }
    }
    pub fn deadline(&self) -> Option<Duration> {
        self.vote().map(Vote::deadline)
    }
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved)
    }
    /// Opens a vote from Idle (the proposer's yes counts) or records a
    /// ballot on the pending one.
    pub fn cast(
        &mut self,
        seat: Position,
        agree: bool,
        now: Duration,
        rules: &Dismiss,
        players: usize,
    ) -> Result<Update, ActionError> {
        let opened = match self {
            Self::Resolved => return Err(ActionError::invalid("room already dissolved")),
            Self::Idle if !agree => return Err(ActionError::invalid("no dismiss vote to reject")),
            Self::Idle => {
                *self = Self::Pending(Vote::new(players, now, now + rules.vote()));
                true
            }
            Self::Pending(vote) if vote.ballot(seat) != Some(Ballot::Pending) => {
                return Err(ActionError::invalid(format!("P{} already voted", seat)));
            }
            Self::Pending(_) => false,
        };
        let Self::Pending(vote) = self else {
            return Err(ActionError::invalid("no dismiss vote pending"));
        };
        vote.cast(seat, agree);
        let tally = vote.tally();
        let ballots = vote.ballots().to_vec();
        let needed = match rules.require_all_agree {
            true => players,
            false => rules.threshold,
        };
        let outcome = if tally.yes >= needed {
            *self = Self::Resolved;
            Outcome::Dissolved
        } else if tally.yes + tally.pending < needed {
            *self = Self::Idle;
            Outcome::Rejected
        } else if opened {
            Outcome::Opened
        } else {
            Outcome::Recorded
        };
        Ok(Update { outcome, ballots })
    }
    /// Closes a vote whose deadline has passed.
    pub fn expire(&mut self, now: Duration) -> Option<Update> {
        match self {
            Self::Pending(vote) if now >= vote.deadline() => {
                let ballots = vote.ballots().to_vec();
                *self = Self::Idle;
                Some(Update {
                    outcome: Outcome::Expired,
                    ballots,
                })
            }
            _ => None,
        }
    }
    /// Inactivity dissolution, regardless of vote state.
    pub fn force(&mut self) -> bool {
        match self {
            Self::Resolved => false,
            _ => {
                *self = Self::Resolved;
                true
            }
        }
    }
}
