use crate::Position;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ballot {
    Yes,
    No,
    Pending,
}

/// An open dismissal vote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    ballots: Vec<Ballot>,
    created: Duration,
    deadline: Duration,
}

impl Vote {
    pub fn new(players: usize, created: Duration, deadline: Duration) -> Self {
        Self {
            ballots: vec![Ballot::Pending; players],
            created,
            deadline,
        }
    }
    pub fn ballots(&self) -> &[Ballot] {
        &self.ballots
    }
    pub fn ballot(&self, seat: Position) -> Option<Ballot> {
        self.ballots.get(seat).copied()
    }
    pub fn created(&self) -> Duration {
        self.created
    }
    pub fn deadline(&self) -> Duration {
        self.deadline
    }
    pub fn cast(&mut self, seat: Position, agree: bool) {
        if let Some(b) = self.ballots.get_mut(seat) {
            *b = if agree { Ballot::Yes } else { Ballot::No };
        }
    }
    pub fn tally(&self) -> Tally {
        self.ballots.iter().fold(Tally::default(), |mut t, b| {
            match b {
                Ballot::Yes => t.yes += 1,
                Ballot::No => t.no += 1,
                Ballot::Pending => t.pending += 1,
            }
            t
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub yes: usize,
    pub no: usize,
    pub pending: usize,
}
