/// Rejections of a player's action. The session state is unchanged
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Illegal for the current phase or hand.
    InvalidAction(String),
    /// Arrived after the window it targeted had closed.
    TimingViolation(String),
    /// Sender holds no seat in this room.
    UnknownPlayer(String),
}

impl ActionError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidAction(reason.into())
    }
    pub fn late(reason: impl Into<String>) -> Self {
        Self::TimingViolation(reason.into())
    }
    /// Wire name used in ERROR envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAction(_) => "InvalidAction",
            Self::TimingViolation(_) => "TimingViolation",
            Self::UnknownPlayer(_) => "UnknownPlayer",
        }
    }
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAction(s) => write!(f, "invalid action: {}", s),
            Self::TimingViolation(s) => write!(f, "timing violation: {}", s),
            Self::UnknownPlayer(s) => write!(f, "unknown player: {}", s),
        }
    }
}

impl std::error::Error for ActionError {}

/// Internal bookkeeping went wrong (e.g. tiles appeared or vanished).
/// Fatal to the match it occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation(pub String);

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invariant violation: {}", self.0)
    }
}

impl std::error::Error for InvariantViolation {}
