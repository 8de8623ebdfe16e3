//! Room dissolution by vote.
mod dismissal;
mod vote;

pub use dismissal::*;
pub use vote::*;
