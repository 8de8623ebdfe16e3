//! Per-seat hands and the pure hand evaluator.
//!
//! - [`Hand`] — concealed tile counts, exposed melds, most recent draw
//! - [`Meld`] — pungs, kongs, chows and pairs with their provenance
//! - [`Evaluator`] — legal claims, winning decompositions, best fan
mod decomposition;
mod evaluator;
mod hand;
mod meld;
mod pattern;

pub use decomposition::*;
pub use evaluator::*;
pub use hand::*;
pub use meld::*;
pub use pattern::*;
