//! Fan combination, per-seat payments and the immutable round record.
mod combination;
mod result;
mod scorer;

pub use combination::*;
pub use result::*;
pub use scorer::*;
