//! Per-round tile flow, turn phases and dealer rotation.
mod phase;
mod rotation;
mod round;

pub use phase::*;
pub use rotation::*;
pub use round::*;
