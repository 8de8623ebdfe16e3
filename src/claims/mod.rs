//! Claims against a discarded tile.
//!
//! - [`ClaimWindow`] — bounded buffer of per-seat decisions for one discard
//! - [`Arbiter`] — deterministic resolution of the buffered claims
mod arbiter;
mod claim;
mod window;

pub use arbiter::*;
pub use claim::*;
pub use window::*;
