mod set;
mod suit;
mod tile;
mod wall;

pub use set::*;
pub use suit::*;
pub use tile::*;
pub use wall::*;
