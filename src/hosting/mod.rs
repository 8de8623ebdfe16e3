mod casino;
mod directory;
mod handle;
#[cfg(feature = "server")]
mod server;

pub use casino::*;
pub use directory::*;
pub use handle::*;
#[cfg(feature = "server")]
pub use server::*;
