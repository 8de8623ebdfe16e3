//! Live match orchestration.
//!
//! [`Session`] owns all mutable match state and advances on a supplied
//! clock; [`Room`] wraps it in a tokio task that reads player frames,
//! sleeps until the next [`Timer`], and delivers [`Notice`]s through the
//! [`Table`].
mod archive;
mod error;
mod event;
mod message;
mod protocol;
mod room;
mod session;
mod table;
mod timer;

pub use archive::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use protocol::*;
pub use room::*;
pub use session::*;
pub use table::*;
pub use timer::*;
