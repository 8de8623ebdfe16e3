//! Immutable room configuration.
//!
//! Supplied once at room creation as plain nested structs, validated by
//! [`Config::sealed`], and shared read-only with the session afterwards.
mod config;
mod error;

pub use config::*;
pub use error::*;
