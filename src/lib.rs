//! Real-time match engine for three-player mahjong rooms.
//!
//! ## Architecture
//!
//! - [`tiles`] — Tile identity, tile-set composition, seeded walls
//! - [`hand`] — Concealed counts, exposed melds, and the pure [`hand::Evaluator`]
//! - [`claims`] — Claim windows and the deterministic [`claims::Arbiter`]
//! - [`turn`] — Per-round tile flow, phases, dealer rotation
//! - [`scoring`] — Fan combination, payments, [`scoring::MatchResult`]
//! - [`trustee`] — Automated stand-in for unresponsive seats
//! - [`dismiss`] — Room dissolution votes
//! - [`gameroom`] — [`gameroom::Session`] (functional core) and [`gameroom::Room`] (async shell)
//! - [`hosting`] — Room registry and transport edge

pub mod claims;
pub mod config;
pub mod dismiss;
pub mod gameroom;
pub mod hand;
pub mod hosting;
pub mod scoring;
pub mod tiles;
pub mod trustee;
pub mod turn;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Seat index around the table, in turn order.
pub type Position = usize;
/// Score units exchanged between seats.
pub type Points = i32;
/// Multipliers applied to payments.
pub type Factor = f32;
/// Scoring bonus units for matched hand patterns.
pub type Fan = u32;

// ============================================================================
// TABLE PARAMETERS
// ============================================================================
/// Seats in a standard room.
pub const N: usize = 3;
/// Fewest seats a room may be configured with.
pub const MIN_SEATS: usize = 2;
/// Most seats a room may be configured with.
pub const MAX_SEATS: usize = 4;
/// Copies of each tile kind in every tile set.
pub const COPIES: u8 = 4;
/// Concealed tiles dealt to each seat.
pub const DEAL: usize = 13;
/// Sets (pungs, kongs, chows) in a standard winning hand.
pub const SETS: usize = 4;

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::hash::Hash;
use std::hash::Hasher;
use std::marker::PhantomData;

/// Marker for player identities issued by the external auth collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member;

/// Generic ID wrapper providing compile-time type safety over uuid::Uuid.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }
    /// Cast ID<T> to ID<U> while preserving the underlying UUID.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner()
    }
}
impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> TryFrom<&str> for ID<T> {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self::from)
            .map_err(|e| anyhow::anyhow!("invalid id {:?}: {}", s, e))
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self {
            inner: uuid::Uuid::now_v7(),
            marker: PhantomData,
        }
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Hash for ID<T> {
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.inner.hash(state);
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler for immediate (non-graceful) termination.
#[cfg(feature = "server")]
pub fn kys() {
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        println!();
        log::warn!("violent interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

/// Milliseconds since the UNIX epoch, for envelope timestamps.
pub fn timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn id_roundtrips_through_strings() {
        let id = ID::<Member>::default();
        let parsed = ID::<Member>::try_from(id.to_string().as_str()).unwrap();
        assert_eq!(id, parsed);
    }
    #[test]
    fn id_rejects_garbage() {
        assert!(ID::<Member>::try_from("not-a-uuid").is_err());
    }
    #[test]
    fn id_serializes_as_bare_uuid() {
        let id = ID::<Member>::default();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: ID<Member> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
