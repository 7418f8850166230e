//! Shared component/data types for the authoritative NPC simulation.
//!
//! These types are plain data shared across server crates. The server owns
//! authoritative mutation; replicas consume read-only snapshots. Keep this
//! crate free of simulation logic; systems live in `server_core`.

pub mod components;
pub mod parse;
