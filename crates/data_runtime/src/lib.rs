//! data_runtime: data schemas and loaders for the NPC simulation.
//!
//! Keeps config parsing out of the simulation crates so server and tools
//! can depend on a stable data API. Keep this crate free of component
//! dependencies; convert into component types in the caller as needed.

pub mod configs {
    pub mod npc_archetype;
}
