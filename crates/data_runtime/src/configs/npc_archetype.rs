//! NPC archetype configuration loader.
//!
//! Parses `data/config/npcs.toml` into structured per-archetype constants
//! used to seed components on spawn. Missing timing/range fields fall back
//! to fixed defaults rather than failing; only structural problems (file
//! unreadable, malformed TOML) surface as errors.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Fallback death-animation length (3 ticks).
pub const DEFAULT_DEATH_ANIM_MS: u64 = 1_800;
/// Fallback respawn delay (50 ticks).
pub const DEFAULT_RESPAWN_DELAY_MS: u64 = 30_000;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct NpcArchetypesCfg {
    #[serde(default)]
    pub npcs: Vec<NpcArchetypeCfg>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NpcArchetypeCfg {
    pub id: String,
    pub name: String,
    pub hp: i32,
    #[serde(default = "default_damage")]
    pub damage: i32,
    #[serde(default = "default_attack_speed_ticks")]
    pub attack_speed_ticks: u32,
    #[serde(default = "default_hunt_range_tiles")]
    pub hunt_range_tiles: i32,
    #[serde(default = "default_combat_range_tiles")]
    pub combat_range_tiles: i32,
    /// Optional aggression radius anchored at the spawn tile. Absent means
    /// the archetype engages anything inside hunt range.
    #[serde(default)]
    pub aggro_range_tiles: Option<i32>,
    #[serde(default = "default_death_anim_ms")]
    pub death_anim_ms: u64,
    #[serde(default = "default_respawn_delay_ms")]
    pub respawn_delay_ms: u64,
    /// "death" | "hide"; see `ecs_core::parse::parse_respawn_anchor`.
    #[serde(default)]
    pub respawn_anchor: Option<String>,
    /// "accurate" | "aggressive" | "defensive" | "controlled".
    #[serde(default)]
    pub style: Option<String>,
}

fn default_damage() -> i32 {
    1
}
fn default_attack_speed_ticks() -> u32 {
    4
}
fn default_hunt_range_tiles() -> i32 {
    4
}
fn default_combat_range_tiles() -> i32 {
    1
}
fn default_death_anim_ms() -> u64 {
    DEFAULT_DEATH_ANIM_MS
}
fn default_respawn_delay_ms() -> u64 {
    DEFAULT_RESPAWN_DELAY_MS
}

impl NpcArchetypesCfg {
    /// Parse from TOML text (used by tests and tools that carry their own
    /// data).
    pub fn from_toml_str(txt: &str) -> Result<Self> {
        toml::from_str(txt).context("parse npcs TOML")
    }

    /// Look up an archetype by id.
    pub fn get(&self, id: &str) -> Option<&NpcArchetypeCfg> {
        self.npcs.iter().find(|n| n.id == id)
    }
}

fn data_root() -> PathBuf {
    let here = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let ws = here.join("../../data");
    if ws.is_dir() { ws } else { here.join("data") }
}

/// Load the default archetype set from `data/config/npcs.toml`.
pub fn load_archetypes() -> Result<NpcArchetypesCfg> {
    let path = data_root().join("config/npcs.toml");
    let txt = std::fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    NpcArchetypesCfg::from_toml_str(&txt)
}
