//! Typed events for the simulation bus.
//!
//! State transitions surface as buffered event values drained by the host
//! after each tick; the core never pushes to transport or rendering layers
//! itself. Callback bodies and broadcast latency are the host's problem.

use ecs_core::components::{CombatStyle, NpcId, PlayerId, XpWeights};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// An NPC swing went through the external combat rules.
    AttackResolved {
        npc: NpcId,
        target: PlayerId,
        hit: bool,
        damage: i32,
        style: CombatStyle,
        /// Experience split for the host's XP ledger; informational only.
        xp: XpWeights,
    },
    /// Damage was applied to an NPC's health.
    NpcDamaged {
        npc: NpcId,
        hp_before: i32,
        hp_after: i32,
        fatal: bool,
    },
    /// The NPC died; its position is frozen at `pos` until respawn.
    DeathStarted { npc: NpcId, pos: Vec3 },
    /// The death animation window elapsed; observers should hide the corpse.
    CorpseHidden { npc: NpcId },
    /// The NPC re-entered the simulation at `pos`.
    Respawned { npc: NpcId, pos: Vec3 },
}
