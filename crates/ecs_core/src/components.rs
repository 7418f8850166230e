//! Component definitions for NPC aggro, combat, and the death/respawn cycle.
//!
//! The server seeds these from `data_runtime` archetype configs on spawn and
//! mutates them tick by tick; nothing here carries behavior beyond small
//! constructors and accessors.

/// Stable NPC identifier (server-assigned).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcId(pub u32);

/// Player identity as seen by the simulation core.
///
/// The core never holds a reference to an external player object, only this
/// identity plus a per-tick copied position, so disconnects cannot leave
/// dangling state behind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub String);

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Health component for damage/death application.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    pub fn full(max: i32) -> Self {
        Self { hp: max, max }
    }
    #[inline]
    pub fn alive(&self) -> bool {
        self.hp > 0
    }
    #[inline]
    pub fn clamp(&mut self) {
        if self.hp > self.max {
            self.hp = self.max;
        }
    }
}

/// Named attack mode altering experience distribution across combat skills.
///
/// Styles are purely data: the associated weights are reported on attack
/// events for the host's XP ledger and never feed accuracy or damage.
/// Accuracy/damage modifiers are reserved for future prayer/potion effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatStyle {
    #[default]
    Accurate,
    Aggressive,
    Defensive,
    Controlled,
}

/// Experience points granted per point of damage, split across the four
/// combat skills.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct XpWeights {
    pub attack: f32,
    pub strength: f32,
    pub defence: f32,
    pub hitpoints: f32,
}

impl CombatStyle {
    /// Experience split for this style. Hitpoints always trains at a third
    /// of the main rate; Controlled spreads the main rate evenly.
    pub fn xp_weights(self) -> XpWeights {
        let hp = 4.0 / 3.0;
        match self {
            CombatStyle::Accurate => XpWeights {
                attack: 4.0,
                strength: 0.0,
                defence: 0.0,
                hitpoints: hp,
            },
            CombatStyle::Aggressive => XpWeights {
                attack: 0.0,
                strength: 4.0,
                defence: 0.0,
                hitpoints: hp,
            },
            CombatStyle::Defensive => XpWeights {
                attack: 0.0,
                strength: 0.0,
                defence: 4.0,
                hitpoints: hp,
            },
            CombatStyle::Controlled => XpWeights {
                attack: 4.0 / 3.0,
                strength: 4.0 / 3.0,
                defence: 4.0 / 3.0,
                hitpoints: hp,
            },
        }
    }
}

/// Per-archetype aggro constants.
///
/// Hunt range is measured from the NPC's *current* tile; combat range at
/// attack time. The aggression range (anchored at the spawn tile) is
/// deliberately not stored here: it can combine leash distance and attack
/// range, so callers supply it per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct AggroParams {
    pub hunt_range_tiles: i32,
    pub combat_range_tiles: i32,
}

impl Default for AggroParams {
    fn default() -> Self {
        Self {
            hunt_range_tiles: 4,
            combat_range_tiles: 1,
        }
    }
}

/// Which instant the respawn delay is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub enum RespawnAnchor {
    /// Delay counts from the moment of death.
    #[default]
    Death,
    /// Delay counts from the corpse-hide transition at the end of the
    /// death animation.
    Hide,
}

/// Per-archetype death/respawn timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct DeathParams {
    pub death_anim_ms: u64,
    pub respawn_delay_ms: u64,
    pub anchor: RespawnAnchor,
}

impl Default for DeathParams {
    fn default() -> Self {
        Self {
            death_anim_ms: 1_800,
            respawn_delay_ms: 30_000,
            anchor: RespawnAnchor::Death,
        }
    }
}

/// NPC melee parameters (server-side combat).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "replication", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcCombat {
    pub damage: i32,
    /// Swing period in simulation ticks.
    pub attack_speed_ticks: u32,
}

impl Default for NpcCombat {
    fn default() -> Self {
        Self {
            damage: 1,
            attack_speed_ticks: 4,
        }
    }
}
