//! Combat state machine: engagement bookkeeping and swing timing.
//!
//! Accuracy and damage math live behind the `CombatRules` trait; the core
//! owns *when* a swing happens (cooldown, range, liveness), never *what* it
//! rolls. Attack styles alter the experience split reported on events and
//! nothing else; their numeric modifiers stay inert until prayer/potion
//! effects wire them in explicitly.

use ecs_core::components::{CombatStyle, NpcCombat, NpcId, PlayerId};

use crate::TICK_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatantKind {
    Player,
    Npc,
}

/// One active NPC-vs-player engagement.
#[derive(Debug, Clone, PartialEq)]
pub struct Engagement {
    pub target: PlayerId,
    pub started_ms: u64,
    pub last_attack_ms: Option<u64>,
}

/// Per-NPC combat state.
#[derive(Debug, Clone, Default)]
pub struct Combat {
    pub params: NpcCombat,
    pub style: CombatStyle,
    engagement: Option<Engagement>,
}

impl Combat {
    pub fn new(params: NpcCombat, style: CombatStyle) -> Self {
        Self {
            params,
            style,
            engagement: None,
        }
    }

    pub fn engagement(&self) -> Option<&Engagement> {
        self.engagement.as_ref()
    }

    /// Begin (or continue) an engagement. Re-engaging the same target keeps
    /// the existing swing timing; switching targets restarts it.
    pub fn engage(&mut self, target: PlayerId, now_ms: u64) {
        match &self.engagement {
            Some(e) if e.target == target => {}
            _ => {
                self.engagement = Some(Engagement {
                    target,
                    started_ms: now_ms,
                    last_attack_ms: None,
                });
            }
        }
    }

    pub fn disengage(&mut self) {
        self.engagement = None;
    }

    /// Swing period derived from attack speed in ticks.
    pub fn attack_period_ms(&self) -> u64 {
        u64::from(self.params.attack_speed_ticks) * TICK_MS
    }

    /// True when engaged and the cooldown since the last swing has elapsed.
    /// A fresh engagement swings immediately.
    pub fn cooldown_ready(&self, now_ms: u64) -> bool {
        match &self.engagement {
            Some(Engagement {
                last_attack_ms: Some(t),
                ..
            }) => now_ms.saturating_sub(*t) >= self.attack_period_ms(),
            Some(_) => true,
            None => false,
        }
    }

    /// Stamp the swing that just resolved.
    pub fn note_attack(&mut self, now_ms: u64) {
        if let Some(e) = &mut self.engagement {
            e.last_attack_ms = Some(now_ms);
        }
    }

    pub fn reset(&mut self) {
        self.engagement = None;
    }
}

/// One swing's outcome from the external formula tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackResolution {
    pub hit: bool,
    pub damage: i32,
}

/// Inputs the external tables need to resolve a swing.
#[derive(Debug, Clone)]
pub struct SwingContext<'a> {
    pub attacker: NpcId,
    pub attacker_kind: CombatantKind,
    pub defender: &'a PlayerId,
    pub defender_kind: CombatantKind,
    pub style: CombatStyle,
    pub base_damage: i32,
}

/// Externally supplied accuracy/damage resolution, treated as a pure black
/// box. Implementations must not block: they run inside the tick.
pub trait CombatRules {
    fn resolve(&mut self, swing: &SwingContext<'_>) -> AttackResolution;
}
