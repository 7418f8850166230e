//! Authoritative NPC simulation core: fixed-tick scheduling, aggro/target
//! acquisition, combat resolution timing, and the death/respawn cycle.
//!
//! The host drives `ServerState::tick` at a fixed 600ms cadence with a
//! per-tick player snapshot and an external `CombatRules` implementation,
//! then drains buffered `SimEvent`s for its transport/rendering layers.
//! Nothing in the tick path blocks, errors, or panics; a single NPC's
//! anomalous state is logged and recovered locally, never propagated.

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::SmallRng;

pub mod aggro;
pub mod combat;
pub mod death;
pub mod events;
pub mod schedule;
pub mod tile;

pub use aggro::{Aggro, SpawnAnchor};
pub use combat::{AttackResolution, Combat, CombatRules, CombatantKind, Engagement, SwingContext};
pub use death::{Death, LifecycleEvent};
pub use ecs_core::components::{
    AggroParams, CombatStyle, DeathParams, Health, NpcCombat, NpcId, PlayerId, RespawnAnchor,
    XpWeights,
};
pub use events::SimEvent;

use data_runtime::configs::npc_archetype::NpcArchetypeCfg;
use ecs_core::parse;

/// Fixed simulation tick length. Cadence enforcement is the host's job; the
/// core only quantizes swing periods and timers to it.
pub const TICK_MS: u64 = 600;

/// Read-only per-tick snapshot of one player, built fresh by the host
/// adapter each tick. `alive` is computed once at that boundary; the core
/// never inspects external player representations and never retains a
/// reference across ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub id: PlayerId,
    pub pos: Vec3,
    pub alive: bool,
}

impl PlayerView {
    pub fn new(id: impl Into<PlayerId>, pos: Vec3, alive: bool) -> Self {
        Self {
            id: id.into(),
            pos,
            alive,
        }
    }
}

/// One simulated NPC. Created once at spawn; the spawn position is fixed
/// forever while the runtime fields cycle between alive/acting and
/// dead/locked until the zone despawns the entity.
#[derive(Debug)]
pub struct NpcState {
    pub id: NpcId,
    pub name: String,
    pub pos: Vec3,
    spawn_pos: Vec3,
    pub hp: Health,
    pub aggro: Aggro,
    pub combat: Combat,
    pub death: Death,
    /// Spawn-anchored aggression radius. `None` means the archetype engages
    /// anything inside hunt range.
    pub aggro_range_tiles: Option<i32>,
}

impl NpcState {
    pub fn spawn_pos(&self) -> Vec3 {
        self.spawn_pos
    }

    #[inline]
    pub fn alive(&self) -> bool {
        !self.death.is_dead()
    }

    /// Position as reported to observers: frozen at the death position while
    /// dead, so a corpse never visibly moves.
    pub fn observed_pos(&self) -> Vec3 {
        if self.death.should_lock_position() {
            self.death.locked_position().unwrap_or(self.pos)
        } else {
            self.pos
        }
    }
}

/// Owner of all simulated NPCs plus the tick-scoped RNG and event buffer.
/// Single-writer: one tick thread mutates this; replicas reconcile only
/// through the explicit `apply_death_position_from_server` entry point.
pub struct ServerState {
    next_id: u32,
    pub npcs: Vec<NpcState>,
    tick: u32,
    rng: SmallRng,
    events: Vec<SimEvent>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_seed(0xA77AC)
    }

    /// Seeded construction for reproducible target selection.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            next_id: 1,
            npcs: Vec::new(),
            tick: 0,
            rng: SmallRng::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn tick_count(&self) -> u32 {
        self.tick
    }

    pub(crate) fn bump_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Hand buffered events to the host sink. The core pushes nothing
    /// outward itself.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn npc(&self, id: NpcId) -> Option<&NpcState> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn npc_mut(&mut self, id: NpcId) -> Option<&mut NpcState> {
        self.npcs.iter_mut().find(|n| n.id == id)
    }

    /// Observer-facing position (locked at the death position while dead).
    pub fn npc_position(&self, id: NpcId) -> Option<Vec3> {
        self.npc(id).map(|n| n.observed_pos())
    }

    pub fn npc_target(&self, id: NpcId) -> Option<&PlayerId> {
        self.npc(id).and_then(|n| n.aggro.target())
    }

    /// Spawn with default parameters; mostly a test/tool convenience.
    pub fn spawn_npc(&mut self, name: &str, pos: Vec3, hp: i32) -> NpcId {
        let id = self.alloc_id();
        self.npcs.push(NpcState {
            id,
            name: name.to_owned(),
            pos,
            spawn_pos: pos,
            hp: Health::full(hp),
            aggro: Aggro::new(AggroParams::default()),
            combat: Combat::default(),
            death: Death::default(),
            aggro_range_tiles: None,
        });
        metrics::counter!("npc.spawns_total").increment(1);
        id
    }

    /// Seed a fresh NPC from an archetype config. Unknown style/anchor
    /// strings fall back to defaults with a logged warning rather than
    /// failing the spawn.
    pub fn spawn_npc_from_archetype(&mut self, cfg: &NpcArchetypeCfg, pos: Vec3) -> NpcId {
        let style = match cfg.style.as_deref() {
            None => CombatStyle::default(),
            Some(s) => parse::parse_combat_style(s).unwrap_or_else(|| {
                log::warn!("npc '{}': unknown combat style '{s}', using default", cfg.id);
                CombatStyle::default()
            }),
        };
        let anchor = match cfg.respawn_anchor.as_deref() {
            None => RespawnAnchor::default(),
            Some(s) => parse::parse_respawn_anchor(s).unwrap_or_else(|| {
                log::warn!("npc '{}': unknown respawn anchor '{s}', using default", cfg.id);
                RespawnAnchor::default()
            }),
        };
        let id = self.alloc_id();
        self.npcs.push(NpcState {
            id,
            name: cfg.name.clone(),
            pos,
            spawn_pos: pos,
            hp: Health::full(cfg.hp),
            aggro: Aggro::new(AggroParams {
                hunt_range_tiles: cfg.hunt_range_tiles,
                combat_range_tiles: cfg.combat_range_tiles,
            }),
            combat: Combat::new(
                NpcCombat {
                    damage: cfg.damage,
                    attack_speed_ticks: cfg.attack_speed_ticks,
                },
                style,
            ),
            death: Death::new(DeathParams {
                death_anim_ms: cfg.death_anim_ms,
                respawn_delay_ms: cfg.respawn_delay_ms,
                anchor,
            }),
            aggro_range_tiles: cfg.aggro_range_tiles,
        });
        log::info!("server: spawned '{}' (hp={}) as {:?}", cfg.name, cfg.hp, id);
        metrics::counter!("npc.spawns_total").increment(1);
        id
    }

    fn alloc_id(&mut self) -> NpcId {
        let id = NpcId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Advance every NPC by one simulation step: target acquisition, then
    /// combat resolution, then death timers, in that order. `players` is the
    /// host's candidate supply; over-inclusive sets are safe (ranges are
    /// re-checked here), under-inclusive ones silently reduce aggro
    /// accuracy. `now_ms` comes from the host's monotonic clock.
    pub fn tick(&mut self, now_ms: u64, players: &[PlayerView], rules: &mut dyn CombatRules) {
        schedule::run_tick(self, now_ms, players, rules);
    }

    /// Apply damage produced outside this core (player attacks, hazards) to
    /// an NPC. A lethal hit drives the death transition; corpses absorb
    /// nothing. Unknown ids are logged and dropped, never an error.
    pub fn apply_damage_to_npc(&mut self, id: NpcId, damage: i32, now_ms: u64) {
        let Some(n) = self.npcs.iter_mut().find(|n| n.id == id) else {
            log::warn!("damage for unknown npc {id:?}; dropping");
            return;
        };
        if n.death.is_dead() {
            return;
        }
        let before = n.hp.hp;
        n.hp.hp = (before - damage.max(0)).max(0);
        let fatal = before > 0 && n.hp.hp == 0;
        self.events.push(SimEvent::NpcDamaged {
            npc: id,
            hp_before: before,
            hp_after: n.hp.hp,
            fatal,
        });
        if fatal {
            let pos = n.pos;
            if n.death.die(pos, now_ms).is_some() {
                n.aggro.clear_target();
                n.combat.disengage();
                self.events.push(SimEvent::DeathStarted { npc: id, pos });
                metrics::counter!("npc.deaths_total").increment(1);
            }
        }
    }

    /// External respawn authority: re-admit every NPC whose delay elapsed
    /// per its configured anchor. Invoked by the host on its own (typically
    /// longer) cadence, deliberately outside `tick`'s death-timer update.
    pub fn process_respawns(&mut self, now_ms: u64) {
        for n in self.npcs.iter_mut() {
            if n.death.is_dead() && n.death.respawn_due(now_ms) && n.death.force_respawn().is_some()
            {
                Self::readmit(n);
                self.events.push(SimEvent::Respawned {
                    npc: n.id,
                    pos: n.pos,
                });
                metrics::counter!("npc.respawns_total").increment(1);
            }
        }
    }

    /// Administrative respawn for one NPC, bypassing timers.
    pub fn force_respawn(&mut self, id: NpcId) {
        let Some(n) = self.npcs.iter_mut().find(|n| n.id == id) else {
            log::warn!("force_respawn for unknown npc {id:?}; dropping");
            return;
        };
        if n.death.force_respawn().is_some() {
            Self::readmit(n);
            self.events.push(SimEvent::Respawned {
                npc: n.id,
                pos: n.pos,
            });
            metrics::counter!("npc.respawns_total").increment(1);
        }
    }

    fn readmit(n: &mut NpcState) {
        n.pos = n.spawn_pos;
        n.hp = Health::full(n.hp.max);
        n.aggro.reset();
        n.combat.reset();
    }

    /// Follower-side reconciliation of authoritative death state for one
    /// NPC (see `Death::apply_death_position_from_server`).
    pub fn apply_death_position_from_server(&mut self, id: NpcId, pos: Vec3, now_ms: u64) {
        let Some(n) = self.npcs.iter_mut().find(|n| n.id == id) else {
            log::warn!("death reconciliation for unknown npc {id:?}; dropping");
            return;
        };
        n.death.apply_death_position_from_server(pos, now_ms);
    }
}
