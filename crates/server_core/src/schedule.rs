//! Fixed-order tick systems over `ServerState`.
//!
//! One tick runs target acquisition, then combat resolution, then death
//! timers, for every NPC in stable spawn order. Dead NPCs only advance their
//! death timers; they neither scan nor swing. All transitions are
//! synchronous and in-tick; events are buffered on the state, and nothing
//! here blocks or suspends.

use crate::aggro::SpawnAnchor;
use crate::combat::{CombatRules, CombatantKind, SwingContext};
use crate::death::LifecycleEvent;
use crate::events::SimEvent;
use crate::{PlayerView, ServerState};

/// Run one full simulation step. See `ServerState::tick`.
pub fn run_tick(
    srv: &mut ServerState,
    now_ms: u64,
    players: &[PlayerView],
    rules: &mut dyn CombatRules,
) {
    let t0 = std::time::Instant::now();
    aggro_acquire_targets(srv, players);
    combat_resolve_swings(srv, now_ms, players, rules);
    death_update_timers(srv, now_ms);
    srv.bump_tick();
    let ms = t0.elapsed().as_secs_f64() * 1000.0;
    metrics::histogram!("tick.ms").record(ms);
}

/// Drop vanished/dead targets, then let target-less NPCs scan and pick.
fn aggro_acquire_targets(srv: &mut ServerState, players: &[PlayerView]) {
    let ServerState { npcs, rng, .. } = srv;
    for n in npcs.iter_mut() {
        if n.death.is_dead() {
            continue;
        }
        if let Some(tid) = n.aggro.target().cloned() {
            let still_valid = players
                .iter()
                .find(|p| p.id == tid)
                .map(|p| p.alive)
                .unwrap_or(false);
            if !still_valid {
                n.aggro.clear_target();
                n.combat.disengage();
            }
        }
        if n.aggro.target().is_some() {
            continue;
        }
        let pos = n.pos;
        let anchor = n.aggro_range_tiles.map(|r| SpawnAnchor {
            pos: n.spawn_pos(),
            aggro_range_tiles: r,
        });
        n.aggro.find_valid_targets(pos, players, anchor);
        if let Some(pick) = n.aggro.select_random_target(rng).cloned() {
            n.aggro.set_target_if_none(pick.id);
        }
    }
}

/// Swing at the current target when it is alive, in combat range, and the
/// cooldown has elapsed. Resolution itself is the external rules' job; the
/// outcome goes on the event bus for the host to apply to player health.
fn combat_resolve_swings(
    srv: &mut ServerState,
    now_ms: u64,
    players: &[PlayerView],
    rules: &mut dyn CombatRules,
) {
    for n in srv.npcs.iter_mut() {
        if n.death.is_dead() {
            continue;
        }
        let Some(tid) = n.aggro.target().cloned() else {
            n.combat.disengage();
            continue;
        };
        let Some(target) = players.iter().find(|p| p.id == tid && p.alive) else {
            // Vanished or died between acquisition and resolution.
            n.aggro.clear_target();
            n.combat.disengage();
            continue;
        };
        n.combat.engage(tid, now_ms);
        let pos = n.pos;
        if !n.aggro.is_in_combat_range(pos, target.pos) {
            // Target walked out of reach; hold the engagement, skip the
            // swing.
            continue;
        }
        if !n.combat.cooldown_ready(now_ms) {
            continue;
        }
        let swing = SwingContext {
            attacker: n.id,
            attacker_kind: CombatantKind::Npc,
            defender: &target.id,
            defender_kind: CombatantKind::Player,
            style: n.combat.style,
            base_damage: n.combat.params.damage,
        };
        let res = rules.resolve(&swing);
        n.combat.note_attack(now_ms);
        srv.events.push(SimEvent::AttackResolved {
            npc: n.id,
            target: target.id.clone(),
            hit: res.hit,
            damage: res.damage,
            style: n.combat.style,
            xp: n.combat.style.xp_weights(),
        });
        metrics::counter!("combat.attacks_total").increment(1);
    }
}

/// Advance death-animation timers; runs for dead NPCs too, so corpse-hide
/// transitions fire without the entity otherwise participating in the tick.
fn death_update_timers(srv: &mut ServerState, now_ms: u64) {
    for n in srv.npcs.iter_mut() {
        if let Some(LifecycleEvent::CorpseHidden) = n.death.update(now_ms) {
            srv.events.push(SimEvent::CorpseHidden { npc: n.id });
        }
    }
}
