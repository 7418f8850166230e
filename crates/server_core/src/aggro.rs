//! Per-NPC target acquisition.
//!
//! Candidates are filtered by two independent radii: hunt range around the
//! NPC's current tile (detection) and, when supplied, an aggression range
//! anchored at the immutable spawn tile (engagement permission). An NPC that
//! chased a player far from home still detects candidates near its current
//! position but refuses ones too far from its spawn. Selection among valid
//! candidates is uniform and memoryless.
//!
//! No operation here errors; "no target" is a normal tick outcome.

use ecs_core::components::{AggroParams, PlayerId};
use glam::Vec3;
use rand::Rng;

use crate::PlayerView;
use crate::tile;

/// Spawn-anchored engagement bound, supplied per scan. The radius may fold
/// leash distance and attack range together, so it is not stored on the
/// engine.
#[derive(Debug, Clone, Copy)]
pub struct SpawnAnchor {
    pub pos: Vec3,
    pub aggro_range_tiles: i32,
}

/// Target-acquisition state for one NPC: the scan working set plus a single
/// current-target slot. No queue; an NPC holds at most one target.
#[derive(Debug, Default)]
pub struct Aggro {
    pub params: AggroParams,
    target: Option<PlayerId>,
    // Cleared, never reallocated, each scan; keeps tick cost flat for large
    // player counts.
    valid_targets: Vec<PlayerView>,
}

impl Aggro {
    pub fn new(params: AggroParams) -> Self {
        Self {
            params,
            target: None,
            valid_targets: Vec::new(),
        }
    }

    /// Recompute the working set of eligible targets, replacing the previous
    /// one. A candidate passes iff it is alive, its tile distance from
    /// `current_pos` is within hunt range, and, only when `spawn` is
    /// supplied, its tile distance from the spawn position is within the
    /// anchor's aggression range.
    pub fn find_valid_targets(
        &mut self,
        current_pos: Vec3,
        candidates: &[PlayerView],
        spawn: Option<SpawnAnchor>,
    ) -> &[PlayerView] {
        self.valid_targets.clear();
        for c in candidates {
            if !c.alive {
                continue;
            }
            if !tile::within_range(current_pos, c.pos, self.params.hunt_range_tiles) {
                continue;
            }
            if let Some(anchor) = spawn
                && !tile::within_range(anchor.pos, c.pos, anchor.aggro_range_tiles)
            {
                continue;
            }
            self.valid_targets.push(c.clone());
        }
        &self.valid_targets
    }

    /// Uniform pick from the working set: `None` when empty, the sole entry
    /// for a singleton, otherwise a random entry. No sticky preference for
    /// previously seen players.
    pub fn select_random_target(&self, rng: &mut impl Rng) -> Option<&PlayerView> {
        match self.valid_targets.len() {
            0 => None,
            1 => self.valid_targets.first(),
            n => self.valid_targets.get(rng.random_range(0..n)),
        }
    }

    /// Scan then pick; `None` when nothing qualifies.
    pub fn find_nearby_player(
        &mut self,
        current_pos: Vec3,
        candidates: &[PlayerView],
        spawn: Option<SpawnAnchor>,
        rng: &mut impl Rng,
    ) -> Option<PlayerView> {
        self.find_valid_targets(current_pos, candidates, spawn);
        self.select_random_target(rng).cloned()
    }

    /// Refresh a single player's snapshot through a host lookup, applying
    /// the liveness rule only (no range check). Used to revalidate an
    /// already-selected target without re-running the candidate scan.
    pub fn revalidate<F>(&self, id: &PlayerId, lookup: F) -> Option<PlayerView>
    where
        F: FnOnce(&PlayerId) -> Option<PlayerView>,
    {
        lookup(id).filter(|p| p.alive)
    }

    /// Hunt-range predicate, usable outside the scan path.
    pub fn is_in_aggro_range(&self, npc_pos: Vec3, pos: Vec3) -> bool {
        tile::within_range(npc_pos, pos, self.params.hunt_range_tiles)
    }

    /// Combat-range predicate. Clamps to a minimum radius of one tile so a
    /// zero-radius configuration cannot lock an NPC out of attacking.
    pub fn is_in_combat_range(&self, npc_pos: Vec3, pos: Vec3) -> bool {
        tile::within_range(npc_pos, pos, self.params.combat_range_tiles.max(1))
    }

    pub fn set_target(&mut self, id: PlayerId) {
        self.target = Some(id);
    }

    pub fn target(&self) -> Option<&PlayerId> {
        self.target.as_ref()
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Acquire-if-absent; keeps an existing target.
    pub fn set_target_if_none(&mut self, id: PlayerId) {
        if self.target.is_none() {
            self.target = Some(id);
        }
    }

    pub fn reset(&mut self) {
        self.target = None;
        self.valid_targets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn player(id: &str, pos: Vec3) -> PlayerView {
        PlayerView {
            id: PlayerId::from(id),
            pos,
            alive: true,
        }
    }

    fn aggro(hunt: i32, combat: i32) -> Aggro {
        Aggro::new(AggroParams {
            hunt_range_tiles: hunt,
            combat_range_tiles: combat,
        })
    }

    #[test]
    fn hunt_range_alone_gates_without_anchor() {
        let mut a = aggro(5, 1);
        let cands = [
            player("near", vec3(3.0, 0.0, 0.0)),
            player("far", vec3(9.0, 0.0, 0.0)),
        ];
        let hits = a.find_valid_targets(Vec3::ZERO, &cands, None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, PlayerId::from("near"));
    }

    #[test]
    fn spawn_anchor_excludes_hunt_range_hits() {
        // NPC wandered 3 tiles from spawn; candidate is in hunt range of the
        // current position but outside the spawn-anchored bound.
        let mut a = aggro(5, 1);
        let spawn = SpawnAnchor {
            pos: Vec3::ZERO,
            aggro_range_tiles: 2,
        };
        let current = vec3(0.0, 0.0, 3.0);
        let cands = [
            player("roamer", vec3(0.0, 0.0, 7.0)), // hunt 4, spawn 7
            player("homely", vec3(0.0, 0.0, 2.0)), // hunt 1, spawn 2
        ];
        let hits = a.find_valid_targets(current, &cands, Some(spawn));
        assert_eq!(hits.len(), 1, "only the spawn-near candidate qualifies");
        assert_eq!(hits[0].id, PlayerId::from("homely"));
    }

    #[test]
    fn dead_candidates_are_skipped() {
        let mut a = aggro(5, 1);
        let mut p = player("ghost", vec3(1.0, 0.0, 0.0));
        p.alive = false;
        assert!(a.find_valid_targets(Vec3::ZERO, &[p], None).is_empty());
    }

    #[test]
    fn combat_range_clamps_to_one_tile() {
        let a = aggro(5, 0);
        assert!(a.is_in_combat_range(Vec3::ZERO, vec3(1.0, 0.0, 0.0)));
    }

    #[test]
    fn singleton_pick_needs_no_randomness() {
        let mut a = aggro(5, 1);
        let mut rng = SmallRng::seed_from_u64(7);
        let got = a.find_nearby_player(
            Vec3::ZERO,
            &[player("only", vec3(2.0, 0.0, 1.0))],
            None,
            &mut rng,
        );
        assert_eq!(got.map(|p| p.id), Some(PlayerId::from("only")));
    }

    #[test]
    fn empty_scan_yields_none() {
        let mut a = aggro(5, 1);
        let mut rng = SmallRng::seed_from_u64(7);
        assert!(a.find_nearby_player(Vec3::ZERO, &[], None, &mut rng).is_none());
        assert!(a.select_random_target(&mut rng).is_none());
    }

    #[test]
    fn target_slot_acquire_if_absent() {
        let mut a = aggro(5, 1);
        a.set_target_if_none(PlayerId::from("first"));
        a.set_target_if_none(PlayerId::from("second"));
        assert_eq!(a.target(), Some(&PlayerId::from("first")));
        a.clear_target();
        assert!(a.target().is_none());
    }

    #[test]
    fn revalidate_checks_liveness_only() {
        let a = aggro(5, 1);
        let id = PlayerId::from("p");
        // Far outside every range; still valid because revalidation skips
        // range checks.
        let found = a.revalidate(&id, |pid| Some(player(&pid.0, vec3(1000.0, 0.0, 0.0))));
        assert!(found.is_some());
        let gone = a.revalidate(&id, |_| None);
        assert!(gone.is_none());
        let dead = a.revalidate(&id, |pid| {
            let mut p = player(&pid.0, Vec3::ZERO);
            p.alive = false;
            Some(p)
        });
        assert!(dead.is_none());
    }
}
