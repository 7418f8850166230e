//! Death/respawn lifecycle for one NPC.
//!
//! Alive -> Dead -> Alive, cycling forever. While dead the entity's position
//! is reported frozen at the death position, regardless of any residual
//! movement state elsewhere. `update` only drives the corpse-hide timer;
//! respawn timing belongs to an external collaborator (see
//! `ServerState::process_respawns`), which keeps "animation finished"
//! decoupled from "slot available again".
//!
//! Invariant: `death_time_ms` and `death_pos` are `Some` iff the entity is
//! currently dead.

use ecs_core::components::{DeathParams, RespawnAnchor};
use glam::Vec3;

/// Transition markers returned to the caller; the scheduler maps them onto
/// the simulation event bus with the owning NPC's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    DeathStarted,
    CorpseHidden,
    Respawned,
}

#[derive(Debug, Clone, Default)]
pub struct Death {
    params: DeathParams,
    death_time_ms: Option<u64>,
    death_pos: Option<Vec3>,
    hide_time_ms: Option<u64>,
    hide_sent: bool,
}

impl Death {
    pub fn new(params: DeathParams) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &DeathParams {
        &self.params
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.death_time_ms.is_some()
    }

    pub fn death_time_ms(&self) -> Option<u64> {
        self.death_time_ms
    }

    /// Enter the dead state, freezing position at `pos`. Idempotent: a
    /// second call while dead logs and no-ops, leaving the first death's
    /// timestamp and position untouched.
    pub fn die(&mut self, pos: Vec3, now_ms: u64) -> Option<LifecycleEvent> {
        if self.is_dead() {
            log::warn!("die() while already dead; ignoring");
            return None;
        }
        self.death_time_ms = Some(now_ms);
        self.death_pos = Some(pos);
        self.hide_time_ms = None;
        self.hide_sent = false;
        Some(LifecycleEvent::DeathStarted)
    }

    /// Timer check only. Emits `CorpseHidden` exactly once, after the death
    /// animation window has elapsed. Never triggers respawn.
    pub fn update(&mut self, now_ms: u64) -> Option<LifecycleEvent> {
        let died_at = self.death_time_ms?;
        if !self.hide_sent && now_ms.saturating_sub(died_at) >= self.params.death_anim_ms {
            self.hide_sent = true;
            self.hide_time_ms = Some(now_ms);
            return Some(LifecycleEvent::CorpseHidden);
        }
        None
    }

    /// While dead, observers must report the entity at the locked position.
    pub fn should_lock_position(&self) -> bool {
        self.is_dead()
    }

    pub fn locked_position(&self) -> Option<Vec3> {
        self.death_pos
    }

    /// Whether the respawn delay has elapsed, measured from the configured
    /// anchor. With the `Hide` anchor this stays false until the corpse-hide
    /// transition has actually fired.
    pub fn respawn_due(&self, now_ms: u64) -> bool {
        let anchored_at = match self.params.anchor {
            RespawnAnchor::Death => self.death_time_ms,
            RespawnAnchor::Hide => self.hide_time_ms,
        };
        anchored_at
            .map(|t| now_ms.saturating_sub(t) >= self.params.respawn_delay_ms)
            .unwrap_or(false)
    }

    /// Administrative override: respawn immediately, bypassing the timer.
    pub fn force_respawn(&mut self) -> Option<LifecycleEvent> {
        if !self.is_dead() {
            log::warn!("force_respawn() on a living entity; ignoring");
            return None;
        }
        self.respawn();
        Some(LifecycleEvent::Respawned)
    }

    fn respawn(&mut self) {
        self.death_time_ms = None;
        self.death_pos = None;
        self.hide_time_ms = None;
        self.hide_sent = false;
    }

    /// Reconciliation entry point for a follower replica receiving
    /// authoritative death state. A replica that was still alive is forced
    /// dead (that indicates drift); the locked position is always
    /// overwritten.
    pub fn apply_death_position_from_server(&mut self, pos: Vec3, now_ms: u64) {
        if !self.is_dead() {
            log::warn!("server reports dead but local state is alive; forcing death state");
            self.death_time_ms = Some(now_ms);
            self.hide_time_ms = None;
            self.hide_sent = false;
        }
        self.death_pos = Some(pos);
    }

    /// Forcibly return to Alive with all fields cleared, bypassing timers.
    /// For full entity reinitialization, not normal gameplay.
    pub fn reset(&mut self) {
        self.respawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    fn params(anim: u64, delay: u64) -> DeathParams {
        DeathParams {
            death_anim_ms: anim,
            respawn_delay_ms: delay,
            anchor: RespawnAnchor::Death,
        }
    }

    #[test]
    fn death_fields_present_iff_dead() {
        let mut d = Death::new(params(1_800, 30_000));
        assert!(!d.is_dead());
        assert!(d.locked_position().is_none());
        assert!(d.death_time_ms().is_none());

        d.die(vec3(1.0, 0.0, 2.0), 1_000);
        assert!(d.is_dead());
        assert!(d.locked_position().is_some());
        assert!(d.death_time_ms().is_some());

        d.reset();
        assert!(!d.is_dead());
        assert!(d.locked_position().is_none());
        assert!(d.death_time_ms().is_none());
    }

    #[test]
    fn double_death_keeps_first_record() {
        let mut d = Death::new(params(1_800, 30_000));
        assert!(d.die(vec3(1.0, 0.0, 2.0), 1_000).is_some());
        assert!(d.die(vec3(9.0, 0.0, 9.0), 5_000).is_none());
        assert_eq!(d.death_time_ms(), Some(1_000));
        assert_eq!(d.locked_position(), Some(vec3(1.0, 0.0, 2.0)));
    }

    #[test]
    fn hide_fires_once_after_window() {
        let mut d = Death::new(params(1_800, 30_000));
        d.die(Vec3::ZERO, 1_000);
        assert_eq!(d.update(2_000), None);
        assert_eq!(d.update(2_800), Some(LifecycleEvent::CorpseHidden));
        assert_eq!(d.update(3_400), None);
        assert_eq!(d.update(60_000), None);
    }

    #[test]
    fn update_never_respawns() {
        let mut d = Death::new(params(100, 200));
        d.die(Vec3::ZERO, 0);
        for now in (0..10_000).step_by(100) {
            d.update(now);
        }
        assert!(d.is_dead(), "update must never re-admit the entity");
    }

    #[test]
    fn respawn_due_from_death_anchor() {
        let mut d = Death::new(params(1_800, 30_000));
        d.die(Vec3::ZERO, 1_000);
        assert!(!d.respawn_due(30_999));
        assert!(d.respawn_due(31_000));
    }

    #[test]
    fn respawn_due_from_hide_anchor_waits_for_hide() {
        let mut d = Death::new(DeathParams {
            death_anim_ms: 1_800,
            respawn_delay_ms: 10_000,
            anchor: RespawnAnchor::Hide,
        });
        d.die(Vec3::ZERO, 0);
        // Delay would have elapsed from death time, but the hide transition
        // has not fired yet.
        assert!(!d.respawn_due(11_000));
        assert_eq!(d.update(2_000), Some(LifecycleEvent::CorpseHidden));
        assert!(!d.respawn_due(11_999));
        assert!(d.respawn_due(12_000));
    }

    #[test]
    fn force_respawn_clears_state() {
        let mut d = Death::new(params(1_800, 30_000));
        assert!(d.force_respawn().is_none(), "no-op while alive");
        d.die(vec3(3.0, 0.0, 4.0), 500);
        assert_eq!(d.force_respawn(), Some(LifecycleEvent::Respawned));
        assert!(!d.is_dead());
        assert!(d.locked_position().is_none());
    }

    #[test]
    fn replica_reconciliation_forces_death() {
        let mut d = Death::new(params(1_800, 30_000));
        d.apply_death_position_from_server(vec3(7.0, 0.0, 7.0), 4_000);
        assert!(d.is_dead());
        assert_eq!(d.locked_position(), Some(vec3(7.0, 0.0, 7.0)));
        // Already dead: position overwritten, death time kept.
        d.apply_death_position_from_server(vec3(8.0, 0.0, 8.0), 9_000);
        assert_eq!(d.death_time_ms(), Some(4_000));
        assert_eq!(d.locked_position(), Some(vec3(8.0, 0.0, 8.0)));
    }
}
