use glam::{Vec3, vec3};
use server_core::{Aggro, AggroParams, PlayerId, PlayerView, SpawnAnchor};

fn player(id: &str, pos: Vec3) -> PlayerView {
    PlayerView::new(id, pos, true)
}

fn engine(hunt: i32) -> Aggro {
    Aggro::new(AggroParams {
        hunt_range_tiles: hunt,
        combat_range_tiles: 1,
    })
}

#[test]
fn wandered_npc_detects_near_but_engages_only_near_spawn() {
    // Hunt range 5, aggression range 3, spawn at origin, NPC has wandered to
    // tile distance 4 from spawn.
    let mut a = engine(5);
    let current = vec3(0.0, 0.0, 4.0);
    let anchor = SpawnAnchor {
        pos: Vec3::ZERO,
        aggro_range_tiles: 3,
    };
    let players = [
        player("p1", vec3(0.0, 0.0, 6.0)), // hunt 2, spawn 6
        player("p2", vec3(0.0, 0.0, 5.0)), // hunt 1, spawn 5
        player("p3", vec3(0.0, 0.0, 2.0)), // hunt 2, spawn 2
    ];
    let valid = a.find_valid_targets(current, &players, Some(anchor));
    assert_eq!(
        valid.len(),
        1,
        "only the candidate inside both radii qualifies"
    );
    assert_eq!(valid[0].id, PlayerId::from("p3"));
}

#[test]
fn violating_either_bound_alone_excludes() {
    // Hunt 5, aggression 2; NPC at tile distance 3 from spawn.
    let mut a = engine(5);
    let current = vec3(0.0, 0.0, 3.0);
    let anchor = SpawnAnchor {
        pos: Vec3::ZERO,
        aggro_range_tiles: 2,
    };

    // Hunt distance 4 (<= 5) but spawn distance 3 (> 2): excluded.
    let far_from_spawn = [player("roamer", vec3(0.0, 0.0, 7.0))];
    assert!(
        a.find_valid_targets(current, &far_from_spawn, Some(anchor))
            .is_empty()
    );

    // Hunt distance 4 and spawn distance 2: included.
    let near_spawn = [player("near", vec3(4.0, 0.0, 2.0))];
    assert_eq!(
        a.find_valid_targets(current, &near_spawn, Some(anchor)).len(),
        1
    );

    // Spawn distance fine but outside hunt range: excluded.
    let behind = [player("behind", vec3(0.0, 0.0, -2.0))];
    assert!(
        a.find_valid_targets(current, &behind, Some(anchor)).is_empty(),
        "hunt range is measured from the current position, not spawn"
    );
}

#[test]
fn no_anchor_means_hunt_range_only() {
    let mut a = engine(5);
    let current = vec3(0.0, 0.0, 4.0);
    // Far from spawn but well inside hunt range; with no anchor supplied
    // the spawn rule simply does not apply.
    let players = [player("p", vec3(0.0, 0.0, 6.0))];
    assert_eq!(a.find_valid_targets(current, &players, None).len(), 1);
}
