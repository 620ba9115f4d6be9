//! Replays a scripted command sequence twice and verifies that target
//! assignments are identical run-to-run.

use grid_defence_core::{
    Command, EnemyId, Event, Health, TileCell, TileCoord, Timestamp, TowerId, TowerKind,
    WorldPoint,
};
use grid_defence_system_targeting::Targeting;
use grid_defence_world::{self as world, query, World};

#[derive(Clone, Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<Event>,
    assignments: Vec<Vec<(TowerId, Option<EnemyId>)>>,
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let targeting = Targeting::new();
    let mut events = Vec::new();
    let mut assignments = Vec::new();

    for command in commands {
        let mut generated = Vec::new();
        world::apply(&mut world, command, &mut generated);
        events.append(&mut generated);

        let towers = query::tower_view(&world);
        let enemies = query::enemy_view(&world);
        let now = query::current_time(&world);
        let speed = query::game_speed(&world);

        let mut selection = Vec::new();
        targeting.handle(&towers, &enemies, now, speed, &mut selection);
        for command in selection {
            world::apply(&mut world, command, &mut generated);
        }
        events.append(&mut generated);

        assignments.push(
            query::tower_view(&world)
                .into_vec()
                .into_iter()
                .map(|snapshot| (snapshot.id, snapshot.target))
                .collect(),
        );
    }

    ReplayOutcome {
        events,
        assignments,
    }
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::ConfigureTileGrid {
            columns: TileCoord::new(6),
            rows: TileCoord::new(6),
            tile_length: 10.0,
        },
        Command::PlaceTower {
            kind: TowerKind::Basic,
            cell: TileCell::new(2, 2),
        },
        Command::SpawnEnemy {
            position: WorldPoint::new(30.0, 25.0),
            health: Health::new(10.0),
        },
        Command::SpawnEnemy {
            position: WorldPoint::new(20.0, 25.0),
            health: Health::new(10.0),
        },
        Command::Tick {
            now: Timestamp::from_millis(16),
        },
        Command::MoveEnemy {
            enemy: EnemyId::new(0),
            position: WorldPoint::new(26.0, 25.0),
        },
        Command::Tick {
            now: Timestamp::from_millis(32),
        },
        Command::DespawnEnemy {
            enemy: EnemyId::new(0),
        },
        Command::Tick {
            now: Timestamp::from_millis(48),
        },
    ]
}

#[test]
fn deterministic_replay_reassigns_targets_after_despawn() {
    let script = scripted_commands();
    let script_len = script.len();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.assignments.len(), script_len);

    let tower = TowerId::new(0);

    // Before any enemy exists the scan assigns nothing.
    assert_eq!(first.assignments[1], vec![(tower, None)]);

    // The first spawn lands five units east of the tower center at (25, 25),
    // well inside the worst-genome range.
    assert_eq!(first.assignments[2], vec![(tower, Some(EnemyId::new(0)))]);

    // The second spawn is equidistant; the tie keeps the first enemy in
    // iteration order.
    assert_eq!(first.assignments[3], vec![(tower, Some(EnemyId::new(0)))]);

    // After MoveEnemy brings enemy 0 within one world unit the lock holds.
    assert_eq!(first.assignments[6], vec![(tower, Some(EnemyId::new(0)))]);

    // Despawning the locked target clears the handle and the same scan
    // falls back to the surviving enemy.
    assert_eq!(first.assignments[7], vec![(tower, Some(EnemyId::new(1)))]);
}
