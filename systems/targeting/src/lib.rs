#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Selection always reads the *live* range from each tower's active genome,
//! never a construction-time default, so a strategy update widens or narrows
//! the scan on the very next tick.

use glam::Vec2;
use grid_defence_core::{
    Command, EnemyId, EnemySnapshot, EnemyView, GameSpeed, Timestamp, TowerSnapshot, TowerView,
};

/// Reselection policy applied to towers that already hold a target.
///
/// The original behavior rescans on every tick even while a target is locked
/// in range; whether that is intent or accident is ambiguous, so the choice
/// is a tunable rather than an assumption.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TargetingPolicy {
    /// Re-run selection every tick regardless of the current handle.
    #[default]
    AlwaysReselect,
    /// Retain a still-valid target; reselect only once it is lost.
    Sticky,
}

/// Tower targeting system that emits target assignment commands.
#[derive(Clone, Copy, Debug, Default)]
pub struct Targeting {
    policy: TargetingPolicy,
}

impl Targeting {
    /// Creates a targeting system using the default always-reselect policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a targeting system with an explicit reselection policy.
    #[must_use]
    pub const fn with_policy(policy: TargetingPolicy) -> Self {
        Self { policy }
    }

    /// Emits `Command::AssignTarget` entries for towers due for a scan.
    ///
    /// A tower holding no target re-polls only after `cooldown / game_speed`
    /// has elapsed since its last shot, so idle towers do not hot-spin
    /// selection; towers that never fired scan immediately. Commands are
    /// emitted only when the selection differs from the current handle.
    pub fn handle(
        &self,
        towers: &TowerView,
        enemies: &EnemyView,
        now: Timestamp,
        game_speed: GameSpeed,
        out: &mut Vec<Command>,
    ) {
        for tower in towers.iter() {
            if tower.target.is_none() && !tower.cooldown_ready(now, game_speed) {
                continue;
            }

            if self.policy == TargetingPolicy::Sticky {
                if let Some(current) = tower.target {
                    if enemies
                        .iter()
                        .any(|enemy| enemy.id == current && in_range(tower, enemy))
                    {
                        continue;
                    }
                }
            }

            let selection = select_target(tower, enemies);
            if selection != tower.target {
                out.push(Command::AssignTarget {
                    tower: tower.id,
                    target: selection,
                });
            }
        }
    }
}

/// Returns the enemy with minimum Euclidean distance to the tower center
/// among those strictly within the live range.
///
/// Ties resolve to the first enemy encountered in iteration order, which is
/// ascending by identifier.
fn select_target(tower: &TowerSnapshot, enemies: &EnemyView) -> Option<EnemyId> {
    let center = Vec2::new(tower.center.x(), tower.center.y());
    let range = tower.genome.range();

    let mut best: Option<(EnemyId, f32)> = None;
    for enemy in enemies.iter() {
        let position = Vec2::new(enemy.position.x(), enemy.position.y());
        let distance = center.distance(position);
        if distance >= range {
            continue;
        }

        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((enemy.id, distance)),
        }
    }

    best.map(|(id, _)| id)
}

fn in_range(tower: &TowerSnapshot, enemy: &EnemySnapshot) -> bool {
    let center = Vec2::new(tower.center.x(), tower.center.y());
    let position = Vec2::new(enemy.position.x(), enemy.position.y());
    center.distance(position) < tower.genome.range()
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::{
        Health, StrategyGenome, TileCell, TowerId, TowerKind, WorldPoint,
    };

    fn tower(id: u32, center: (f32, f32), range: f32) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            kind: TowerKind::Basic,
            upgrade_level: 1,
            cell: TileCell::new(0, 0),
            center: WorldPoint::new(center.0, center.1),
            angle_degrees: 0.0,
            target: None,
            last_shot: None,
            is_shooting: false,
            genome: StrategyGenome::from_values(TowerKind::Basic, [1.0, 1_000.0, range, 10.0, 0.0])
                .expect("valid genome"),
        }
    }

    fn enemy(id: u32, position: (f32, f32)) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position: WorldPoint::new(position.0, position.1),
            health: Health::new(10.0),
        }
    }

    fn assignments(
        system: &Targeting,
        towers: Vec<TowerSnapshot>,
        enemies: Vec<EnemySnapshot>,
        now_ms: u64,
    ) -> Vec<Command> {
        let mut out = Vec::new();
        system.handle(
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            Timestamp::from_millis(now_ms),
            GameSpeed::NORMAL,
            &mut out,
        );
        out
    }

    #[test]
    fn nearest_enemy_within_range_is_selected() {
        let out = assignments(
            &Targeting::new(),
            vec![tower(1, (0.0, 0.0), 50.0)],
            vec![enemy(5, (20.0, 0.0)), enemy(6, (10.0, 0.0))],
            0,
        );
        assert_eq!(
            out,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: Some(EnemyId::new(6)),
            }]
        );
    }

    #[test]
    fn enemy_at_exact_range_is_excluded() {
        let out = assignments(
            &Targeting::new(),
            vec![tower(1, (0.0, 0.0), 50.0)],
            vec![enemy(5, (50.0, 0.0))],
            0,
        );
        assert!(out.is_empty(), "strictly-within rule excludes the boundary");
    }

    #[test]
    fn equidistant_tie_prefers_first_in_iteration_order() {
        let out = assignments(
            &Targeting::new(),
            vec![tower(1, (0.0, 0.0), 50.0)],
            vec![enemy(9, (0.0, 10.0)), enemy(4, (10.0, 0.0))],
            0,
        );
        // Views iterate ids ascending, so enemy 4 is encountered first.
        assert_eq!(
            out,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: Some(EnemyId::new(4)),
            }]
        );
    }

    #[test]
    fn empty_enemy_set_produces_no_assignment() {
        let out = assignments(&Targeting::new(), vec![tower(1, (0.0, 0.0), 50.0)], vec![], 0);
        assert!(out.is_empty());
    }

    #[test]
    fn lost_target_is_cleared() {
        let mut armed = tower(1, (0.0, 0.0), 50.0);
        armed.target = Some(EnemyId::new(5));
        let out = assignments(&Targeting::new(), vec![armed], vec![enemy(5, (90.0, 0.0))], 0);
        assert_eq!(
            out,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: None,
            }]
        );
    }

    #[test]
    fn live_range_is_read_from_the_active_genome() {
        let mut narrow = tower(1, (0.0, 0.0), 50.0);
        narrow.genome =
            StrategyGenome::from_values(TowerKind::Basic, [1.0, 1_000.0, 41.0, 10.0, 0.0])
                .expect("valid genome");
        let out = assignments(&Targeting::new(), vec![narrow], vec![enemy(5, (40.0, 0.0))], 0);
        assert_eq!(
            out,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: Some(EnemyId::new(5)),
            }]
        );
    }

    #[test]
    fn idle_tower_waits_for_the_repoll_interval() {
        let mut idle = tower(1, (0.0, 0.0), 50.0);
        idle.last_shot = Some(Timestamp::from_millis(0));

        let early = assignments(&Targeting::new(), vec![idle], vec![enemy(5, (10.0, 0.0))], 500);
        assert!(early.is_empty(), "idle re-poll throttled inside cooldown");

        let due = assignments(&Targeting::new(), vec![idle], vec![enemy(5, (10.0, 0.0))], 1_000);
        assert_eq!(
            due,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: Some(EnemyId::new(5)),
            }]
        );
    }

    #[test]
    fn never_fired_tower_scans_immediately() {
        let out = assignments(
            &Targeting::new(),
            vec![tower(1, (0.0, 0.0), 50.0)],
            vec![enemy(5, (10.0, 0.0))],
            0,
        );
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn armed_tower_rescans_every_tick_under_default_policy() {
        let mut armed = tower(1, (0.0, 0.0), 50.0);
        armed.target = Some(EnemyId::new(5));
        armed.last_shot = Some(Timestamp::from_millis(900));

        // A closer enemy appears; always-reselect switches immediately even
        // though the cooldown has not elapsed.
        let out = assignments(
            &Targeting::new(),
            vec![armed],
            vec![enemy(5, (20.0, 0.0)), enemy(6, (5.0, 0.0))],
            1_000,
        );
        assert_eq!(
            out,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: Some(EnemyId::new(6)),
            }]
        );
    }

    #[test]
    fn sticky_policy_retains_a_valid_target() {
        let mut armed = tower(1, (0.0, 0.0), 50.0);
        armed.target = Some(EnemyId::new(5));

        let sticky = Targeting::with_policy(TargetingPolicy::Sticky);
        let out = assignments(
            &sticky,
            vec![armed],
            vec![enemy(5, (20.0, 0.0)), enemy(6, (5.0, 0.0))],
            0,
        );
        assert!(out.is_empty(), "sticky policy keeps the in-range target");
    }

    #[test]
    fn sticky_policy_reselects_once_the_target_is_lost() {
        let mut armed = tower(1, (0.0, 0.0), 50.0);
        armed.target = Some(EnemyId::new(5));

        let sticky = Targeting::with_policy(TargetingPolicy::Sticky);
        let out = assignments(
            &sticky,
            vec![armed],
            vec![enemy(5, (90.0, 0.0)), enemy(6, (5.0, 0.0))],
            0,
        );
        assert_eq!(
            out,
            vec![Command::AssignTarget {
                tower: TowerId::new(1),
                target: Some(EnemyId::new(6)),
            }]
        );
    }
}
